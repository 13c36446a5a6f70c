//! Design Fidelity Corrector (DFC) Library
//!
//! Classifies design nodes into UI widget archetypes, recovers the layout
//! intent of their children, and corrects generated markup so that it is
//! semantic, accessible and positioned the way the design says.
//!
//! # Module Overview
//!
//! - [`tree`] - Box resolution and the parent index over design nodes
//! - [`figma`] - Figma API integration and payload conversion
//! - [`classifier`] - Widget archetype scoring
//! - [`layout`] - Alignment groups and spacing patterns
//! - [`markup`] - Pattern rules, element scanner and span edits
//! - [`accessibility`] - Semantic and accessibility passes, WCAG contrast
//! - [`enforcer`] / [`validator`] - Pixel positioning and its verification
//! - [`codegen`] - Generation request building and backends
//! - [`pipeline`] - Stage orchestration with per-stage degradation
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use dfc_lib::{load_design, parse_resource, CodegenBackend, Config, Pipeline};
//!
//! # async fn example() -> dfc_lib::Result<()> {
//! let resource = parse_resource("toolbar.json")
//!     .map_err(|e| dfc_lib::DfcError::Config(e.to_string()))?;
//! let design = load_design(&resource, None).await?;
//!
//! let pipeline = Pipeline::new(Config::default());
//! let backend = CodegenBackend::require_from_env()?;
//! let output = pipeline.run(&design.tree, &design.node_id, &backend).await?;
//! println!("{}", output.markup);
//! # Ok(())
//! # }
//! ```

pub mod accessibility;
pub mod cache;
pub mod classifier;
pub mod codegen;
pub mod config;
pub mod enforcer;
pub mod error;
pub mod figma;
pub mod layout;
pub mod markup;
pub mod output;
pub mod pipeline;
pub mod resource;
pub mod tree;
pub mod types;
pub mod validator;

#[cfg(test)]
mod fixtures;

pub use accessibility::{AccessibilityTransformer, Enhanced};
pub use cache::{AnalysisCache, ContentCache, ContentKey};
pub use classifier::{default_scorers, ArchetypeScorer, ComponentClassifier};
pub use codegen::{build_request, CodegenBackend, Generated, GenerationRequest};
pub use config::Config;
pub use enforcer::Enforcer;
pub use error::{DfcError, ErrorCategory, ErrorPayload, Result};
pub use figma::{FigmaAuth, FigmaClient, FigmaError};
pub use layout::LayoutAnalyzer;
pub use markup::{extract_markup, StageError};
pub use output::{
    AnalyzeOutput, ClassifyOutput, CorrectionOutput, DfcOutput, ErrorOutput, ResourceDescriptor,
    DFC_OUTPUT_VERSION,
};
pub use pipeline::{Corrected, Pipeline, PipelineOutput, Prepared};
pub use resource::{load_design, parse_resource, LoadedDesign, ParsedResource, ResourceKind};
pub use tree::{resolve, DesignTree};
pub use types::{
    ClassificationResult, ComponentType, CorrectionReport, DesignNode, LayoutAnalysis, Mismatch,
    RawNode, Stage, StageStatus,
};
pub use validator::Validator;
