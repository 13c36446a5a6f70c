//! Core data types shared across the pipeline stages.

pub mod classification;
pub mod core;
pub mod layout;
pub mod report;

pub use self::core::{
    BoundingBox, Color, DesignNode, Effect, EffectKind, Fill, FillKind, NodeKind, Offset, RawNode,
    Stroke, TextStyle,
};
pub use classification::{ClassificationResult, ComponentType, ConfidenceLevel, SuggestedLibrary};
pub use layout::{
    AlignmentEdge, AlignmentGroup, AlignmentGroups, ConsistentSpacing, FlexCandidate, GridPattern,
    LayoutAnalysis, LayoutComplexity, SpacingDirection, SpacingPattern, SubtreeLayout,
};
pub use report::{
    AccessibilityReport, ContrastResult, CorrectionReport, Mismatch, MismatchKind, Severity, Stage,
    StageFailure, StageStatus,
};
