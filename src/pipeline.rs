//! Stage orchestration.
//!
//! classify -> analyze -> generate (external, awaited) -> transform ->
//! enforce -> validate, strictly in sequence. The correction stages degrade
//! independently: a stage that fails is recorded in `stages` and the next
//! one runs on the best markup available. Only invalid input and the
//! generation call itself surface as errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::accessibility::AccessibilityTransformer;
use crate::cache::{AnalysisCache, ContentKey};
use crate::classifier::ComponentClassifier;
use crate::codegen::{build_request, CodegenBackend, GenerationRequest};
use crate::config::Config;
use crate::enforcer::Enforcer;
use crate::error::{DfcError, Result};
use crate::layout::LayoutAnalyzer;
use crate::markup::extract_markup;
use crate::tree::DesignTree;
use crate::types::{
    AccessibilityReport, ClassificationResult, ComponentType, CorrectionReport, DesignNode,
    LayoutAnalysis, Stage, StageStatus, SubtreeLayout,
};
use crate::validator::Validator;

/// Everything needed before the generation call.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub node_id: String,
    pub classification: ClassificationResult,
    /// Analysis of the node's children.
    pub layout: LayoutAnalysis,
    pub subtree: SubtreeLayout,
    pub request: GenerationRequest,
}

/// Result of the correction stages for one markup input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corrected {
    pub markup: String,
    pub accessibility: AccessibilityReport,
    pub report: CorrectionReport,
    pub stages: Vec<StageStatus>,
}

/// Final output of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub node_id: String,
    pub classification: ClassificationResult,
    pub layout: LayoutAnalysis,
    pub markup: String,
    pub accessibility: AccessibilityReport,
    pub report: CorrectionReport,
    pub stages: Vec<StageStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PipelineOutput {
    pub fn is_exact(&self) -> bool {
        self.report.is_exact
    }

    /// Stages that did not succeed.
    pub fn failed_stages(&self) -> impl Iterator<Item = &StageStatus> {
        self.stages.iter().filter(|s| !s.succeeded)
    }
}

pub struct Pipeline {
    config: Config,
    classifier: ComponentClassifier,
    analyzer: LayoutAnalyzer,
    transformer: AccessibilityTransformer,
    enforcer: Enforcer,
    validator: Validator,
    cache: AnalysisCache,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            classifier: ComponentClassifier::new(config.classification),
            analyzer: LayoutAnalyzer::new(config.alignment),
            transformer: AccessibilityTransformer::new(config.contrast),
            enforcer: Enforcer::new(config.alignment),
            validator: Validator::new(config.validation, config.alignment),
            cache: AnalysisCache::default(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn classify(&self, node: &DesignNode) -> ClassificationResult {
        match ContentKey::for_node(node) {
            Ok(key) => self
                .cache
                .classification
                .get_or_insert_with(key, || self.classifier.classify(node)),
            Err(err) => {
                debug!(node = %node.id, error = %err, "classification not cached");
                self.classifier.classify(node)
            }
        }
    }

    /// Per-container analyses for the node's subtree.
    pub fn subtree_layout(&self, node: &DesignNode) -> SubtreeLayout {
        match ContentKey::for_node(node) {
            Ok(key) => self
                .cache
                .layout
                .get_or_insert_with(key, || self.analyzer.analyze_subtree(node)),
            Err(err) => {
                debug!(node = %node.id, error = %err, "layout not cached");
                self.analyzer.analyze_subtree(node)
            }
        }
    }

    /// Analysis of the sibling set `id` belongs to.
    pub fn analyze_siblings(&self, tree: &DesignTree, id: &str) -> Result<LayoutAnalysis> {
        node(tree, id)?;
        Ok(self.analyzer.analyze(tree, id))
    }

    /// Classify and analyze `id` and build its generation request.
    pub fn prepare(&self, tree: &DesignTree, id: &str) -> Result<Prepared> {
        let node = node(tree, id)?;
        let classification = self.classify(node);
        let subtree = self.subtree_layout(node);
        let layout = subtree
            .for_parent(id)
            .cloned()
            .unwrap_or_else(|| self.analyzer.analyze_children(node));
        let request = build_request(tree, node, &classification, &layout)?;
        debug!(
            node = %id,
            component = %classification.component_type,
            confidence = classification.confidence,
            "prepared generation request"
        );
        Ok(Prepared {
            node_id: id.to_string(),
            classification,
            layout,
            subtree,
            request,
        })
    }

    /// Transform, enforce and validate `markup` for `id`.
    pub fn correct(
        &self,
        tree: &DesignTree,
        id: &str,
        markup: &str,
        classification: &ClassificationResult,
    ) -> Result<Corrected> {
        let node = node(tree, id)?;
        let parent = tree.parent_of(id);
        let compute = || {
            let subtree = self.subtree_layout(node);
            self.correct_uncached(node, parent, markup, classification, &subtree)
        };
        match ContentKey::for_correction(node, parent, markup, classification.component_type) {
            Ok(key) => Ok(self.cache.correction.get_or_insert_with(key, compute)),
            Err(err) => {
                debug!(node = %id, error = %err, "correction not cached");
                Ok(compute())
            }
        }
    }

    fn correct_uncached(
        &self,
        node: &DesignNode,
        parent: Option<&DesignNode>,
        markup: &str,
        classification: &ClassificationResult,
        subtree: &SubtreeLayout,
    ) -> Corrected {
        let enhanced = self.transformer.enhance(markup, classification, node, parent);
        let accessibility = enhanced.report;
        let mut stages = Vec::with_capacity(6);

        for (stage, succeeded) in [
            (Stage::SemanticSubstitution, accessibility.semantic_html),
            (Stage::ComponentAttributes, accessibility.aria_attributes),
            (Stage::KeyboardAccessibility, accessibility.keyboard_accessible),
        ] {
            let error = accessibility
                .failures
                .iter()
                .find(|f| f.stage == stage)
                .map(|f| f.message.clone());
            stages.push(StageStatus {
                stage,
                succeeded,
                error,
            });
        }
        stages.push(StageStatus {
            stage: Stage::ContrastCheck,
            succeeded: accessibility.contrast.is_some(),
            error: accessibility
                .contrast
                .is_none()
                .then(|| "no solid fill on node or parent".to_string()),
        });

        let markup = match self.enforcer.enforce_with_layout(&enhanced.markup, node, subtree) {
            Ok(enforced) => {
                stages.push(StageStatus {
                    stage: Stage::Enforce,
                    succeeded: true,
                    error: None,
                });
                enforced
            }
            Err(err) => {
                warn!(node = %node.id, error = %err, "enforce skipped; keeping transformed markup");
                stages.push(StageStatus {
                    stage: Stage::Enforce,
                    succeeded: false,
                    error: Some(err.to_string()),
                });
                enhanced.markup
            }
        };

        let report = self.validator.validate_with_layout(&markup, node, subtree);
        stages.push(StageStatus {
            stage: Stage::Validate,
            succeeded: true,
            error: None,
        });

        Corrected {
            markup,
            accessibility,
            report,
            stages,
        }
    }

    /// Correct markup produced elsewhere. `component` overrides the
    /// classifier's verdict for the transformer.
    pub fn run_with_markup(
        &self,
        tree: &DesignTree,
        id: &str,
        markup: &str,
        component: Option<ComponentType>,
    ) -> Result<PipelineOutput> {
        let node = node(tree, id)?;
        let classification = match component {
            Some(component) => ClassificationResult::overridden(component),
            None => self.classify(node),
        };
        let layout = self.analyzer.analyze_children(node);
        let corrected = self.correct(tree, id, markup, &classification)?;
        Ok(assemble(id, classification, layout, corrected, Vec::new()))
    }

    /// prepare -> generate -> correct.
    ///
    /// The generation call is awaited once under the configured timeout; its
    /// failure is returned as is.
    pub async fn run(
        &self,
        tree: &DesignTree,
        id: &str,
        backend: &CodegenBackend,
    ) -> Result<PipelineOutput> {
        let prepared = self.prepare(tree, id)?;
        let generated = backend
            .generate(&prepared.request, self.config.codegen.timeout)
            .await?;
        let markup = extract_markup(&generated.text)
            .ok_or_else(|| DfcError::generation("generation response contained no markup"))?;

        let corrected = self.correct(tree, id, &markup, &prepared.classification)?;
        let output = assemble(
            id,
            prepared.classification,
            prepared.layout,
            corrected,
            generated.warnings,
        );
        info!(
            node = %id,
            exact = output.is_exact(),
            mismatches = output.report.mismatches.len(),
            score = output.accessibility.score,
            "pipeline finished"
        );
        Ok(output)
    }
}

fn node<'t>(tree: &'t DesignTree, id: &str) -> Result<&'t DesignNode> {
    tree.get(id)
        .ok_or_else(|| DfcError::invalid_input(format!("node {id} not found in tree")))
}

fn assemble(
    id: &str,
    classification: ClassificationResult,
    layout: LayoutAnalysis,
    corrected: Corrected,
    warnings: Vec<String>,
) -> PipelineOutput {
    PipelineOutput {
        node_id: id.to_string(),
        classification,
        layout,
        markup: corrected.markup,
        accessibility: corrected.accessibility,
        report: corrected.report,
        stages: corrected.stages,
        warnings,
    }
}
