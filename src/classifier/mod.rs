//! Component classification.
//!
//! Scores a resolved design node against the fixed widget archetypes and
//! keeps the best match. Low-confidence matches are never reported: anything
//! under the minimum confidence becomes [`ComponentType::Unknown`] with
//! confidence 0.

mod scorers;


pub use scorers::{
    default_scorers, in_button_region, ArchetypeScore, ArchetypeScorer, AvatarScorer, BadgeScorer,
    ButtonScorer, CardScorer, ContainerScorer, InputScorer,
};

use tracing::debug;

use crate::config::ClassificationConfig;
use crate::tree::DesignTree;
use crate::types::{
    ClassificationResult, ComponentType, ConfidenceLevel, DesignNode, SuggestedLibrary,
};

pub struct ComponentClassifier {
    config: ClassificationConfig,
    scorers: Vec<Box<dyn ArchetypeScorer>>,
}

impl Default for ComponentClassifier {
    fn default() -> Self {
        Self::new(ClassificationConfig::default())
    }
}

impl ComponentClassifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self {
            config,
            scorers: default_scorers(),
        }
    }

    /// Use a custom scorer set; order decides ties.
    pub fn with_scorers(
        config: ClassificationConfig,
        scorers: Vec<Box<dyn ArchetypeScorer>>,
    ) -> Self {
        Self { config, scorers }
    }

    /// Scores for every archetype, clamped to 0-100, in scorer order.
    pub fn score_all(&self, node: &DesignNode) -> Vec<ArchetypeScore> {
        self.scorers
            .iter()
            .map(|scorer| {
                let mut score = scorer.score(node);
                score.points = score.points.clamp(0, 100);
                score
            })
            .collect()
    }

    pub fn classify(&self, node: &DesignNode) -> ClassificationResult {
        let bb = node.bounding_box;
        if !(bb.width.is_finite() && bb.height.is_finite()) || bb.is_degenerate() {
            debug!(node = %node.id, "degenerate geometry; classifying as unknown");
            return ClassificationResult::unknown();
        }

        let scores = self.score_all(node);
        let button = in_button_region(node)
            .then(|| scores.iter().position(|s| s.archetype == ComponentType::Button))
            .flatten();
        let mut best: Option<ArchetypeScore> = None;
        for (i, score) in scores.into_iter().enumerate() {
            let better = match button {
                Some(button) => i == button,
                None => best.as_ref().map_or(true, |b| score.points > b.points),
            };
            if better {
                best = Some(score);
            }
        }

        let Some(best) = best else {
            return ClassificationResult::unknown();
        };

        if best.points < i32::from(self.config.min_confidence) {
            debug!(
                node = %node.id,
                runner_up = %best.archetype,
                points = best.points,
                "best archetype below minimum confidence"
            );
            return ClassificationResult::unknown();
        }

        let confidence = best.points as u8;
        let result = ClassificationResult {
            component_type: best.archetype,
            confidence,
            reasoning: best.reasoning,
            suggested_library: self.library_for(best.archetype, confidence),
            confidence_level: self.level_for(confidence),
        };
        debug!(
            node = %node.id,
            component = %result.component_type,
            confidence,
            "classified node"
        );
        result
    }

    /// Classify a node by id; an absent id is Unknown rather than an error.
    pub fn classify_id(&self, tree: &DesignTree, id: &str) -> ClassificationResult {
        match tree.get(id) {
            Some(node) => self.classify(node),
            None => ClassificationResult::unknown(),
        }
    }

    fn library_for(&self, component: ComponentType, confidence: u8) -> SuggestedLibrary {
        if confidence < self.config.library_confidence {
            return SuggestedLibrary::Custom;
        }
        match component {
            ComponentType::Button
            | ComponentType::Input
            | ComponentType::Card
            | ComponentType::Badge => SuggestedLibrary::ShadcnUi,
            ComponentType::Avatar => SuggestedLibrary::RadixUi,
            ComponentType::Container => SuggestedLibrary::Tailwind,
            ComponentType::Navigation | ComponentType::Image | ComponentType::Unknown => {
                SuggestedLibrary::Custom
            }
        }
    }

    fn level_for(&self, confidence: u8) -> ConfidenceLevel {
        if confidence == 0 {
            ConfidenceLevel::None
        } else if confidence >= self.config.high_confidence {
            ConfidenceLevel::High
        } else if confidence >= self.config.library_confidence {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}
