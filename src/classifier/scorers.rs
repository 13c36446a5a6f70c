//! Per-archetype scoring functions.
//!
//! Each scorer accumulates points from weighted criteria and records a
//! description of every criterion that matched. Scores are clamped to 0-100
//! by the classifier, not here.

use crate::types::{ComponentType, DesignNode, EffectKind, NodeKind};

/// Raw (unclamped) score for one archetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeScore {
    pub archetype: ComponentType,
    pub points: i32,
    pub reasoning: Vec<String>,
}

/// Scores a node against one widget archetype.
pub trait ArchetypeScorer: Send + Sync {
    fn archetype(&self) -> ComponentType;
    fn score(&self, node: &DesignNode) -> ArchetypeScore;
}

/// The built-in scorers, in tie-break order.
pub fn default_scorers() -> Vec<Box<dyn ArchetypeScorer>> {
    vec![
        Box::new(ButtonScorer),
        Box::new(CardScorer),
        Box::new(InputScorer),
        Box::new(BadgeScorer),
        Box::new(AvatarScorer),
        Box::new(ContainerScorer),
    ]
}

struct Tally {
    archetype: ComponentType,
    points: i32,
    reasoning: Vec<String>,
}

impl Tally {
    fn new(archetype: ComponentType) -> Self {
        Self {
            archetype,
            points: 0,
            reasoning: Vec::new(),
        }
    }

    fn award(&mut self, matched: bool, points: i32, reason: impl FnOnce() -> String) {
        if matched {
            self.points += points;
            self.reasoning.push(reason());
        }
    }

    fn finish(self) -> ArchetypeScore {
        ArchetypeScore {
            archetype: self.archetype,
            points: self.points,
            reasoning: self.reasoning,
        }
    }
}

const BUTTON_KEYWORDS: &[&str] = &["button", "btn", "cta"];
const CARD_KEYWORDS: &[&str] = &["card", "tile"];
const INPUT_KEYWORDS: &[&str] = &["input", "field", "textbox", "text box", "search bar"];
const BADGE_KEYWORDS: &[&str] = &["badge", "tag", "chip", "pill"];
const AVATAR_KEYWORDS: &[&str] = &["avatar", "profile", "user pic", "pfp", "headshot"];
const CONTAINER_KEYWORDS: &[&str] = &["container", "wrapper", "section", "layout", "frame"];
const PLACEHOLDER_HINTS: &[&str] = &[
    "enter", "search", "type", "email", "password", "username", "placeholder", "your ",
];

fn name_matches(node: &DesignNode, keywords: &[&'static str]) -> Option<&'static str> {
    let name = node.name_lower();
    keywords.iter().copied().find(|k| name.contains(k))
}

fn has_text_descendant(node: &DesignNode) -> bool {
    node.children.iter().flat_map(|c| c.descendants()).any(|n| {
        n.kind == NodeKind::Text && n.characters.as_deref().is_some_and(|t| !t.trim().is_empty())
    })
}

/// Geometry and styling that always read as a button: height 32-64px,
/// width 60-300px, a text label, rounded corners and a solid fill. Inside
/// this region the button score wins over every rival archetype.
pub fn in_button_region(node: &DesignNode) -> bool {
    let bb = node.bounding_box;
    (32.0..=64.0).contains(&bb.height)
        && (60.0..=300.0).contains(&bb.width)
        && has_text_descendant(node)
        && node.max_corner_radius() > 0.0
        && node.solid_fill().is_some()
}

fn looks_like_placeholder(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.ends_with("...")
        || lower.ends_with('\u{2026}')
        || PLACEHOLDER_HINTS.iter().any(|hint| lower.contains(hint))
}

pub struct ButtonScorer;

impl ArchetypeScorer for ButtonScorer {
    fn archetype(&self) -> ComponentType {
        ComponentType::Button
    }

    fn score(&self, node: &DesignNode) -> ArchetypeScore {
        let bb = node.bounding_box;
        let mut t = Tally::new(ComponentType::Button);
        t.award((32.0..=64.0).contains(&bb.height), 20, || {
            format!("height {}px within button range 32-64px", bb.height)
        });
        t.award((60.0..=300.0).contains(&bb.width), 15, || {
            format!("width {}px within button range 60-300px", bb.width)
        });
        t.award(has_text_descendant(node), 20, || "contains a text label".to_string());
        t.award(node.max_corner_radius() > 0.0, 15, || {
            format!("rounded corners ({}px)", node.max_corner_radius())
        });
        t.award(node.solid_fill().is_some(), 10, || "solid background fill".to_string());
        if let Some(keyword) = name_matches(node, BUTTON_KEYWORDS) {
            t.award(true, 30, || format!("name contains \"{keyword}\""));
        }
        t.finish()
    }
}

pub struct CardScorer;

impl ArchetypeScorer for CardScorer {
    fn archetype(&self) -> ComponentType {
        ComponentType::Card
    }

    fn score(&self, node: &DesignNode) -> ArchetypeScore {
        let bb = node.bounding_box;
        let mut t = Tally::new(ComponentType::Card);
        t.award(bb.width >= 200.0, 15, || format!("width {}px >= 200px", bb.width));
        t.award(bb.height >= 100.0, 15, || format!("height {}px >= 100px", bb.height));
        t.award(node.children.len() >= 2, 15, || {
            format!("groups {} child elements", node.children.len())
        });
        t.award(node.max_corner_radius() > 0.0, 10, || "rounded corners".to_string());
        t.award(
            node.effects.iter().any(|e| e.kind == EffectKind::DropShadow),
            20,
            || "drop shadow elevation".to_string(),
        );
        t.award(node.solid_fill().is_some(), 10, || "solid surface fill".to_string());
        if let Some(keyword) = name_matches(node, CARD_KEYWORDS) {
            t.award(true, 30, || format!("name contains \"{keyword}\""));
        }
        t.finish()
    }
}

pub struct InputScorer;

impl ArchetypeScorer for InputScorer {
    fn archetype(&self) -> ComponentType {
        ComponentType::Input
    }

    fn score(&self, node: &DesignNode) -> ArchetypeScore {
        let bb = node.bounding_box;
        let mut t = Tally::new(ComponentType::Input);
        let light_fill = node.solid_fill().is_some_and(|c| c.brightness() >= 0.9);
        t.award(light_fill, 20, || "light/white solid fill".to_string());
        t.award(!node.strokes.is_empty(), 20, || "has a border stroke".to_string());
        t.award(bb.width >= 150.0, 15, || format!("width {}px >= 150px", bb.width));
        let placeholder = node
            .descendants()
            .into_iter()
            .filter(|n| n.kind == NodeKind::Text)
            .filter_map(|n| n.characters.as_deref())
            .find(|text| looks_like_placeholder(text));
        if let Some(text) = placeholder {
            t.award(true, 15, || format!("placeholder-like text \"{}\"", text.trim()));
        }
        if let Some(keyword) = name_matches(node, INPUT_KEYWORDS) {
            t.award(true, 40, || format!("name contains \"{keyword}\""));
        }
        t.finish()
    }
}

pub struct BadgeScorer;

impl ArchetypeScorer for BadgeScorer {
    fn archetype(&self) -> ComponentType {
        ComponentType::Badge
    }

    fn score(&self, node: &DesignNode) -> ArchetypeScore {
        let bb = node.bounding_box;
        let mut t = Tally::new(ComponentType::Badge);
        t.award((12.0..32.0).contains(&bb.height), 25, || {
            format!("height {}px within badge range 12-32px", bb.height)
        });
        t.award((16.0..=120.0).contains(&bb.width), 15, || {
            format!("width {}px within badge range 16-120px", bb.width)
        });
        t.award(
            bb.height > 0.0 && node.max_corner_radius() >= bb.height / 2.0 - 0.5,
            20,
            || "pill-shaped corners".to_string(),
        );
        t.award(has_text_descendant(node), 15, || "contains a short label".to_string());
        t.award(node.solid_fill().is_some(), 10, || "solid fill".to_string());
        if let Some(keyword) = name_matches(node, BADGE_KEYWORDS) {
            t.award(true, 40, || format!("name contains \"{keyword}\""));
        }
        t.finish()
    }
}

/// Avatars are gated on the node name: geometry alone never makes one.
pub struct AvatarScorer;

impl ArchetypeScorer for AvatarScorer {
    fn archetype(&self) -> ComponentType {
        ComponentType::Avatar
    }

    fn score(&self, node: &DesignNode) -> ArchetypeScore {
        let bb = node.bounding_box;
        let mut t = Tally::new(ComponentType::Avatar);
        t.points = -50;
        if let Some(keyword) = name_matches(node, AVATAR_KEYWORDS) {
            t.award(true, 80, || format!("name contains \"{keyword}\""));
        }
        let min_side = bb.width.min(bb.height);
        let ratio = if bb.height > 0.0 { bb.width / bb.height } else { 0.0 };
        t.award((0.9..=1.1).contains(&ratio), 20, || "near-square shape".to_string());
        t.award(
            node.kind == NodeKind::Ellipse
                || (min_side > 0.0 && node.max_corner_radius() >= min_side / 2.0 - 0.5),
            20,
            || "circular shape".to_string(),
        );
        t.award((24.0..=128.0).contains(&bb.width), 15, || {
            format!("size {}px within avatar range 24-128px", bb.width)
        });
        t.award(
            node.descendants().iter().any(|n| n.has_image_fill()),
            15,
            || "image fill".to_string(),
        );
        t.finish()
    }
}

pub struct ContainerScorer;

impl ArchetypeScorer for ContainerScorer {
    fn archetype(&self) -> ComponentType {
        ComponentType::Container
    }

    fn score(&self, node: &DesignNode) -> ArchetypeScore {
        let bb = node.bounding_box;
        let mut t = Tally::new(ComponentType::Container);
        t.award(node.children.len() >= 2, 25, || {
            format!("holds {} children", node.children.len())
        });
        t.award(node.kind.is_container(), 20, || {
            format!("{:?} node kind", node.kind).to_lowercase()
        });
        t.award(bb.width >= 300.0, 15, || format!("width {}px >= 300px", bb.width));
        t.award(bb.height >= 200.0, 15, || format!("height {}px >= 200px", bb.height));
        let transparent = node.solid_fill().map_or(true, |c| c.a <= 0.01);
        t.award(transparent, 10, || "no visible background".to_string());
        if let Some(keyword) = name_matches(node, CONTAINER_KEYWORDS) {
            t.award(true, 30, || format!("name contains \"{keyword}\""));
        }
        t.finish()
    }
}
