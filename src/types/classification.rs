//! Classification result types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DfcError;

/// UI widget archetype a design node resembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Button,
    Input,
    Card,
    Badge,
    Avatar,
    Container,
    /// Not produced by the built-in scorers; callers may supply it as an override.
    Navigation,
    /// Not produced by the built-in scorers; callers may supply it as an override.
    Image,
    Unknown,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::Button => "button",
            ComponentType::Input => "input",
            ComponentType::Card => "card",
            ComponentType::Badge => "badge",
            ComponentType::Avatar => "avatar",
            ComponentType::Container => "container",
            ComponentType::Navigation => "navigation",
            ComponentType::Image => "image",
            ComponentType::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ComponentType {
    type Err = DfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "button" => Ok(ComponentType::Button),
            "input" => Ok(ComponentType::Input),
            "card" => Ok(ComponentType::Card),
            "badge" => Ok(ComponentType::Badge),
            "avatar" => Ok(ComponentType::Avatar),
            "container" => Ok(ComponentType::Container),
            "navigation" | "nav" => Ok(ComponentType::Navigation),
            "image" | "img" => Ok(ComponentType::Image),
            "unknown" => Ok(ComponentType::Unknown),
            _ => Err(DfcError::Config(format!("Unknown component type: {}", s))),
        }
    }
}

/// Component library a confident classification maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestedLibrary {
    #[serde(rename = "shadcn/ui")]
    ShadcnUi,
    #[serde(rename = "radix-ui")]
    RadixUi,
    #[serde(rename = "tailwind")]
    Tailwind,
    #[serde(rename = "custom")]
    Custom,
}

impl fmt::Display for SuggestedLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SuggestedLibrary::ShadcnUi => "shadcn/ui",
            SuggestedLibrary::RadixUi => "radix-ui",
            SuggestedLibrary::Tailwind => "tailwind",
            SuggestedLibrary::Custom => "custom",
        };
        write!(f, "{name}")
    }
}

/// Coarse bucket over the numeric confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    None,
    Low,
    Medium,
    High,
}

/// Outcome of classifying one design node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub component_type: ComponentType,
    /// 0-100
    pub confidence: u8,
    /// Matched-criterion descriptions, in scoring order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasoning: Vec<String>,
    pub suggested_library: SuggestedLibrary,
    pub confidence_level: ConfidenceLevel,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            component_type: ComponentType::Unknown,
            confidence: 0,
            reasoning: Vec::new(),
            suggested_library: SuggestedLibrary::Custom,
            confidence_level: ConfidenceLevel::None,
        }
    }

    /// A caller-supplied classification with full confidence.
    pub fn overridden(component_type: ComponentType) -> Self {
        Self {
            component_type,
            confidence: 100,
            reasoning: vec!["component type supplied by caller".to_string()],
            suggested_library: SuggestedLibrary::Custom,
            confidence_level: ConfidenceLevel::High,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.component_type == ComponentType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_type_display_and_parse_round_trip() {
        for kind in [
            ComponentType::Button,
            ComponentType::Input,
            ComponentType::Card,
            ComponentType::Badge,
            ComponentType::Avatar,
            ComponentType::Container,
            ComponentType::Navigation,
            ComponentType::Image,
            ComponentType::Unknown,
        ] {
            let parsed = ComponentType::from_str(&kind.to_string()).expect("parse should succeed");
            assert_eq!(parsed, kind);
        }
        assert_eq!(ComponentType::from_str("NAV").ok(), Some(ComponentType::Navigation));
        assert!(ComponentType::from_str("carousel").is_err());
    }

    #[test]
    fn suggested_library_serializes_as_tag() {
        let json = serde_json::to_string(&SuggestedLibrary::ShadcnUi).expect("serialize");
        assert_eq!(json, "\"shadcn/ui\"");
    }
}
