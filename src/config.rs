use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunable constants for every pipeline stage.
///
/// All values are hand-tuned; they are kept here so they can be overridden
/// from a TOML file without code changes.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub alignment: AlignmentConfig,
    pub classification: ClassificationConfig,
    pub validation: ValidationConfig,
    pub contrast: ContrastConfig,
    pub codegen: CodegenConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Max distance (px) between edges considered aligned.
    pub edge_tolerance: f64,
    /// Max distance (px) between centers considered aligned.
    pub center_tolerance: f64,
    /// Gap in ordered top coordinates (px) that starts a new grid row.
    pub row_break: f64,
    /// Fraction of gaps the dominant bucket must cover to be "consistent".
    pub spacing_support: f64,
    pub grid_min_children: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            edge_tolerance: 1.0,
            center_tolerance: 1.0,
            row_break: 10.0,
            spacing_support: 0.7,
            grid_min_children: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Below this the result is Unknown with confidence 0.
    pub min_confidence: u8,
    /// Below this the suggested library is "custom".
    pub library_confidence: u8,
    pub high_confidence: u8,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            min_confidence: 50,
            library_confidence: 70,
            high_confidence: 90,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Differences at or below this (px) are not mismatches.
    pub tolerance: f64,
    /// Differences above this (px) are high severity.
    pub high_severity: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: 2.0,
            high_severity: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    pub aa: f64,
    pub aaa: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self { aa: 4.5, aaa: 7.0 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Location of the per-user config file.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".config").join("dfc").join("config.toml"))
    }

    /// Load from an explicit path, else the central config if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::central_config_path() {
            Some(central) if central.is_file() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        let a = &self.alignment;
        if a.edge_tolerance < 0.0 || a.center_tolerance < 0.0 {
            return Err("alignment tolerances must be non-negative".to_string());
        }
        if a.row_break <= 0.0 {
            return Err("alignment.row_break must be greater than zero".to_string());
        }
        if !(0.0..=1.0).contains(&a.spacing_support) {
            return Err("alignment.spacing_support must be within 0.0-1.0".to_string());
        }
        let c = &self.classification;
        if c.min_confidence > 100 || c.library_confidence > 100 || c.high_confidence > 100 {
            return Err("classification thresholds must be within 0-100".to_string());
        }
        if c.min_confidence == 0 {
            return Err("classification.min_confidence must be greater than zero".to_string());
        }
        let v = &self.validation;
        if v.tolerance < 0.0 || v.high_severity < v.tolerance {
            return Err(
                "validation.high_severity must be >= validation.tolerance >= 0".to_string(),
            );
        }
        if self.contrast.aa <= 1.0 || self.contrast.aaa < self.contrast.aa {
            return Err("contrast thresholds must satisfy 1 < aa <= aaa".to_string());
        }
        if self.codegen.timeout.is_zero() {
            return Err("codegen.timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}
