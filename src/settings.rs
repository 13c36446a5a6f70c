use std::path::Path;
use std::time::Duration;

use dfc_lib::{Config, DfcError};

/// Flags that override values from the config file when given.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub tolerance: Option<f64>,
    pub timeout_secs: Option<u64>,
}

/// Load and validate config from the explicit path, the central path, or defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, DfcError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        DfcError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DfcError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Merge CLI flags over the loaded config; flags win when present.
pub fn resolve_config(mut config: Config, overrides: Overrides) -> Result<Config, DfcError> {
    if let Some(tolerance) = overrides.tolerance {
        config.validation.tolerance = tolerance;
        // Keep the severity split meaningful when the tolerance grows past it.
        if config.validation.high_severity < tolerance {
            config.validation.high_severity = tolerance;
        }
    }
    if let Some(secs) = overrides.timeout_secs {
        config.codegen.timeout = Duration::from_secs(secs);
    }
    config
        .validate()
        .map_err(|e| DfcError::Config(format!("Invalid flag value: {}", e)))?;
    Ok(config)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: alignment edge={}px center={}px, min_confidence={}, validation tolerance={}px high={}px, contrast aa={} aaa={}, codegen timeout={}s",
        config.alignment.edge_tolerance,
        config.alignment.center_tolerance,
        config.classification.min_confidence,
        config.validation.tolerance,
        config.validation.high_severity,
        config.contrast.aa,
        config.contrast.aaa,
        config.codegen.timeout.as_secs()
    )
}
