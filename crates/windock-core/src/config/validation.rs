use crate::config::types::WindockConfig;
use crate::errors::ConfigError;

/// Validate the configuration.
pub fn validate_config(config: &WindockConfig) -> Result<(), ConfigError> {
    if config.monitor.poll_interval_ms == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "monitor.poll_interval_ms must be greater than 0".to_string(),
        });
    }

    if config.dynamic_titles.separators.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::InvalidConfiguration {
            message: "dynamic_titles.separators cannot contain empty strings".to_string(),
        });
    }

    if config.dynamic_titles.patterns.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::InvalidConfiguration {
            message: "dynamic_titles.patterns cannot contain empty strings".to_string(),
        });
    }

    for (label, rule) in &config.apps {
        if rule.patterns.is_empty() || rule.patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("apps.\"{}\" needs at least one non-empty pattern", label),
            });
        }
    }

    Ok(())
}
