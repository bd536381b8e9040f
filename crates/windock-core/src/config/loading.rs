//! Configuration loading and merging logic.
//!
//! A missing config file is not an error; an unreadable or malformed one is.

use crate::config::types::{DynamicTitlesConfig, MonitorConfig, WindockConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Load configuration from defaults and the user config file
/// (`~/.windock/config.toml`), then validate the result.
pub fn load_hierarchy() -> Result<WindockConfig, ConfigError> {
    let mut config = WindockConfig::default();

    if let Some(path) = user_config_path() {
        match load_config_file(&path) {
            Ok(user_config) => config = merge_configs(config, user_config),
            Err(ConfigError::ConfigNotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    validate_config(&config)?;

    Ok(config)
}

/// Location of the user config file, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".windock").join("config.toml"))
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<WindockConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::IoError { source: e }
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

/// Merge two configurations, with `override_config` taking precedence.
///
/// App rules are merged per label with the override winning.
pub fn merge_configs(base: WindockConfig, override_config: WindockConfig) -> WindockConfig {
    WindockConfig {
        monitor: MonitorConfig {
            poll_interval_ms: override_config.monitor.poll_interval_ms,
            cleanup_on_exit: override_config.monitor.cleanup_on_exit,
        },
        dynamic_titles: DynamicTitlesConfig {
            patterns: override_config.dynamic_titles.patterns,
            separators: override_config.dynamic_titles.separators,
        },
        apps: {
            let mut merged = base.apps;
            merged.extend(override_config.apps);
            merged
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::AppRuleConfig;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_file_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_config_file(&temp_dir.path().join("config.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[monitor\npoll_interval_ms = ").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_config_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[monitor]\npoll_interval_ms = 500\n\n[apps.\"Zed\"]\npatterns = [\"dev.zed\"]\n",
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.monitor.poll_interval_ms, 500);
        assert!(config.monitor.cleanup_on_exit);
        assert_eq!(config.apps["Zed"].patterns, vec!["dev.zed".to_string()]);
    }

    #[test]
    fn test_merge_configs_app_rules() {
        let mut base = WindockConfig::default();
        base.apps.insert(
            "Zed".to_string(),
            AppRuleConfig {
                patterns: vec!["dev.zed".to_string()],
            },
        );
        base.apps.insert(
            "Nova".to_string(),
            AppRuleConfig {
                patterns: vec!["panic.nova".to_string()],
            },
        );

        let mut override_config = WindockConfig::default();
        override_config.monitor.poll_interval_ms = 750;
        override_config.apps.insert(
            "Zed".to_string(),
            AppRuleConfig {
                patterns: vec!["dev.zed.preview".to_string()],
            },
        );

        let merged = merge_configs(base, override_config);
        assert_eq!(merged.monitor.poll_interval_ms, 750);
        assert_eq!(merged.apps.len(), 2);
        assert_eq!(
            merged.apps["Zed"].patterns,
            vec!["dev.zed.preview".to_string()]
        );
        assert_eq!(merged.apps["Nova"].patterns, vec!["panic.nova".to_string()]);
    }
}
