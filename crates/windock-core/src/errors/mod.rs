use std::error::Error;

/// macOS privacy permission an operation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Window titles and raising windows.
    Accessibility,
    /// Window titles in the on-screen window list.
    ScreenRecording,
}

impl Permission {
    /// Where the user grants the permission.
    pub fn settings_path(&self) -> &'static str {
        match self {
            Permission::Accessibility => "System Settings > Privacy & Security > Accessibility",
            Permission::ScreenRecording => {
                "System Settings > Privacy & Security > Screen Recording"
            }
        }
    }
}

/// Base trait for all application errors
pub trait WindockError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }

    /// Permission whose absence usually explains this error.
    fn required_permission(&self) -> Option<Permission> {
        None
    }
}

/// Common result type for the application
pub type WindockResult<T> = Result<T, Box<dyn WindockError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at '{path}'")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl WindockError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. } | ConfigError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_error() {
        let error = ConfigError::ConfigParseError {
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse config file: invalid TOML syntax"
        );
        assert_eq!(error.error_code(), "CONFIG_PARSE_ERROR");
        assert!(error.is_user_error());
        assert_eq!(error.required_permission(), None);
    }

    #[test]
    fn test_boxed_errors_keep_their_code() {
        let result: WindockResult<()> = Err(Box::new(ConfigError::InvalidConfiguration {
            message: "poll_interval_ms must be greater than 0".to_string(),
        }));
        let error = result.unwrap_err();
        assert_eq!(error.error_code(), "INVALID_CONFIGURATION");
        assert!(error.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_permission_settings_paths() {
        assert!(
            Permission::ScreenRecording
                .settings_path()
                .ends_with("Screen Recording")
        );
        assert!(Permission::Accessibility.settings_path().ends_with("Accessibility"));
    }
}
