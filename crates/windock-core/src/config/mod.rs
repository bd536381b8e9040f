//! # Configuration System
//!
//! Runtime paths come from the environment ([`Config`]); tunables come from an
//! optional TOML file ([`WindockConfig`]).
//!
//! ## Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.windock/config.toml`
//! 3. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.windock/config.toml
//! [monitor]
//! poll_interval_ms = 2000
//! cleanup_on_exit = true
//!
//! [dynamic_titles]
//! patterns = ["vscode", "microsoft.code"]
//! separators = [" — ", " - "]
//!
//! [apps."Zed"]
//! patterns = ["dev.zed"]
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{AppRuleConfig, Config, DynamicTitlesConfig, MonitorConfig, WindockConfig};
pub use validation::validate_config;

impl WindockConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
