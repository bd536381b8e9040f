//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [monitor]
//! poll_interval_ms = 2000
//!
//! [dynamic_titles]
//! patterns = ["vscode", "jetbrains"]
//!
//! [apps."Sublime Text"]
//! patterns = ["sublimetext", "sublime"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Runtime configuration derived from environment variables and system
/// defaults, not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for helper artifacts and preferences
    /// (default: `~/Library/Application Support/WindowsOnDock`)
    pub data_dir: PathBuf,
    /// Log level for the application
    pub log_level: String,
}

/// Main configuration loaded from `~/.windock/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WindockConfig {
    /// Window polling behaviour
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Applications whose window titles change with the open document
    #[serde(default)]
    pub dynamic_titles: DynamicTitlesConfig,

    /// Extra application match rules, keyed by display label.
    /// An entry with a built-in label replaces that label's patterns.
    #[serde(default)]
    pub apps: BTreeMap<String, AppRuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    /// Interval between window enumeration passes.
    /// Default: 2000ms.
    #[serde(default = "super::defaults::default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Remove every helper when the watch loop exits.
    /// Default: true.
    #[serde(default = "super::defaults::default_cleanup_on_exit")]
    pub cleanup_on_exit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DynamicTitlesConfig {
    /// Case-insensitive bundle identifier substrings.
    #[serde(default = "super::defaults::default_dynamic_patterns")]
    pub patterns: Vec<String>,

    /// Title separators, tried in order.
    #[serde(default = "super::defaults::default_title_separators")]
    pub separators: Vec<String>,
}

/// One `[apps."<label>"]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppRuleConfig {
    /// Case-insensitive bundle identifier substrings.
    pub patterns: Vec<String>,
}
