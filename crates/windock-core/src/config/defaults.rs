//! Default implementations for configuration types.

use crate::config::types::{Config, DynamicTitlesConfig, MonitorConfig};
use std::path::{Component, Path, PathBuf};

/// Directory name under the platform data directory.
pub const DATA_DIR_NAME: &str = "WindowsOnDock";

/// Returns the default enumeration interval (2000ms).
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_poll_interval_ms() -> u64 {
    2000
}

pub fn default_cleanup_on_exit() -> bool {
    true
}

/// Bundle identifier substrings of editors that put the open file in the
/// window title.
pub fn default_dynamic_patterns() -> Vec<String> {
    [
        "vscode",
        "microsoft.code",
        "jetbrains",
        "intellij",
        "pycharm",
        "webstorm",
        "xcode",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Em dash, en dash, then hyphen; editors disagree on which one they use.
pub fn default_title_separators() -> Vec<String> {
    [" — ", " – ", " - "].into_iter().map(String::from).collect()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            cleanup_on_exit: default_cleanup_on_exit(),
        }
    }
}

impl Default for DynamicTitlesConfig {
    fn default() -> Self {
        Self {
            patterns: default_dynamic_patterns(),
            separators: default_title_separators(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = match std::env::var_os("WINDOCK_DATA_DIR") {
            Some(dir) if !dir.is_empty() => absolute_dir(Path::new(&dir)),
            _ => match dirs::data_dir() {
                Some(dir) => dir.join(DATA_DIR_NAME),
                None => {
                    eprintln!(
                        "Warning: Could not find a data directory. Set WINDOCK_DATA_DIR or HOME. \
                        Using fallback directory."
                    );
                    std::env::temp_dir().join(DATA_DIR_NAME)
                }
            },
        };

        Self {
            data_dir,
            log_level: std::env::var("WINDOCK_LOG_LEVEL").unwrap_or("info".to_string()),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime config rooted at an explicit directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir: PathBuf = data_dir.into();
        Self {
            data_dir: absolute_dir(&data_dir),
            log_level: "info".to_string(),
        }
    }

    pub fn helpers_dir(&self) -> PathBuf {
        self.data_dir.join("Helpers")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.data_dir.join("preferences.json")
    }
}

/// Resolve `path` against the working directory and drop `.`/`..`
/// components.
///
/// Dock tiles record absolute locations, so helper paths must be absolute
/// for tiles to be matched back to their artifacts.
pub fn absolute_dir(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }
}
