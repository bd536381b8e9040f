//! Enabled-application preferences file.
//!
//! Written atomically: serialize to a `.tmp` sibling, then rename.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::FilterError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub enabled_apps: BTreeSet<String>,
}

fn cleanup_temp_file(temp_file: &Path, original_error: &io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.filter.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err
        );
    }
}

/// Load preferences, or `None` when the file does not exist yet.
pub fn load_preferences(path: &Path) -> Result<Option<Preferences>, FilterError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| FilterError::PreferencesParseError {
            message: format!("{}: {}", path.display(), e),
        })
}

pub fn save_preferences(path: &Path, preferences: &Preferences) -> Result<(), FilterError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(preferences)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let temp_file = path.with_extension("json.tmp");

    if let Err(e) = fs::write(&temp_file, json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            load_preferences(&temp.path().join("preferences.json")).unwrap(),
            None
        );
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/preferences.json");
        let preferences = Preferences {
            enabled_apps: ["Xcode".to_string(), "iTerm".to_string()].into(),
        };

        save_preferences(&path, &preferences).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(load_preferences(&path).unwrap(), Some(preferences));
    }

    #[test]
    fn test_temp_file_cleaned_up_when_rename_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        fs::create_dir_all(&path).unwrap();

        assert!(save_preferences(&path, &Preferences::default()).is_err());
        assert!(!temp.path().join("preferences.json.tmp").exists());
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_preferences(&path),
            Err(FilterError::PreferencesParseError { .. })
        ));
    }
}
