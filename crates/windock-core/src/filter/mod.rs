//! Which applications' windows are offered for helpers.

pub mod errors;
pub mod persistence;
pub mod rules;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::WindockConfig;
use crate::windows::WindowRecord;

pub use errors::FilterError;
pub use persistence::{Preferences, load_preferences, save_preferences};
pub use rules::{DEFAULT_ENABLED_APPS, MatchRule, builtin_rules, merged_rules};

/// Known application rules plus the user's enabled subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFilter {
    rules: Vec<MatchRule>,
    enabled: BTreeSet<String>,
    path: Option<PathBuf>,
}

impl AppFilter {
    /// Filter over `rules` with the default enabled subset, not persisted.
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self {
            rules,
            enabled: default_enabled(),
            path: None,
        }
    }

    /// Load the enabled subset from `path`, falling back to the defaults
    /// when the file does not exist. Changes are saved back to `path`.
    pub fn load(path: &Path, config: &WindockConfig) -> Result<Self, FilterError> {
        let enabled = load_preferences(path)?
            .map(|p| p.enabled_apps)
            .unwrap_or_else(default_enabled);
        Ok(Self {
            rules: merged_rules(&config.apps),
            enabled,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn is_app_enabled(&self, label: &str) -> bool {
        self.enabled.contains(label)
    }

    /// True when an enabled rule matches the bundle identifier.
    pub fn is_app_supported(&self, bundle_id: &str) -> bool {
        self.rules
            .iter()
            .filter(|r| self.enabled.contains(&r.label))
            .any(|r| r.matches(bundle_id))
    }

    /// Windows whose application is supported.
    pub fn supported_windows<'a>(
        &'a self,
        windows: impl IntoIterator<Item = &'a WindowRecord>,
    ) -> impl Iterator<Item = &'a WindowRecord> {
        windows.into_iter().filter(|w| {
            w.owner_bundle_id
                .as_deref()
                .is_some_and(|b| self.is_app_supported(b))
        })
    }

    /// Flip a label on or off and persist. Returns the new state.
    pub fn toggle_app(&mut self, label: &str) -> Result<bool, FilterError> {
        let enabled = !self.is_app_enabled(label);
        self.set_app_enabled(label, enabled)?;
        Ok(enabled)
    }

    pub fn set_app_enabled(&mut self, label: &str, enabled: bool) -> Result<(), FilterError> {
        let rule = self
            .rules
            .iter()
            .find(|r| r.label.eq_ignore_ascii_case(label))
            .ok_or_else(|| FilterError::UnknownApp {
                label: label.to_string(),
            })?;
        let label = rule.label.clone();

        if enabled {
            self.enabled.insert(label.clone());
        } else {
            self.enabled.remove(&label);
        }
        info!(
            event = "core.filter.app_toggled",
            label = %label,
            enabled = enabled
        );
        self.save()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), FilterError> {
        self.enabled = default_enabled();
        info!(event = "core.filter.reset_completed");
        self.save()
    }

    fn save(&self) -> Result<(), FilterError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        save_preferences(
            path,
            &Preferences {
                enabled_apps: self.enabled.clone(),
            },
        )
    }
}

impl Default for AppFilter {
    fn default() -> Self {
        Self::new(builtin_rules())
    }
}

fn default_enabled() -> BTreeSet<String> {
    DEFAULT_ENABLED_APPS.iter().map(|s| s.to_string()).collect()
}
