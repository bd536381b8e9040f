use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::identity::artifact_name;

/// One helper artifact on disk and the identity captured when it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelperRecord {
    pub helper_name: String,
    /// Window title at creation time; the helper's display name.
    pub title: String,
    pub original_bundle_id: String,
    /// Window number at creation time. Meaningless after the owning
    /// application restarts.
    pub captured_window_number: u32,
    pub captured_project_name: Option<String>,
    /// RFC 3339 creation time, when the manifest records one.
    pub created_at: Option<String>,
    pub path: PathBuf,
}

impl HelperRecord {
    /// Directory name of the artifact, the key of the helper index.
    pub fn artifact_name(&self) -> String {
        artifact_name(&self.helper_name)
    }
}

/// A best-effort step that failed without failing the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleWarning {
    #[error("Failed to write helper artifact '{}': {message}", path.display())]
    ArtifactWriteFailed { path: PathBuf, message: String },

    #[error("Failed to delete helper artifact '{}': {message}", path.display())]
    ArtifactRemoveFailed { path: PathBuf, message: String },

    #[error("Skipped unreadable helper artifact '{}': {message}", path.display())]
    ArtifactUnreadable { path: PathBuf, message: String },

    #[error("Cannot read helpers directory '{}': {message}", path.display())]
    HelpersDirUnreadable { path: PathBuf, message: String },

    #[error("No icon found for '{bundle_id}'")]
    IconNotFound { bundle_id: String },

    #[error("Failed to copy icon '{}': {message}", path.display())]
    IconCopyFailed { path: PathBuf, message: String },

    #[error("Failed to add dock tile for '{}': {message}", path.display())]
    RegistryAddFailed { path: PathBuf, message: String },

    #[error("Failed to remove dock tiles: {message}")]
    RegistryRemoveFailed { message: String },

    #[error("Failed to refresh the dock: {message}")]
    RegistryRefreshFailed { message: String },
}

/// Outcome of a lifecycle operation that did not hard-fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    /// True when the artifact set or the registry was mutated, so a
    /// registry refresh is due.
    pub changed: bool,
    pub warnings: Vec<LifecycleWarning>,
}

impl LifecycleReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a soft failure.
    pub fn warn(&mut self, warning: LifecycleWarning) {
        warn!(
            event = "core.helper.step_failed",
            warning = %warning
        );
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Fold another report into this one.
    pub fn absorb(&mut self, other: LifecycleReport) {
        self.changed |= other.changed;
        self.warnings.extend(other.warnings);
    }
}
