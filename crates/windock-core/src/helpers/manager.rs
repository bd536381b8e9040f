use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use super::bundle::{HelperManifest, icon_path, read_artifact, write_artifact};
use super::errors::HelperError;
use super::icon::{AppLocator, resolve_icon};
use super::types::{HelperRecord, LifecycleReport, LifecycleWarning};
use crate::config::defaults::absolute_dir;
use crate::dock::{DockRegistry, remove_tiles_where};
use crate::identity::{
    DynamicTitleRules, HELPER_EXTENSION, HELPER_PREFIX, HelperMatch, artifact_name, find_existing_helper,
    helper_name_for, is_helper_artifact_name,
};
use crate::windows::WindowRecord;

/// Wait after shutdown cleanup so the dock finishes restarting before the
/// process exits.
pub const SHUTDOWN_SETTLE: Duration = Duration::from_millis(1500);

/// Owns the helper index and every mutation of helper artifacts and their
/// dock tiles.
///
/// Operations run synchronously to completion. Registry refreshes are left
/// to the caller (see [`HelperManager::refresh_registry`] and the batch
/// operations) so that one batch costs one dock restart.
pub struct HelperManager<R, L> {
    helpers_dir: PathBuf,
    registry: R,
    locator: L,
    rules: DynamicTitleRules,
    pub(super) shutdown_settle: Duration,
    index: BTreeMap<String, HelperRecord>,
}

impl<R: DockRegistry, L: AppLocator> HelperManager<R, L> {
    /// Create a manager and load the helpers already on disk.
    ///
    /// A relative `helpers_dir` is resolved against the working directory.
    pub fn new(helpers_dir: impl Into<PathBuf>, registry: R, locator: L) -> Self {
        let helpers_dir: PathBuf = helpers_dir.into();
        let mut manager = Self {
            helpers_dir: absolute_dir(&helpers_dir),
            registry,
            locator,
            rules: DynamicTitleRules::default(),
            shutdown_settle: SHUTDOWN_SETTLE,
            index: BTreeMap::new(),
        };
        manager.reload();
        manager
    }

    pub fn with_rules(mut self, rules: DynamicTitleRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_shutdown_settle(mut self, settle: Duration) -> Self {
        self.shutdown_settle = settle;
        self
    }

    pub fn helpers_dir(&self) -> &Path {
        &self.helpers_dir
    }

    pub fn rules(&self) -> &DynamicTitleRules {
        &self.rules
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// The helper index, keyed by artifact directory name.
    pub fn index(&self) -> &BTreeMap<String, HelperRecord> {
        &self.index
    }

    pub fn helpers(&self) -> impl Iterator<Item = &HelperRecord> {
        self.index.values()
    }

    pub fn has_any_helpers(&self) -> bool {
        !self.index.is_empty()
    }

    pub fn find_helper(&self, window: &WindowRecord) -> Option<HelperMatch<'_>> {
        find_existing_helper(window, &self.index, &self.rules)
    }

    pub fn has_helper(&self, window: &WindowRecord) -> bool {
        self.find_helper(window).is_some()
    }

    /// Rebuild the index from the helpers directory.
    ///
    /// Artifacts whose manifest cannot be read are still indexed by name so
    /// they can be matched and removed.
    pub fn reload(&mut self) -> LifecycleReport {
        let mut report = LifecycleReport::new();
        self.index.clear();

        let entries = match fs::read_dir(&self.helpers_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return report,
            Err(e) => {
                report.warn(LifecycleWarning::HelpersDirUnreadable {
                    path: self.helpers_dir.clone(),
                    message: e.to_string(),
                });
                return report;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !is_helper_artifact_name(&file_name) || !path.is_dir() {
                continue;
            }

            let record = match read_artifact(&path) {
                Ok(record) => record,
                Err(message) => {
                    report.warn(LifecycleWarning::ArtifactUnreadable {
                        path: path.clone(),
                        message,
                    });
                    name_only_record(&file_name, path)
                }
            };
            self.index.insert(file_name, record);
        }

        debug!(
            event = "core.helper.reload_completed",
            count = self.index.len(),
            warnings = report.warnings.len()
        );
        report
    }

    /// Create the helper for `window` and add its dock tile.
    ///
    /// Fails only when the window has no bundle identifier. A helper that
    /// could not be written is reported as a warning and left out of the
    /// index; a missing icon or a failed dock write only degrades it.
    pub fn create(&mut self, window: &WindowRecord) -> Result<LifecycleReport, HelperError> {
        let bundle_id = window
            .owner_bundle_id
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| HelperError::MissingIdentity {
                title: window.title.clone(),
            })?;

        let helper_name = helper_name_for(window);
        info!(
            event = "core.helper.create_started",
            helper_name = %helper_name,
            bundle_id = bundle_id,
            window_number = window.window_number
        );

        let mut report = LifecycleReport::new();
        let key = artifact_name(&helper_name);
        // Names differing only by case share one directory on a
        // case-insensitive volume, so the older helper is replaced.
        if let Some(existing) = self.case_variant_of(&key) {
            debug!(
                event = "core.helper.case_variant_replaced",
                existing = %existing.display(),
                artifact = %key
            );
            report.absorb(self.remove_artifact(&existing));
        }
        let project = self.rules.project_for(Some(bundle_id), &window.title);
        let manifest = HelperManifest::new(
            helper_name.clone(),
            window.title.clone(),
            bundle_id,
            window.window_number,
            project,
        );

        let artifact = match write_artifact(&self.helpers_dir, &manifest) {
            Ok(artifact) => artifact,
            Err(e) => {
                report.warn(LifecycleWarning::ArtifactWriteFailed {
                    path: self.helpers_dir.join(&key),
                    message: e.to_string(),
                });
                return Ok(report);
            }
        };
        report.changed = true;

        self.copy_icon(bundle_id, &artifact, &mut report);

        if !self.index.contains_key(&key)
            && let Err(e) = self.registry.add_tile(&artifact)
        {
            report.warn(LifecycleWarning::RegistryAddFailed {
                path: artifact.clone(),
                message: e.to_string(),
            });
        }

        self.index.insert(key, manifest.into_record(artifact));

        info!(
            event = "core.helper.create_completed",
            helper_name = %helper_name,
            warnings = report.warnings.len()
        );
        Ok(report)
    }

    /// Remove the helper representing `window`, if there is one.
    pub fn remove(&mut self, window: &WindowRecord) -> LifecycleReport {
        let Some(found) = self.find_helper(window) else {
            debug!(
                event = "core.helper.remove_skipped",
                window_number = window.window_number,
                reason = "no_helper"
            );
            return LifecycleReport::new();
        };
        let path = found.helper.path.clone();
        self.remove_artifact(&path)
    }

    /// Remove the helper stored at `path` (an entry of the index).
    pub fn remove_artifact(&mut self, path: &Path) -> LifecycleReport {
        let mut report = LifecycleReport::new();
        let dir_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!(
            event = "core.helper.remove_started",
            artifact = %dir_name
        );

        let helpers_dir = self.helpers_dir.clone();
        match remove_tiles_where(&mut self.registry, |tile| {
            tile.points_at(&helpers_dir, &dir_name)
        }) {
            Ok(removed) => debug!(event = "core.helper.tiles_removed", count = removed),
            Err(e) => report.warn(LifecycleWarning::RegistryRemoveFailed {
                message: e.to_string(),
            }),
        }

        remove_dir(path, &mut report);
        self.index.retain(|_, record| record.path != path);
        report.changed = true;

        info!(
            event = "core.helper.remove_completed",
            artifact = %dir_name,
            warnings = report.warnings.len()
        );
        report
    }

    /// Remove every helper tile from the dock, delete every application
    /// bundle in the helpers directory and reset the index.
    pub fn remove_all(&mut self) -> LifecycleReport {
        let mut report = LifecycleReport::new();
        info!(
            event = "core.helper.remove_all_started",
            count = self.index.len()
        );

        let helpers_dir = self.helpers_dir.clone();
        match remove_tiles_where(&mut self.registry, |tile| {
            tile.points_at_any_helper(&helpers_dir)
        }) {
            Ok(removed) => {
                report.changed |= removed > 0;
            }
            Err(e) => report.warn(LifecycleWarning::RegistryRemoveFailed {
                message: e.to_string(),
            }),
        }

        match fs::read_dir(&self.helpers_dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == HELPER_EXTENSION) {
                        remove_dir(&path, &mut report);
                        report.changed = true;
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => report.warn(LifecycleWarning::HelpersDirUnreadable {
                path: self.helpers_dir.clone(),
                message: e.to_string(),
            }),
        }

        report.changed |= !self.index.is_empty();
        self.index.clear();

        info!(
            event = "core.helper.remove_all_completed",
            warnings = report.warnings.len()
        );
        report
    }

    /// Make the dock reload its configuration.
    pub fn refresh_registry(&mut self) -> LifecycleReport {
        let mut report = LifecycleReport::new();
        if let Err(e) = self.registry.refresh() {
            report.warn(LifecycleWarning::RegistryRefreshFailed {
                message: e.to_string(),
            });
        }
        report
    }

    /// Path of an indexed helper whose artifact name equals `key` ignoring
    /// case but is not `key` itself.
    fn case_variant_of(&self, key: &str) -> Option<PathBuf> {
        let folded = key.to_lowercase();
        self.index
            .iter()
            .find(|(name, _)| name.as_str() != key && name.to_lowercase() == folded)
            .map(|(_, record)| record.path.clone())
    }

    fn copy_icon(&self, bundle_id: &str, artifact: &Path, report: &mut LifecycleReport) {
        let Some(icon) = self
            .locator
            .app_bundle_path(bundle_id)
            .and_then(|app| resolve_icon(&app))
        else {
            report.warn(LifecycleWarning::IconNotFound {
                bundle_id: bundle_id.to_string(),
            });
            return;
        };

        if let Err(e) = fs::copy(&icon, icon_path(artifact)) {
            report.warn(LifecycleWarning::IconCopyFailed {
                path: icon,
                message: e.to_string(),
            });
        }
    }
}

fn remove_dir(path: &Path, report: &mut LifecycleReport) {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => report.warn(LifecycleWarning::ArtifactRemoveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// Index entry for an artifact whose manifest could not be read.
fn name_only_record(file_name: &str, path: PathBuf) -> HelperRecord {
    let helper_name = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
        .to_string();
    HelperRecord {
        title: helper_name
            .strip_prefix(HELPER_PREFIX)
            .unwrap_or(&helper_name)
            .to_string(),
        helper_name,
        original_bundle_id: String::new(),
        captured_window_number: 0,
        captured_project_name: None,
        created_at: None,
        path,
    }
}
