use serde::Serialize;
use std::collections::HashSet;

/// Title used when neither the window list nor accessibility exposes one.
pub const PLACEHOLDER_TITLE: &str = "[No Title]";

/// Title macOS document apps give every new blank document.
pub const UNTITLED_TITLE: &str = "Untitled";

/// The only window-server layer holding ordinary application windows.
pub const NORMAL_WINDOW_LAYER: i64 = 0;

/// One live top-level window, recreated on every enumeration pass.
///
/// `(window_number, owner_pid)` identifies a window within one login
/// session; neither survives an application restart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WindowRecord {
    pub window_number: u32,
    pub owner_pid: i32,
    pub owner_app_name: String,
    pub title: String,
    pub owner_bundle_id: Option<String>,
    /// 1-based position among the owner's windows in this pass.
    pub positional_index: u32,
}

impl WindowRecord {
    /// Deduplication key within one snapshot.
    pub fn key(&self) -> (u32, i32) {
        (self.window_number, self.owner_pid)
    }
}

/// One entry of the window server's on-screen window list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWindow {
    pub window_number: u32,
    pub owner_pid: i32,
    pub layer: i64,
    /// `kCGWindowName`; absent without screen recording permission.
    pub title: Option<String>,
}

/// Identity of a running application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub bundle_id: Option<String>,
}

/// The set of windows seen in one enumeration pass, in enumeration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    windows: Vec<WindowRecord>,
}

impl Snapshot {
    /// Build a snapshot, dropping later duplicates of a `(window, pid)` key.
    pub fn new(windows: Vec<WindowRecord>) -> Self {
        let mut seen = HashSet::new();
        let windows = windows
            .into_iter()
            .filter(|w| seen.insert(w.key()))
            .collect();
        Self { windows }
    }

    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn find_by_number(&self, window_number: u32) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.window_number == window_number)
    }

    pub fn for_pid(&self, pid: i32) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter().filter(move |w| w.owner_pid == pid)
    }
}

/// Snapshots compare as sets of full records: a retitled window is a change,
/// a reordered list is not.
impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        if self.windows.len() != other.windows.len() {
            return false;
        }
        let ours: HashSet<&WindowRecord> = self.windows.iter().collect();
        other.windows.iter().all(|w| ours.contains(w))
    }
}

impl Eq for Snapshot {}

/// Result of one enumeration pass.
#[derive(Debug, Clone)]
pub struct SnapshotUpdate {
    pub snapshot: Snapshot,
    /// True when the snapshot differs from the previous one.
    pub changed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(window_number: u32, pid: i32, title: &str) -> WindowRecord {
        WindowRecord {
            window_number,
            owner_pid: pid,
            owner_app_name: "Code".to_string(),
            title: title.to_string(),
            owner_bundle_id: Some("com.microsoft.VSCode".to_string()),
            positional_index: 1,
        }
    }

    #[test]
    fn test_snapshot_drops_duplicate_keys() {
        let snapshot = Snapshot::new(vec![
            record(7, 100, "a"),
            record(7, 100, "b"),
            record(7, 200, "c"),
        ]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.windows()[0].title, "a");
        assert_eq!(snapshot.windows()[1].owner_pid, 200);
    }

    #[test]
    fn test_snapshot_equality_ignores_order() {
        let a = Snapshot::new(vec![record(1, 100, "a"), record(2, 100, "b")]);
        let b = Snapshot::new(vec![record(2, 100, "b"), record(1, 100, "a")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_snapshot_equality_sees_title_changes() {
        let a = Snapshot::new(vec![record(1, 100, "main.rs - proj")]);
        let b = Snapshot::new(vec![record(1, 100, "lib.rs - proj")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_find_by_number() {
        let snapshot = Snapshot::new(vec![record(1, 100, "a"), record(9, 100, "b")]);
        assert_eq!(snapshot.find_by_number(9).map(|w| w.title.as_str()), Some("b"));
        assert!(snapshot.find_by_number(3).is_none());
        assert_eq!(snapshot.for_pid(100).count(), 2);
    }
}
