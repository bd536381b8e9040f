use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::errors::WindowError;
use super::source::WindowSource;
use super::types::{
    AppInfo, NORMAL_WINDOW_LAYER, PLACEHOLDER_TITLE, Snapshot, SnapshotUpdate, UNTITLED_TITLE,
    WindowRecord,
};

/// Default interval between enumeration passes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Fallback titles for one process, fetched at most once per pass.
///
/// Titles are handed out first-free-slot: the n-th title-less window of a
/// process gets the n-th unclaimed accessibility title. Nothing ties the two
/// together, so a process with several title-less windows at once can end up
/// with titles swapped between them.
#[derive(Default)]
struct TitleQueue {
    accessibility: Option<VecDeque<String>>,
    scripted: Option<VecDeque<String>>,
}

impl TitleQueue {
    fn next_title<S: WindowSource>(
        &mut self,
        source: &S,
        pid: i32,
        bundle_id: Option<&str>,
        claimed: &[String],
    ) -> Option<String> {
        let accessibility = self.accessibility.get_or_insert_with(|| {
            match source.accessibility_titles(pid) {
                Ok(titles) => unclaimed(titles, claimed),
                Err(e) => {
                    debug!(
                        event = "core.window.accessibility_titles_failed",
                        pid = pid,
                        error = %e
                    );
                    VecDeque::new()
                }
            }
        });
        if let Some(title) = accessibility.pop_front() {
            return Some(title);
        }

        let scripted = self.scripted.get_or_insert_with(|| {
            let Some(bundle_id) = bundle_id else {
                return VecDeque::new();
            };
            match source.scripted_titles(bundle_id) {
                Ok(titles) => unclaimed(titles, claimed),
                Err(e) => {
                    debug!(
                        event = "core.window.scripted_titles_failed",
                        pid = pid,
                        bundle_id = bundle_id,
                        error = %e
                    );
                    VecDeque::new()
                }
            }
        });
        scripted.pop_front()
    }
}

/// Drop empty titles and one occurrence of every title the window list
/// already reported for this process.
fn unclaimed(titles: Vec<String>, claimed: &[String]) -> VecDeque<String> {
    let mut queue: VecDeque<String> = titles.into_iter().filter(|t| !t.is_empty()).collect();
    for taken in claimed {
        if let Some(pos) = queue.iter().position(|t| t == taken) {
            queue.remove(pos);
        }
    }
    queue
}

/// Run one enumeration pass against `source`.
///
/// Only layer-0 windows whose owning process resolves are kept. Title
/// resolution order: window list, accessibility (positional), scripting
/// bridge, then [`PLACEHOLDER_TITLE`]. A bare "Untitled" becomes
/// "Untitled-<window number>".
pub fn build_snapshot<S: WindowSource>(source: &S) -> Result<Snapshot, WindowError> {
    let raw = source.list_windows()?;

    let normal: Vec<_> = raw
        .into_iter()
        .filter(|w| w.layer == NORMAL_WINDOW_LAYER)
        .collect();

    let mut claimed: HashMap<i32, Vec<String>> = HashMap::new();
    for window in &normal {
        if let Some(title) = window.title.as_ref().filter(|t| !t.is_empty()) {
            claimed
                .entry(window.owner_pid)
                .or_default()
                .push(title.clone());
        }
    }

    let mut apps: HashMap<i32, Option<AppInfo>> = HashMap::new();
    let mut fallback_titles: HashMap<i32, TitleQueue> = HashMap::new();
    let mut positions: HashMap<i32, u32> = HashMap::new();
    let mut records = Vec::with_capacity(normal.len());
    let mut unresolved_count = 0;

    for window in normal {
        let pid = window.owner_pid;
        let app = apps
            .entry(pid)
            .or_insert_with(|| source.app_info(pid))
            .clone();
        let Some(app) = app else {
            unresolved_count += 1;
            continue;
        };

        let mut title = window.title.unwrap_or_default();
        if title.is_empty() {
            let claimed_titles = claimed.get(&pid).map(Vec::as_slice).unwrap_or(&[]);
            title = fallback_titles
                .entry(pid)
                .or_default()
                .next_title(source, pid, app.bundle_id.as_deref(), claimed_titles)
                .unwrap_or_default();
        }
        if title.is_empty() {
            title = PLACEHOLDER_TITLE.to_string();
        }
        if title == UNTITLED_TITLE {
            title = format!("{}-{}", UNTITLED_TITLE, window.window_number);
        }

        let position = positions.entry(pid).or_insert(0);
        *position += 1;

        records.push(WindowRecord {
            window_number: window.window_number,
            owner_pid: pid,
            owner_app_name: app.name,
            title,
            owner_bundle_id: app.bundle_id,
            positional_index: *position,
        });
    }

    if unresolved_count > 0 {
        debug!(
            event = "core.window.owner_unresolved",
            skipped_count = unresolved_count
        );
    }

    Ok(Snapshot::new(records))
}

/// Polls a [`WindowSource`] and reports when the window set changes.
///
/// Cooperative: nothing here sleeps. Callers drive it from their own loop
/// with [`WindowEnumerator::poll`], or force a pass with
/// [`WindowEnumerator::refresh`].
pub struct WindowEnumerator<S> {
    source: S,
    interval: Duration,
    current: Snapshot,
    last_poll: Option<Instant>,
}

impl<S: WindowSource> WindowEnumerator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: DEFAULT_POLL_INTERVAL,
            current: Snapshot::default(),
            last_poll: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Latest successfully enumerated snapshot.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// One enumeration pass without touching the stored snapshot.
    pub fn enumerate(&self) -> Result<Snapshot, WindowError> {
        build_snapshot(&self.source)
    }

    /// Force an enumeration pass now.
    ///
    /// A failed pass keeps the previous snapshot and reports no change.
    pub fn refresh(&mut self) -> SnapshotUpdate {
        self.refresh_at(Instant::now())
    }

    /// Enumerate if the polling interval has elapsed since the last pass.
    pub fn poll(&mut self, now: Instant) -> Option<SnapshotUpdate> {
        if self.time_until_next_poll(now) > Duration::ZERO {
            return None;
        }
        Some(self.refresh_at(now))
    }

    /// How long until [`WindowEnumerator::poll`] will enumerate again.
    pub fn time_until_next_poll(&self, now: Instant) -> Duration {
        match self.last_poll {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    fn refresh_at(&mut self, now: Instant) -> SnapshotUpdate {
        self.last_poll = Some(now);

        match build_snapshot(&self.source) {
            Ok(snapshot) => {
                let changed = snapshot != self.current;
                if changed {
                    info!(
                        event = "core.window.snapshot_changed",
                        previous_count = self.current.len(),
                        count = snapshot.len()
                    );
                    self.current = snapshot;
                }
                SnapshotUpdate {
                    snapshot: self.current.clone(),
                    changed,
                }
            }
            Err(e) => {
                warn!(
                    event = "core.window.enumeration_failed",
                    error = %e,
                    message = "Keeping previous snapshot"
                );
                SnapshotUpdate {
                    snapshot: self.current.clone(),
                    changed: false,
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::super::errors::WindowError;
    use super::super::source::WindowSource;
    use super::super::types::{AppInfo, RawWindow};

    /// Scripted window server for tests.
    #[derive(Default)]
    pub struct FakeSource {
        pub windows: RefCell<Vec<RawWindow>>,
        pub apps: HashMap<i32, AppInfo>,
        pub ax_titles: HashMap<i32, Vec<String>>,
        pub scripted: HashMap<String, Vec<String>>,
        pub fail_listing: RefCell<bool>,
        pub ax_calls: RefCell<u32>,
    }

    impl FakeSource {
        pub fn window(number: u32, pid: i32, layer: i64, title: &str) -> RawWindow {
            RawWindow {
                window_number: number,
                owner_pid: pid,
                layer,
                title: (!title.is_empty()).then(|| title.to_string()),
            }
        }

        pub fn with_app(mut self, pid: i32, name: &str, bundle_id: Option<&str>) -> Self {
            self.apps.insert(
                pid,
                AppInfo {
                    name: name.to_string(),
                    bundle_id: bundle_id.map(String::from),
                },
            );
            self
        }

        pub fn with_windows(self, windows: Vec<RawWindow>) -> Self {
            *self.windows.borrow_mut() = windows;
            self
        }
    }

    impl WindowSource for FakeSource {
        fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError> {
            if *self.fail_listing.borrow() {
                return Err(WindowError::EnumerationFailed {
                    message: "window server unavailable".to_string(),
                });
            }
            Ok(self.windows.borrow().clone())
        }

        fn app_info(&self, pid: i32) -> Option<AppInfo> {
            self.apps.get(&pid).cloned()
        }

        fn accessibility_titles(&self, pid: i32) -> Result<Vec<String>, WindowError> {
            *self.ax_calls.borrow_mut() += 1;
            self.ax_titles
                .get(&pid)
                .cloned()
                .ok_or(WindowError::AccessibilityFailed {
                    pid,
                    message: "not trusted".to_string(),
                })
        }

        fn scripted_titles(&self, bundle_id: &str) -> Result<Vec<String>, WindowError> {
            Ok(self.scripted.get(bundle_id).cloned().unwrap_or_default())
        }
    }
}
