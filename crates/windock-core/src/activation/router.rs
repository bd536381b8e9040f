use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::errors::ActivationError;
use super::types::{ActivationOutcome, ActivationRequest, WindowMatch};

/// Wait between foregrounding an application and reading its windows.
pub const FOCUS_SETTLE: Duration = Duration::from_millis(200);

/// Separator between the file and project parts of editor titles.
pub const SEARCH_KEY_SEPARATOR: &str = " — ";

/// Platform operations the router needs.
pub trait AppActivator {
    /// Bring the application forward. Returns its PID, or `None` when no
    /// running application has the bundle identifier.
    fn activate_app(&self, bundle_id: &str) -> Result<Option<i32>, ActivationError>;

    /// The application's window titles in accessibility order.
    fn window_titles(&self, pid: i32) -> Result<Vec<String>, ActivationError>;

    /// Raise the window at `index` and focus it.
    fn raise_window(&self, pid: i32, index: usize) -> Result<(), ActivationError>;
}

impl<A: AppActivator + ?Sized> AppActivator for &A {
    fn activate_app(&self, bundle_id: &str) -> Result<Option<i32>, ActivationError> {
        (**self).activate_app(bundle_id)
    }

    fn window_titles(&self, pid: i32) -> Result<Vec<String>, ActivationError> {
        (**self).window_titles(pid)
    }

    fn raise_window(&self, pid: i32, index: usize) -> Result<(), ActivationError> {
        (**self).raise_window(pid, index)
    }
}

/// Substring used when no window title matches exactly.
///
/// The second `" — "` segment with any trailing `" (...)"` cut off, or the
/// whole title when there is no separator.
pub fn activation_search_key(title: &str) -> String {
    let mut segments = title.split(SEARCH_KEY_SEPARATOR);
    let (Some(_), Some(second)) = (segments.next(), segments.next()) else {
        return title.to_string();
    };
    let project = match second.find(" (") {
        Some(paren) => &second[..paren],
        None => second,
    };
    project.trim().to_string()
}

/// Pick the window to raise: exact title first, then the first title
/// containing the search key.
///
/// An empty key (a title such as `"x — "`) matches nothing rather than
/// every window, so the app is only brought forward and no arbitrary window
/// is raised.
pub fn select_window<S: AsRef<str>>(titles: &[S], title: &str) -> Option<(usize, WindowMatch)> {
    if let Some(index) = titles.iter().position(|t| t.as_ref() == title) {
        return Some((index, WindowMatch::ExactTitle));
    }

    let key = activation_search_key(title);
    if key.is_empty() {
        return None;
    }
    titles
        .iter()
        .position(|t| t.as_ref().contains(&key))
        .map(|index| (index, WindowMatch::SearchKey))
}

/// Resolves activation requests to live windows.
pub struct ActivationRouter<A> {
    activator: A,
    settle: Duration,
}

impl<A: AppActivator> ActivationRouter<A> {
    pub fn new(activator: A) -> Self {
        Self {
            activator,
            settle: FOCUS_SETTLE,
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn activator(&self) -> &A {
        &self.activator
    }

    pub fn handle(&self, request: &ActivationRequest) -> ActivationOutcome {
        self.activate(&request.window_title, &request.bundle_identifier)
    }

    /// Foreground the application owning `bundle_id`, then raise its window
    /// titled `title` (or the best substring match). Never fails: problems
    /// are logged and reflected in the outcome.
    pub fn activate(&self, title: &str, bundle_id: &str) -> ActivationOutcome {
        info!(
            event = "core.activation.activate_started",
            title = title,
            bundle_id = bundle_id
        );

        let pid = match self.activator.activate_app(bundle_id) {
            Ok(Some(pid)) => pid,
            Ok(None) => {
                debug!(
                    event = "core.activation.app_not_running",
                    bundle_id = bundle_id
                );
                return ActivationOutcome::AppNotRunning;
            }
            Err(e) => return failed(e),
        };

        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }

        let titles = match self.activator.window_titles(pid) {
            Ok(titles) => titles,
            Err(e) => return failed(e),
        };

        let Some((index, matched_by)) = select_window(titles.as_slice(), title) else {
            debug!(
                event = "core.activation.no_matching_window",
                pid = pid,
                window_count = titles.len()
            );
            return ActivationOutcome::NoMatchingWindow;
        };

        if let Err(e) = self.activator.raise_window(pid, index) {
            return failed(e);
        }

        info!(
            event = "core.activation.activate_completed",
            pid = pid,
            index = index,
            matched_by = ?matched_by
        );
        ActivationOutcome::Raised { index, matched_by }
    }
}

fn failed(error: ActivationError) -> ActivationOutcome {
    warn!(
        event = "core.activation.activate_failed",
        error = %error
    );
    ActivationOutcome::Failed {
        message: error.to_string(),
    }
}
