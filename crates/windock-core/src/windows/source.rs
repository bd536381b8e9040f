use super::errors::WindowError;
use super::types::{AppInfo, RawWindow};

/// The operating-system queries the enumerator is built from.
///
/// Every method is a single round trip to the OS; none of them wait or
/// retry.
pub trait WindowSource {
    /// On-screen windows, desktop elements excluded, in window-server order.
    fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError>;

    /// Display name and bundle identifier of a running process, or `None`
    /// when the process cannot be resolved.
    fn app_info(&self, pid: i32) -> Option<AppInfo>;

    /// Window titles reported by the accessibility API, in its order.
    fn accessibility_titles(&self, pid: i32) -> Result<Vec<String>, WindowError>;

    /// Window names reported by the scripting bridge for an application.
    fn scripted_titles(&self, bundle_id: &str) -> Result<Vec<String>, WindowError>;
}

impl<S: WindowSource + ?Sized> WindowSource for &S {
    fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError> {
        (**self).list_windows()
    }

    fn app_info(&self, pid: i32) -> Option<AppInfo> {
        (**self).app_info(pid)
    }

    fn accessibility_titles(&self, pid: i32) -> Result<Vec<String>, WindowError> {
        (**self).accessibility_titles(pid)
    }

    fn scripted_titles(&self, bundle_id: &str) -> Result<Vec<String>, WindowError> {
        (**self).scripted_titles(bundle_id)
    }
}

impl<S: WindowSource + ?Sized> WindowSource for Box<S> {
    fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError> {
        (**self).list_windows()
    }

    fn app_info(&self, pid: i32) -> Option<AppInfo> {
        (**self).app_info(pid)
    }

    fn accessibility_titles(&self, pid: i32) -> Result<Vec<String>, WindowError> {
        (**self).accessibility_titles(pid)
    }

    fn scripted_titles(&self, bundle_id: &str) -> Result<Vec<String>, WindowError> {
        (**self).scripted_titles(bundle_id)
    }
}
