use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use core_graphics::window::{
    copy_window_info, kCGNullWindowID, kCGWindowLayer, kCGWindowListExcludeDesktopElements,
    kCGWindowListOptionOnScreenOnly, kCGWindowName, kCGWindowNumber, kCGWindowOwnerPID,
};
use objc2_app_kit::NSRunningApplication;
use tracing::debug;

use super::ax::AxApplication;
use crate::command::run_tool;
use crate::escape::applescript_escape;
use crate::windows::errors::WindowError;
use crate::windows::source::WindowSource;
use crate::windows::types::{AppInfo, RawWindow};

/// [`WindowSource`] backed by the CoreGraphics window list, the
/// Accessibility API and System Events scripting.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacWindowSource;

impl MacWindowSource {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSource for MacWindowSource {
    fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError> {
        let options = kCGWindowListOptionOnScreenOnly | kCGWindowListExcludeDesktopElements;
        let list = copy_window_info(options, kCGNullWindowID).ok_or_else(|| {
            WindowError::EnumerationFailed {
                message: "CGWindowListCopyWindowInfo returned no list".to_string(),
            }
        })?;

        let mut windows = Vec::with_capacity(list.len() as usize);
        for item in list.iter() {
            // SAFETY: every element of the window info array is a CFDictionary,
            // borrowed for the lifetime of `list`.
            let info: CFDictionary<CFString, CFType> =
                unsafe { CFDictionary::wrap_under_get_rule(*item as CFDictionaryRef) };

            let (Some(window_number), Some(owner_pid)) = (
                number_value(&info, unsafe { kCGWindowNumber }),
                number_value(&info, unsafe { kCGWindowOwnerPID }),
            ) else {
                debug!(
                    event = "core.window.native.entry_skipped",
                    reason = "missing_number_or_pid"
                );
                continue;
            };

            windows.push(RawWindow {
                window_number: window_number as u32,
                owner_pid: owner_pid as i32,
                layer: number_value(&info, unsafe { kCGWindowLayer }).unwrap_or(-1),
                title: string_value(&info, unsafe { kCGWindowName }),
            });
        }

        Ok(windows)
    }

    fn app_info(&self, pid: i32) -> Option<AppInfo> {
        let app = NSRunningApplication::runningApplicationWithProcessIdentifier(pid)?;
        let name = app
            .localizedName()
            .map(|n| n.to_string())
            .unwrap_or_default();
        let bundle_id = app.bundleIdentifier().map(|b| b.to_string());
        Some(AppInfo { name, bundle_id })
    }

    fn accessibility_titles(&self, pid: i32) -> Result<Vec<String>, WindowError> {
        AxApplication::new(pid)
            .and_then(|app| app.window_titles())
            .map_err(|message| WindowError::AccessibilityFailed { pid, message })
    }

    fn scripted_titles(&self, bundle_id: &str) -> Result<Vec<String>, WindowError> {
        let script = format!(
            r#"tell application "System Events"
    set procs to (every process whose bundle identifier is "{}")
    if procs is {{}} then return ""
    set AppleScript's text item delimiters to linefeed
    return (name of every window of (item 1 of procs)) as text
end tell"#,
            applescript_escape(bundle_id)
        );

        let output = run_tool("osascript", &["-e", &script])
            .map_err(|message| WindowError::EnumerationFailed { message })?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

fn number_value(info: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<i64> {
    // SAFETY: CoreGraphics key constants are static CFStrings.
    let key = unsafe { CFString::wrap_under_get_rule(key) };
    info.find(&key)?.downcast::<CFNumber>()?.to_i64()
}

fn string_value(info: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<String> {
    // SAFETY: CoreGraphics key constants are static CFStrings.
    let key = unsafe { CFString::wrap_under_get_rule(key) };
    info.find(&key)?.downcast::<CFString>().map(|s| s.to_string())
}
