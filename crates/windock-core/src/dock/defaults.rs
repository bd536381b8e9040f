use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use nix::unistd::{User, getuid};
use tracing::{debug, info, warn};

use super::errors::DockError;
use super::registry::DockRegistry;
use super::tiles::{DockTile, parse_persistent_apps};
use crate::command::run_tool;
use crate::escape::xml_escape;

/// Settle delay after flushing the preference cache before reading the plist.
pub const READ_SYNC_SETTLE: Duration = Duration::from_millis(200);

/// Settle delay after flushing the preference cache before restarting the dock.
pub const REFRESH_SETTLE: Duration = Duration::from_millis(300);

const DOCK_DOMAIN: &str = "com.apple.dock";
const PLIST_BUDDY: &str = "/usr/libexec/PlistBuddy";

/// Registry backed by the dock's user preference domain.
///
/// Tiles are appended with `defaults write ... -array-add`, read and deleted
/// with PlistBuddy on the preference file, and made visible by flushing
/// `cfprefsd` and restarting the Dock process.
#[derive(Debug, Clone)]
pub struct DefaultsDockRegistry {
    plist_path: PathBuf,
    user: String,
}

impl DefaultsDockRegistry {
    pub fn new() -> Result<Self, DockError> {
        let home = dirs::home_dir().ok_or(DockError::NoHomeDirectory)?;
        Ok(Self {
            plist_path: home.join("Library/Preferences/com.apple.dock.plist"),
            user: current_user_name()?,
        })
    }

    pub fn with_plist_path(mut self, plist_path: PathBuf) -> Self {
        self.plist_path = plist_path;
        self
    }

    pub fn plist_path(&self) -> &Path {
        &self.plist_path
    }

    /// Ask `cfprefsd` to drop its cached view so the file on disk and the
    /// daemon agree. A missing daemon is not an error.
    fn flush_preferences(&self, settle: Duration) {
        if let Err(e) = run_tool("killall", &["-u", &self.user, "cfprefsd"]) {
            debug!(
                event = "core.dock.preferences_flush_skipped",
                error = %e
            );
        }
        thread::sleep(settle);
    }

    fn plist_arg(&self) -> String {
        self.plist_path.display().to_string()
    }
}

impl DockRegistry for DefaultsDockRegistry {
    fn add_tile(&mut self, path: &Path) -> Result<(), DockError> {
        let entry = tile_entry_xml(path);
        run_tool(
            "defaults",
            &["write", DOCK_DOMAIN, "persistent-apps", "-array-add", &entry],
        )
        .map_err(|message| DockError::ToolFailed {
            tool: "defaults".to_string(),
            message,
        })?;

        debug!(
            event = "core.dock.tile_added",
            path = %path.display()
        );
        Ok(())
    }

    fn tiles(&mut self) -> Result<Vec<DockTile>, DockError> {
        self.flush_preferences(READ_SYNC_SETTLE);

        let output = run_tool(
            PLIST_BUDDY,
            &["-c", "Print :persistent-apps", &self.plist_arg()],
        )
        .map_err(|message| DockError::ToolFailed {
            tool: "PlistBuddy".to_string(),
            message,
        })?;

        Ok(parse_persistent_apps(&output))
    }

    fn delete_tiles(&mut self, indices: &[usize]) -> Result<(), DockError> {
        let plist = self.plist_arg();
        let mut first_error = None;

        for index in indices {
            let command = format!("Delete :persistent-apps:{}", index);
            if let Err(message) = run_tool(PLIST_BUDDY, &["-c", &command, &plist]) {
                warn!(
                    event = "core.dock.tile_delete_failed",
                    index = index,
                    error = %message
                );
                first_error.get_or_insert(DockError::ToolFailed {
                    tool: "PlistBuddy".to_string(),
                    message,
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn refresh(&mut self) -> Result<(), DockError> {
        info!(event = "core.dock.refresh_started");

        self.flush_preferences(REFRESH_SETTLE);
        run_tool("killall", &["Dock"]).map_err(|message| DockError::ToolFailed {
            tool: "killall".to_string(),
            message,
        })?;

        info!(event = "core.dock.refresh_completed");
        Ok(())
    }
}

/// Property list fragment `defaults` appends to `persistent-apps`.
pub fn tile_entry_xml(path: &Path) -> String {
    format!(
        "<dict><key>tile-data</key><dict><key>file-data</key><dict>\
<key>_CFURLString</key><string>{}</string>\
<key>_CFURLStringType</key><integer>0</integer>\
</dict></dict></dict>",
        xml_escape(&path.display().to_string())
    )
}

fn current_user_name() -> Result<String, DockError> {
    match User::from_uid(getuid()) {
        Ok(Some(user)) => Ok(user.name),
        Ok(None) | Err(_) => std::env::var("USER")
            .ok()
            .filter(|name| !name.is_empty())
            .ok_or(DockError::NoUserName),
    }
}
