//! Locating an application's icon for a helper.
//!
//! Fallback chain inside `<app>/Contents/Resources`:
//! 1. `CFBundleIconFile` as declared, then with `.icns` appended
//! 2. `CFBundleIconName` + `.icns`
//! 3. `AppIcon.icns`, `app.icns`, `icon.icns`
//! 4. the first `*.icns` file in the directory

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::command::run_tool;
use crate::escape::xml_unescape;

const CONVENTIONAL_ICON_NAMES: [&str; 3] = ["AppIcon.icns", "app.icns", "icon.icns"];

/// Finds installed applications by bundle identifier.
pub trait AppLocator {
    fn app_bundle_path(&self, bundle_id: &str) -> Option<PathBuf>;
}

impl<L: AppLocator + ?Sized> AppLocator for &L {
    fn app_bundle_path(&self, bundle_id: &str) -> Option<PathBuf> {
        (**self).app_bundle_path(bundle_id)
    }
}

/// Locator that never finds anything; helpers are created without icons.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAppLocator;

impl AppLocator for NoAppLocator {
    fn app_bundle_path(&self, _bundle_id: &str) -> Option<PathBuf> {
        None
    }
}

/// Locator over a fixed bundle id to path table.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct StaticAppLocator {
    apps: Vec<(String, PathBuf)>,
}

#[cfg(test)]
impl StaticAppLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, bundle_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.apps.push((bundle_id.into(), path.into()));
        self
    }
}

#[cfg(test)]
impl AppLocator for StaticAppLocator {
    fn app_bundle_path(&self, bundle_id: &str) -> Option<PathBuf> {
        self.apps
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(bundle_id))
            .map(|(_, path)| path.clone())
    }
}

/// Locator backed by `NSWorkspace`.
#[cfg(target_os = "macos")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceAppLocator;

#[cfg(target_os = "macos")]
impl AppLocator for WorkspaceAppLocator {
    fn app_bundle_path(&self, bundle_id: &str) -> Option<PathBuf> {
        use objc2_app_kit::NSWorkspace;
        use objc2_foundation::NSString;

        let workspace = NSWorkspace::sharedWorkspace();
        let id = NSString::from_str(bundle_id);
        let url = workspace.URLForApplicationWithBundleIdentifier(&id)?;
        let path = url.path()?;
        Some(PathBuf::from(path.to_string()))
    }
}

/// Resolve the icon file of the application bundle at `app_bundle`.
pub fn resolve_icon(app_bundle: &Path) -> Option<PathBuf> {
    let contents = app_bundle.join("Contents");
    let resources = contents.join("Resources");
    let info_plist = contents.join("Info.plist");

    let existing = |name: &str| {
        let candidate = resources.join(name);
        candidate.is_file().then_some(candidate)
    };

    if let Some(icon_file) = info_string(&info_plist, "CFBundleIconFile") {
        if let Some(found) = existing(&icon_file) {
            return Some(found);
        }
        if !icon_file.ends_with(".icns")
            && let Some(found) = existing(&format!("{}.icns", icon_file))
        {
            return Some(found);
        }
    }

    if let Some(icon_name) = info_string(&info_plist, "CFBundleIconName")
        && let Some(found) = existing(&format!("{}.icns", icon_name))
    {
        return Some(found);
    }

    if let Some(found) = CONVENTIONAL_ICON_NAMES.iter().find_map(|name| existing(name)) {
        return Some(found);
    }

    let mut icns: Vec<PathBuf> = fs::read_dir(&resources)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "icns"))
        .collect();
    icns.sort();
    icns.into_iter().next()
}

/// Read a string value from an `Info.plist`.
///
/// XML property lists are read directly; binary ones go through `plutil`.
fn info_string(info_plist: &Path, key: &str) -> Option<String> {
    match fs::read(info_plist) {
        Ok(bytes) if bytes.starts_with(b"bplist") => {
            let path = info_plist.display().to_string();
            match run_tool("plutil", &["-extract", key, "raw", "-o", "-", &path]) {
                Ok(value) if !value.is_empty() => Some(value),
                Ok(_) => None,
                Err(e) => {
                    debug!(
                        event = "core.helper.icon_key_unreadable",
                        key = key,
                        error = %e
                    );
                    None
                }
            }
        }
        Ok(bytes) => xml_plist_string(&String::from_utf8_lossy(&bytes), key),
        Err(_) => None,
    }
}

fn xml_plist_string(xml: &str, key: &str) -> Option<String> {
    let pattern = format!(
        r"<key>{}</key>\s*<string>([^<]*)</string>",
        regex::escape(key)
    );
    let re = Regex::new(&pattern).ok()?;
    let value = xml_unescape(re.captures(xml)?.get(1)?.as_str());
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn fake_app(temp: &TempDir, plist_entries: &str, icons: &[&str]) -> PathBuf {
        let app = temp.path().join("Fake.app");
        let resources = app.join("Contents/Resources");
        fs::create_dir_all(&resources).unwrap();
        fs::write(
            app.join("Contents/Info.plist"),
            format!(
                "<?xml version=\"1.0\"?>\n<plist version=\"1.0\">\n<dict>\n{}</dict>\n</plist>\n",
                plist_entries
            ),
        )
        .unwrap();
        for icon in icons {
            fs::write(resources.join(icon), b"icns").unwrap();
        }
        app
    }

    #[test]
    fn test_declared_icon_file_without_extension() {
        let temp = TempDir::new().unwrap();
        let app = fake_app(
            &temp,
            "<key>CFBundleIconFile</key>\n<string>Code</string>\n",
            &["Code.icns", "AppIcon.icns"],
        );
        assert_eq!(
            resolve_icon(&app),
            Some(app.join("Contents/Resources/Code.icns"))
        );
    }

    #[test]
    fn test_declared_icon_file_with_extension() {
        let temp = TempDir::new().unwrap();
        let app = fake_app(
            &temp,
            "<key>CFBundleIconFile</key>\n<string>Editor.icns</string>\n",
            &["Editor.icns"],
        );
        assert_eq!(
            resolve_icon(&app),
            Some(app.join("Contents/Resources/Editor.icns"))
        );
    }

    #[test]
    fn test_icon_name_used_when_icon_file_missing() {
        let temp = TempDir::new().unwrap();
        let app = fake_app(
            &temp,
            "<key>CFBundleIconFile</key>\n<string>Gone</string>\n\
             <key>CFBundleIconName</key>\n<string>Named</string>\n",
            &["Named.icns", "AppIcon.icns"],
        );
        assert_eq!(
            resolve_icon(&app),
            Some(app.join("Contents/Resources/Named.icns"))
        );
    }

    #[test]
    fn test_conventional_names_in_order() {
        let temp = TempDir::new().unwrap();
        let app = fake_app(&temp, "", &["icon.icns", "app.icns"]);
        assert_eq!(
            resolve_icon(&app),
            Some(app.join("Contents/Resources/app.icns"))
        );
    }

    #[test]
    fn test_any_icns_as_last_resort() {
        let temp = TempDir::new().unwrap();
        let app = fake_app(&temp, "", &["zeta.icns", "Whatever.icns"]);
        assert_eq!(
            resolve_icon(&app),
            Some(app.join("Contents/Resources/Whatever.icns"))
        );
    }

    #[test]
    fn test_no_icon_is_none() {
        let temp = TempDir::new().unwrap();
        let app = fake_app(&temp, "", &[]);
        fs::write(app.join("Contents/Resources/readme.txt"), b"x").unwrap();
        assert_eq!(resolve_icon(&app), None);
        assert_eq!(resolve_icon(&temp.path().join("Missing.app")), None);
    }

    #[test]
    fn test_static_locator_ignores_case() {
        let locator = StaticAppLocator::new().with_app("com.Example.App", "/Applications/Ex.app");
        assert_eq!(
            locator.app_bundle_path("com.example.app"),
            Some(PathBuf::from("/Applications/Ex.app"))
        );
        assert_eq!(NoAppLocator.app_bundle_path("com.example.app"), None);
    }
}
