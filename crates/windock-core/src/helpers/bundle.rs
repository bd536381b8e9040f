//! On-disk layout of a helper artifact.
//!
//! ```text
//! WD_<name>.app/Contents/Info.plist
//! WD_<name>.app/Contents/MacOS/WD_<name>
//! WD_<name>.app/Contents/Resources/AppIcon.icns   (optional)
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use uuid::Uuid;

use super::types::HelperRecord;
use crate::activation::{ACTIVATION_NOTIFICATION, keys};
use crate::escape::{xml_escape, xml_unescape};
use crate::identity::artifact_name;

/// Namespace of the bundle identifiers given to helpers themselves.
pub const HELPER_BUNDLE_ID_PREFIX: &str = "com.windowsondock.helper";

/// File name of the copied application icon inside `Contents/Resources`.
pub const ICON_FILE_NAME: &str = "AppIcon.icns";

const KEY_ORIGINAL_BUNDLE_ID: &str = "WDOriginalBundleId";
const KEY_WINDOW_NUMBER: &str = "WDWindowNumber";
const KEY_PROJECT_NAME: &str = "WDProjectName";
const KEY_CREATED_AT: &str = "WDCreatedAt";

static PLIST_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<key>([^<]+)</key>\s*<(string|integer)>([^<]*)</(?:string|integer)>")
        .expect("manifest entry pattern is valid")
});

/// Everything written into a helper's `Info.plist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperManifest {
    pub helper_name: String,
    pub title: String,
    pub helper_bundle_id: String,
    pub original_bundle_id: String,
    pub window_number: u32,
    pub project_name: Option<String>,
    pub created_at: Option<String>,
}

impl HelperManifest {
    /// Manifest for a new helper, with a freshly generated helper bundle id.
    pub fn new(
        helper_name: impl Into<String>,
        title: impl Into<String>,
        original_bundle_id: impl Into<String>,
        window_number: u32,
        project_name: Option<String>,
    ) -> Self {
        Self {
            helper_name: helper_name.into(),
            title: title.into(),
            helper_bundle_id: format!("{}.{}", HELPER_BUNDLE_ID_PREFIX, Uuid::new_v4().simple()),
            original_bundle_id: original_bundle_id.into(),
            window_number,
            project_name,
            created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    pub fn to_plist(&self) -> String {
        let optional = |key: &str, value: Option<&str>| {
            value
                .map(|v| format!("    <key>{}</key>\n    <string>{}</string>\n", key, xml_escape(v)))
                .unwrap_or_default()
        };
        let extra = format!(
            "{}{}",
            optional(KEY_PROJECT_NAME, self.project_name.as_deref()),
            optional(KEY_CREATED_AT, self.created_at.as_deref())
        );

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleExecutable</key>
    <string>{executable}</string>
    <key>CFBundleIdentifier</key>
    <string>{bundle_id}</string>
    <key>CFBundleName</key>
    <string>{title}</string>
    <key>CFBundleDisplayName</key>
    <string>{title}</string>
    <key>CFBundlePackageType</key>
    <string>APPL</string>
    <key>CFBundleShortVersionString</key>
    <string>1.0</string>
    <key>CFBundleVersion</key>
    <string>1</string>
    <key>CFBundleIconFile</key>
    <string>AppIcon</string>
    <key>LSUIElement</key>
    <false/>
    <key>NSHighResolutionCapable</key>
    <true/>
    <key>{key_bundle}</key>
    <string>{original}</string>
    <key>{key_number}</key>
    <integer>{number}</integer>
{extra}</dict>
</plist>
"#,
            executable = xml_escape(&self.helper_name),
            bundle_id = xml_escape(&self.helper_bundle_id),
            title = xml_escape(&self.title),
            key_bundle = KEY_ORIGINAL_BUNDLE_ID,
            original = xml_escape(&self.original_bundle_id),
            key_number = KEY_WINDOW_NUMBER,
            number = self.window_number,
            extra = extra,
        )
    }

    /// Parse a manifest written by [`HelperManifest::to_plist`].
    pub fn from_plist(xml: &str) -> Result<Self, String> {
        let entries: HashMap<&str, String> = PLIST_ENTRY
            .captures_iter(xml)
            .filter_map(|c| {
                let key = c.get(1)?.as_str();
                let value = c.get(3)?.as_str();
                Some((key, xml_unescape(value)))
            })
            .collect();

        let required = |key: &str| {
            entries
                .get(key)
                .cloned()
                .ok_or_else(|| format!("missing {}", key))
        };

        let window_number = required(KEY_WINDOW_NUMBER)?
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid {}: {}", KEY_WINDOW_NUMBER, e))?;

        let helper_name = required("CFBundleExecutable")?;
        Ok(Self {
            title: entries
                .get("CFBundleName")
                .cloned()
                .unwrap_or_else(|| helper_name.clone()),
            helper_name,
            helper_bundle_id: entries
                .get("CFBundleIdentifier")
                .cloned()
                .unwrap_or_default(),
            original_bundle_id: required(KEY_ORIGINAL_BUNDLE_ID)?,
            window_number,
            project_name: entries
                .get(KEY_PROJECT_NAME)
                .filter(|p| !p.is_empty())
                .cloned(),
            created_at: entries.get(KEY_CREATED_AT).cloned(),
        })
    }

    pub fn into_record(self, path: PathBuf) -> HelperRecord {
        HelperRecord {
            helper_name: self.helper_name,
            title: self.title,
            original_bundle_id: self.original_bundle_id,
            captured_window_number: self.window_number,
            captured_project_name: self.project_name,
            created_at: self.created_at,
            path,
        }
    }
}

/// Executable launcher posting the activation notification and exiting.
///
/// Payload strings are embedded as JSON string literals, which are valid
/// JavaScript, so any title survives the trip.
pub fn launcher_script(title: &str, bundle_id: &str, window_number: u32) -> String {
    let js_string = |s: &str| serde_json::Value::from(s).to_string();

    format!(
        r#"#!/bin/bash
osascript -l JavaScript <<'JSSCRIPT'
ObjC.import('Foundation');
var center = $.NSDistributedNotificationCenter.defaultCenter;
var userInfo = $.NSMutableDictionary.alloc.init;
userInfo.setObjectForKey($({title}), $({title_key}));
userInfo.setObjectForKey($({bundle_id}), $({bundle_key}));
userInfo.setObjectForKey($({number}), $({number_key}));
center.postNotificationNameObjectUserInfoDeliverImmediately(
    $({name}),
    $(),
    userInfo,
    true
);
JSSCRIPT
exit 0
"#,
        title = js_string(title),
        title_key = js_string(keys::WINDOW_TITLE),
        bundle_id = js_string(bundle_id),
        bundle_key = js_string(keys::BUNDLE_IDENTIFIER),
        number = window_number,
        number_key = js_string(keys::WINDOW_NUMBER),
        name = js_string(ACTIVATION_NOTIFICATION),
    )
}

pub fn contents_dir(artifact: &Path) -> PathBuf {
    artifact.join("Contents")
}

pub fn info_plist_path(artifact: &Path) -> PathBuf {
    contents_dir(artifact).join("Info.plist")
}

pub fn icon_path(artifact: &Path) -> PathBuf {
    contents_dir(artifact).join("Resources").join(ICON_FILE_NAME)
}

/// Create the helpers directory with mode 0755 if it does not exist.
pub fn ensure_helpers_dir(helpers_dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(helpers_dir)
}

/// Write the artifact tree for `manifest` under `helpers_dir`, replacing any
/// manifest and launcher already there. Returns the artifact path.
pub fn write_artifact(helpers_dir: &Path, manifest: &HelperManifest) -> io::Result<PathBuf> {
    ensure_helpers_dir(helpers_dir)?;

    let artifact = helpers_dir.join(artifact_name(&manifest.helper_name));
    let contents = contents_dir(&artifact);
    let macos = contents.join("MacOS");
    fs::create_dir_all(&macos)?;
    fs::create_dir_all(contents.join("Resources"))?;

    fs::write(info_plist_path(&artifact), manifest.to_plist())?;

    let executable = macos.join(&manifest.helper_name);
    fs::write(
        &executable,
        launcher_script(
            &manifest.title,
            &manifest.original_bundle_id,
            manifest.window_number,
        ),
    )?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o755))?;
    }

    Ok(artifact)
}

/// Read a helper back from its artifact directory.
pub fn read_artifact(artifact: &Path) -> Result<HelperRecord, String> {
    let xml = fs::read_to_string(info_plist_path(artifact)).map_err(|e| e.to_string())?;
    let manifest = HelperManifest::from_plist(&xml)?;
    Ok(manifest.into_record(artifact.to_path_buf()))
}
