use std::collections::BTreeMap;

use serde::Serialize;

use super::naming::{artifact_name, helper_name_for};
use super::project::DynamicTitleRules;
use crate::helpers::HelperRecord;
use crate::windows::WindowRecord;

/// Which pass of [`find_existing_helper`] produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The window's helper name is already in the index.
    HelperName,
    /// Same application and same window number as at creation time.
    WindowNumber,
    /// Same dynamic-title application and same project label.
    ProjectName,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::HelperName => "helper_name",
            MatchKind::WindowNumber => "window_number",
            MatchKind::ProjectName => "project_name",
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelperMatch<'a> {
    pub helper: &'a HelperRecord,
    pub kind: MatchKind,
}

/// Find the helper that already represents `window`, if any.
///
/// `helpers` is the index keyed by artifact name. Passes run in order and
/// the first hit wins: helper name, then `(bundle id, window number)` for a
/// non-zero window number, then project label for dynamic-title apps.
pub fn find_existing_helper<'a>(
    window: &WindowRecord,
    helpers: &'a BTreeMap<String, HelperRecord>,
    rules: &DynamicTitleRules,
) -> Option<HelperMatch<'a>> {
    if let Some(helper) = helpers.get(&artifact_name(&helper_name_for(window))) {
        return Some(HelperMatch {
            helper,
            kind: MatchKind::HelperName,
        });
    }

    let bundle_id = window.owner_bundle_id.as_deref()?;
    let same_app = |h: &&HelperRecord| h.original_bundle_id.eq_ignore_ascii_case(bundle_id);

    if window.window_number != 0
        && let Some(helper) = helpers
            .values()
            .filter(same_app)
            .find(|h| h.captured_window_number == window.window_number)
    {
        return Some(HelperMatch {
            helper,
            kind: MatchKind::WindowNumber,
        });
    }

    let project = rules.project_for(Some(bundle_id), &window.title)?;
    helpers
        .values()
        .filter(same_app)
        .find(|h| {
            h.captured_project_name
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case(&project))
        })
        .map(|helper| HelperMatch {
            helper,
            kind: MatchKind::ProjectName,
        })
}
