//! Helper naming and reconciliation of windows with existing helpers.

pub mod matching;
pub mod naming;
pub mod project;

pub use crate::windows::PLACEHOLDER_TITLE;
pub use matching::{HelperMatch, MatchKind, find_existing_helper};
pub use naming::{
    HELPER_EXTENSION, HELPER_PREFIX, MAX_HELPER_NAME_CHARS, artifact_name, helper_name,
    helper_name_for, is_helper_artifact_name, sanitize_title,
};
pub use project::{DynamicTitleRules, extract_project_name};
