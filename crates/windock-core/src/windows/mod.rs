//! Live window enumeration.
//!
//! [`build_snapshot`] turns one pass over a [`WindowSource`] into a
//! [`Snapshot`]; [`WindowEnumerator`] polls it and reports changes.

pub mod enumerator;
pub mod errors;
pub mod native;
pub mod source;
pub mod types;

pub use enumerator::{DEFAULT_POLL_INTERVAL, WindowEnumerator, build_snapshot};
pub use errors::WindowError;
pub use source::WindowSource;
pub use types::{
    AppInfo, PLACEHOLDER_TITLE, RawWindow, Snapshot, SnapshotUpdate, UNTITLED_TITLE,
    WindowRecord,
};

#[cfg(target_os = "macos")]
pub use native::MacWindowSource;

#[cfg(test)]
pub(crate) use enumerator::testing;
