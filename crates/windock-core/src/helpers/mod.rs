//! Helper artifacts: creation, removal and the index of what exists.

pub mod batch;
pub mod bundle;
pub mod errors;
pub mod icon;
pub mod manager;
pub mod types;

pub use batch::BatchOutcome;
pub use bundle::{HelperManifest, launcher_script, read_artifact, write_artifact};
pub use errors::HelperError;
#[cfg(target_os = "macos")]
pub use icon::WorkspaceAppLocator;
pub use icon::{AppLocator, NoAppLocator, resolve_icon};
pub use manager::{HelperManager, SHUTDOWN_SETTLE};
pub use types::{HelperRecord, LifecycleReport, LifecycleWarning};
