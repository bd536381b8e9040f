//! Routing helper clicks back to live windows.

pub mod errors;
pub mod native;
pub mod router;
pub mod types;

pub use errors::ActivationError;
#[cfg(target_os = "macos")]
pub use native::{ActivationListener, MacAppActivator};
pub use router::{
    ActivationRouter, AppActivator, FOCUS_SETTLE, SEARCH_KEY_SEPARATOR, activation_search_key,
    select_window,
};
pub use types::{
    ACTIVATION_NOTIFICATION, ActivationOutcome, ActivationRequest, WindowMatch, keys,
};
