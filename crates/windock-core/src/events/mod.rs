//! Application-level log events shared by every front end.

use tracing::{error, info, warn};

use crate::activation::{ActivationOutcome, ActivationRequest};
use crate::errors::WindockError;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

/// `cleanup` is whether helpers are about to be cleared.
pub fn log_app_shutdown(cleanup: bool) {
    info!(event = "core.app.shutdown_started", cleanup = cleanup);
}

pub fn log_app_error(error: &dyn WindockError) {
    let permission = error.required_permission().map(|p| p.settings_path());
    if error.is_user_error() {
        warn!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code(),
            permission = permission
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code(),
            permission = permission
        );
    }
}

pub fn log_activation_routed(request: &ActivationRequest, outcome: &ActivationOutcome) {
    match outcome {
        ActivationOutcome::Failed { message } => warn!(
            event = "core.app.activation_failed",
            bundle_id = %request.bundle_identifier,
            window_number = request.window_number,
            error = %message
        ),
        _ => info!(
            event = "core.app.activation_routed",
            bundle_id = %request.bundle_identifier,
            window_number = request.window_number,
            outcome = ?outcome
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::WindowMatch;
    use crate::windows::WindowError;

    #[test]
    fn test_app_events() {
        log_app_startup();
        log_app_shutdown(true);
        log_app_error(&WindowError::Unsupported);
        log_app_error(&WindowError::EnumerationFailed {
            message: "window server unavailable".to_string(),
        });
    }

    #[test]
    fn test_activation_events() {
        let request = ActivationRequest::new("main.py — myproj", "com.microsoft.VSCode");
        log_activation_routed(
            &request,
            &ActivationOutcome::Raised {
                index: 0,
                matched_by: WindowMatch::ExactTitle,
            },
        );
        log_activation_routed(
            &request,
            &ActivationOutcome::Failed {
                message: "not trusted".to_string(),
            },
        );
    }
}
