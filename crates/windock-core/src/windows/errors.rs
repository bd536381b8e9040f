use crate::errors::{Permission, WindockError};

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to enumerate windows: {message}")]
    EnumerationFailed { message: String },

    #[error("Accessibility query failed for PID {pid}: {message}")]
    AccessibilityFailed { pid: i32, message: String },

    #[error("Window {window_number} not found")]
    WindowNotFound { window_number: u32 },

    #[error("Window {window_number} belongs to {app}, which is not an enabled application")]
    AppNotEnabled { window_number: u32, app: String },

    #[error("Window enumeration is not supported on this platform")]
    Unsupported,
}

impl WindockError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::AccessibilityFailed { .. } => "WINDOW_ACCESSIBILITY_FAILED",
            WindowError::WindowNotFound { .. } => "WINDOW_NOT_FOUND",
            WindowError::AppNotEnabled { .. } => "WINDOW_APP_NOT_ENABLED",
            WindowError::Unsupported => "WINDOW_UNSUPPORTED_PLATFORM",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            WindowError::WindowNotFound { .. }
                | WindowError::AppNotEnabled { .. }
                | WindowError::Unsupported
        )
    }

    fn required_permission(&self) -> Option<Permission> {
        match self {
            WindowError::EnumerationFailed { .. } => Some(Permission::ScreenRecording),
            WindowError::AccessibilityFailed { .. } => Some(Permission::Accessibility),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_not_found_display() {
        let error = WindowError::WindowNotFound { window_number: 42 };
        assert_eq!(error.to_string(), "Window 42 not found");
        assert_eq!(error.error_code(), "WINDOW_NOT_FOUND");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_app_not_enabled_is_user_error() {
        let error = WindowError::AppNotEnabled {
            window_number: 3,
            app: "Safari".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Window 3 belongs to Safari, which is not an enabled application"
        );
        assert!(error.is_user_error());
    }

    #[test]
    fn test_enumeration_failed_is_not_user_error() {
        let error = WindowError::EnumerationFailed {
            message: "window server unavailable".to_string(),
        };
        assert!(!error.is_user_error());
        assert_eq!(error.required_permission(), Some(Permission::ScreenRecording));
    }
}
