use crate::errors::{Permission, WindockError};

#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("Accessibility request for PID {pid} failed: {message}")]
    AccessibilityFailed { pid: i32, message: String },

    #[error("Window activation is only supported on macOS")]
    Unsupported,
}

impl WindockError for ActivationError {
    fn error_code(&self) -> &'static str {
        match self {
            ActivationError::AccessibilityFailed { .. } => "ACTIVATION_ACCESSIBILITY_FAILED",
            ActivationError::Unsupported => "ACTIVATION_UNSUPPORTED_PLATFORM",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ActivationError::Unsupported)
    }

    fn required_permission(&self) -> Option<Permission> {
        match self {
            ActivationError::AccessibilityFailed { .. } => Some(Permission::Accessibility),
            ActivationError::Unsupported => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let error = ActivationError::AccessibilityFailed {
            pid: 42,
            message: "not trusted".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Accessibility request for PID 42 failed: not trusted"
        );
        assert_eq!(error.error_code(), "ACTIVATION_ACCESSIBILITY_FAILED");
        assert_eq!(error.required_permission(), Some(Permission::Accessibility));
        assert!(ActivationError::Unsupported.is_user_error());
    }
}
