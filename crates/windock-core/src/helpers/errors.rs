use crate::errors::WindockError;

/// Hard failures of helper lifecycle operations.
///
/// Filesystem and registry problems are not errors; they are reported as
/// [`super::LifecycleWarning`]s.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("Window '{title}' has no application bundle identifier")]
    MissingIdentity { title: String },
}

impl WindockError for HelperError {
    fn error_code(&self) -> &'static str {
        match self {
            HelperError::MissingIdentity { .. } => "MISSING_IDENTITY",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, HelperError::MissingIdentity { .. })
    }
}
