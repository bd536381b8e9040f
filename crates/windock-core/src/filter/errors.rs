use crate::errors::WindockError;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Unknown application '{label}'. Run 'windock apps' to list known applications.")]
    UnknownApp { label: String },

    #[error("Failed to parse preferences file: {message}")]
    PreferencesParseError { message: String },

    #[error("IO error on preferences file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl WindockError for FilterError {
    fn error_code(&self) -> &'static str {
        match self {
            FilterError::UnknownApp { .. } => "UNKNOWN_APP",
            FilterError::PreferencesParseError { .. } => "PREFERENCES_PARSE_ERROR",
            FilterError::IoError { .. } => "PREFERENCES_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, FilterError::UnknownApp { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_app() {
        let error = FilterError::UnknownApp {
            label: "Emacs".to_string(),
        };
        assert_eq!(error.error_code(), "UNKNOWN_APP");
        assert!(error.is_user_error());
        assert!(error.to_string().contains("'Emacs'"));
    }
}
