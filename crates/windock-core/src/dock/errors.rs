use crate::errors::WindockError;

#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("Could not determine the home directory for the dock preferences")]
    NoHomeDirectory,

    #[error("Could not determine the current user name")]
    NoUserName,

    #[error("Dock tile index {index} is out of range ({count} tiles)")]
    InvalidIndex { index: usize, count: usize },
}

impl WindockError for DockError {
    fn error_code(&self) -> &'static str {
        match self {
            DockError::ToolFailed { .. } => "DOCK_TOOL_FAILED",
            DockError::NoHomeDirectory => "DOCK_NO_HOME_DIRECTORY",
            DockError::NoUserName => "DOCK_NO_USER_NAME",
            DockError::InvalidIndex { .. } => "DOCK_INVALID_INDEX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failed_display() {
        let error = DockError::ToolFailed {
            tool: "PlistBuddy".to_string(),
            message: "Entry does not exist".to_string(),
        };
        assert_eq!(error.to_string(), "PlistBuddy failed: Entry does not exist");
        assert_eq!(error.error_code(), "DOCK_TOOL_FAILED");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_invalid_index_display() {
        let error = DockError::InvalidIndex { index: 4, count: 2 };
        assert_eq!(error.to_string(), "Dock tile index 4 is out of range (2 tiles)");
        assert_eq!(error.error_code(), "DOCK_INVALID_INDEX");
    }
}
