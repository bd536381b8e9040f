use serde::{Deserialize, Serialize};

/// Name of the distributed notification a helper posts when clicked.
pub const ACTIVATION_NOTIFICATION: &str = "com.windowsondock.activateWindow";

/// Keys of the notification payload.
pub mod keys {
    pub const WINDOW_TITLE: &str = "windowTitle";
    pub const BUNDLE_IDENTIFIER: &str = "bundleIdentifier";
    pub const WINDOW_NUMBER: &str = "windowNumber";
}

/// "Bring this window forward", as carried by the activation notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub window_title: String,
    pub bundle_identifier: String,
    /// Informational; windows are found by title.
    #[serde(default)]
    pub window_number: i64,
}

impl ActivationRequest {
    pub fn new(window_title: impl Into<String>, bundle_identifier: impl Into<String>) -> Self {
        Self {
            window_title: window_title.into(),
            bundle_identifier: bundle_identifier.into(),
            window_number: 0,
        }
    }

    /// Build a request from decoded payload values. Title and bundle
    /// identifier are required.
    pub fn from_payload(
        window_title: Option<String>,
        bundle_identifier: Option<String>,
        window_number: Option<i64>,
    ) -> Option<Self> {
        Some(Self {
            window_title: window_title?,
            bundle_identifier: bundle_identifier.filter(|b| !b.is_empty())?,
            window_number: window_number.unwrap_or(0),
        })
    }
}

/// How a window was picked among the application's windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMatch {
    ExactTitle,
    SearchKey,
}

/// What an activation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActivationOutcome {
    /// No running application has the bundle identifier.
    AppNotRunning,
    /// The application was brought forward but no window matched.
    NoMatchingWindow,
    /// The window at `index` in accessibility order was raised.
    Raised { index: usize, matched_by: WindowMatch },
    /// A platform call failed after the application was found.
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_payload_keys() {
        let json = r#"{"windowTitle":"a — proj","bundleIdentifier":"com.x","windowNumber":7}"#;
        let request: ActivationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.window_title, "a — proj");
        assert_eq!(request.bundle_identifier, "com.x");
        assert_eq!(request.window_number, 7);

        let without_number: ActivationRequest =
            serde_json::from_str(r#"{"windowTitle":"a","bundleIdentifier":"com.x"}"#).unwrap();
        assert_eq!(without_number.window_number, 0);
    }

    #[test]
    fn test_from_payload_requires_title_and_bundle() {
        assert!(ActivationRequest::from_payload(None, Some("com.x".into()), None).is_none());
        assert!(ActivationRequest::from_payload(Some("t".into()), Some(String::new()), None).is_none());
        let request =
            ActivationRequest::from_payload(Some("t".into()), Some("com.x".into()), Some(3)).unwrap();
        assert_eq!(request.window_number, 3);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_string(&ActivationOutcome::Raised {
            index: 1,
            matched_by: WindowMatch::SearchKey,
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"raised","index":1,"matched_by":"search_key"}"#);
    }
}
