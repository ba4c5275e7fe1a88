// ============================================================================
// ERRORS - one normalised message per failure
// ============================================================================
// Every gateway caller gets a single string through `Display`, whatever
// shape the backend used for the error body.
// ============================================================================

use serde_json::Value;

/// Fallback when neither the server nor the transport said anything useful
pub const GENERIC_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx answer from the backend, message already normalised
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request never produced an HTTP response
    #[error("{0}")]
    Transport(String),

    #[error("timeout of {0}ms exceeded")]
    Timeout(u32),

    /// Rejected locally, no request was sent
    #[error("{0}")]
    Validation(String),

    /// 2xx answer whose body did not match the expected model
    #[error("{0}")]
    Decode(String),

    #[error("request aborted")]
    Aborted,
}

impl ApiError {
    /// Transport failure; an empty transport text falls back to the generic message
    pub fn transport(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            ApiError::Transport(GENERIC_ERROR_MESSAGE.to_string())
        } else {
            ApiError::Transport(text)
        }
    }

    /// Builds a `Server` error from a raw response body.
    ///
    /// Preference order: `detail`, then `message`, then the transport text
    /// for the status code, then the generic fallback.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| server_detail(&json).or_else(|| server_message(&json)))
            .unwrap_or_else(|| status_text(status));

        ApiError::Server { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

fn server_detail(json: &Value) -> Option<String> {
    match json.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        // FastAPI validation errors: [{"loc": [...], "msg": "...", "type": "..."}]
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn server_message(json: &Value) -> Option<String> {
    json.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn status_text(status: u16) -> String {
    if status == 0 {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        format!("Request failed with status code {}", status)
    }
}

/// Failures of the two-phase upload. Every variant is terminal for the ticket.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Presign(#[from] ApiError),

    /// Object storage answered with a non-2xx status
    #[error("Upload rejected by storage (HTTP {status})")]
    Storage { status: u16 },

    #[error("Upload failed: {0}")]
    Transport(String),
}

impl UploadError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Storage { status } => Some(*status),
            UploadError::Presign(e) => e.status(),
            UploadError::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_wins_over_message() {
        let err = ApiError::from_response(400, r#"{"detail":"Email already registered","message":"nope"}"#);
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn message_used_when_detail_missing() {
        let err = ApiError::from_response(500, r#"{"message":"Database unavailable"}"#);
        assert_eq!(err.to_string(), "Database unavailable");
    }

    #[test]
    fn validation_detail_list_is_flattened() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"field required","type":"missing"},
                                {"loc":["body","status"],"msg":"invalid status","type":"enum"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(err.to_string(), "field required; invalid status");
    }

    #[test]
    fn non_json_body_falls_back_to_status_text() {
        let err = ApiError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status code 502");
    }

    #[test]
    fn empty_transport_text_becomes_generic() {
        assert_eq!(ApiError::transport("  ").to_string(), GENERIC_ERROR_MESSAGE);
        assert_eq!(ApiError::transport("Network Error").to_string(), "Network Error");
    }

    #[test]
    fn unauthorized_statuses() {
        assert!(ApiError::from_response(401, "").is_unauthorized());
        assert!(ApiError::from_response(403, "{}").is_unauthorized());
        assert!(!ApiError::Timeout(15_000).is_unauthorized());
        assert_eq!(ApiError::Timeout(15_000).to_string(), "timeout of 15000ms exceeded");
    }

    #[test]
    fn upload_errors_keep_status() {
        assert_eq!(UploadError::Storage { status: 403 }.status(), Some(403));
        assert_eq!(UploadError::Transport("offline".into()).status(), None);
    }
}
