//! API error types.

use bandarscope::ValidationError;

/// Errors that can occur talking to the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request never got a response (DNS, refused connection, timeout).
    #[error("connection error: {0}")]
    Transport(String),

    /// Non-2xx response. `detail` is the service's own message when it sent one.
    #[error("{detail}")]
    Status { status: u16, detail: String },

    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Input rejected before sending.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Build a status error from a response body.
    ///
    /// Uses the body's `detail` field verbatim when present, otherwise `fallback`.
    pub fn from_body(status: u16, body: &str, fallback: &str) -> Self {
        ApiError::Status {
            status,
            detail: error_detail(body).unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// HTTP status code, for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The `detail` message of an error body, if the body is JSON and carries one.
///
/// String details are returned as-is; structured details (validation error
/// lists) are returned as compact JSON.
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_surfaced_verbatim() {
        let err = ApiError::from_body(422, r#"{"detail":"Invalid broker summary format"}"#, "fallback");
        assert_eq!(err.to_string(), "Invalid broker summary format");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn fallback_when_detail_missing() {
        let err = ApiError::from_body(500, "Internal Server Error", "Failed to analyze data");
        assert_eq!(err.to_string(), "Failed to analyze data");
        let err = ApiError::from_body(500, r#"{"message":"x"}"#, "Failed to analyze data");
        assert_eq!(err.to_string(), "Failed to analyze data");
        let err = ApiError::from_body(500, r#"{"detail":null}"#, "Failed");
        assert_eq!(err.to_string(), "Failed");
    }

    #[test]
    fn structured_detail_is_compact_json() {
        let body = r#"{"detail":[{"loc":["body","stocks"],"msg":"field required"}]}"#;
        let detail = error_detail(body).unwrap();
        assert!(detail.contains("field required"));
    }

    #[test]
    fn validation_passes_through() {
        let err: ApiError = ValidationError::EmptyStockCode.into();
        assert_eq!(err.to_string(), "stock code cannot be empty");
        assert_eq!(err.status(), None);
    }
}
