use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the request and said why. The message is
    /// surfaced to the user verbatim.
    #[error("{0}")]
    Backend(String),

    #[error("Unauthorized - please log in again")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error envelope the backend uses for rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Build an error from a non-2xx response, preferring the backend's own
    /// message over the status-derived one.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.message.filter(|m| !m.is_empty()) {
                return ApiError::Backend(message);
            }
        }

        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("request failed")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_server_message_wins() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"status":"error","message":"Email already registered"}"#,
        );
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_status_text_when_body_is_not_json() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(err, ApiError::ServerError(_)));

        let err = ApiError::from_status(StatusCode::IM_A_TEAPOT, "");
        assert_eq!(err.to_string(), "Invalid response: 418 I'm a teapot");
    }

    #[test]
    fn test_empty_message_field_falls_through() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message":""}"#);
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
