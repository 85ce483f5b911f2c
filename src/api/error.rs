use thiserror::Error;

/// Maximum length of a response body echoed into an error message
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Backend(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Keep error messages readable when the server echoes a large body
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Cut at a char boundary; backend messages are not ASCII-only.
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    /// The backend reports validation problems as `{"error": "..."}`
    fn backend_message(body: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: String,
        }
        serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.error)
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => match Self::backend_message(body) {
                Some(message) => ApiError::Backend(message),
                None => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
    }

    #[test]
    fn test_backend_error_message_is_extracted() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Insufficient funds"}"#,
        );
        match err {
            ApiError::Backend(message) => assert_eq!(message, "Insufficient funds"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_body_falls_back_to_invalid_response() {
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "<html>oops</html>"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 200 three-byte chars; byte 500 falls inside a character.
        let body = "€".repeat(200);
        match ApiError::from_status(StatusCode::FORBIDDEN, &body) {
            ApiError::AccessDenied(message) => {
                assert!(message.starts_with('€'));
                assert!(message.contains("truncated, 600 total bytes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // German umlauts around the cut point survive as well.
        let body = "ü".repeat(300);
        match ApiError::from_status(StatusCode::FORBIDDEN, &body) {
            ApiError::AccessDenied(message) => assert!(message.contains("truncated")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        match ApiError::from_status(reqwest::StatusCode::FORBIDDEN, &body) {
            ApiError::AccessDenied(message) => {
                assert!(message.len() < body.len());
                assert!(message.contains("truncated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
