use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Poll not found")]
    PollNotFound,
    #[error("Option {0} does not exist on this poll")]
    InvalidOption(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            PollError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            PollError::PollNotFound => (StatusCode::NOT_FOUND, "Poll not found"),
            PollError::InvalidOption(_) => (StatusCode::BAD_REQUEST, "Invalid option"),
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for PollError {
    fn from(rejection: JsonRejection) -> Self {
        PollError::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PollError::PollNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PollError::InvalidOption(9).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PollError::InvalidRequest("empty question".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
