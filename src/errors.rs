use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Reasons a day contributes no data. None of them reach the user.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no summary at {key}")]
    NotFound { key: String },

    #[error("failed to fetch {key}: {reason}")]
    Network { key: String, reason: String },

    #[error("malformed summary at {key}: {source}")]
    MalformedJson {
        key: String,
        source: serde_json::Error,
    },

    #[error("field `{field}` in {key} is not numeric")]
    MissingField { key: String, field: &'static str },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}
