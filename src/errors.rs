use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    status: u16,
}

/// Structured API error that serializes to JSON.
///
/// ```json
/// {
///   "error": {
///     "code": "store_error",
///     "message": "server selection timeout",
///     "status": 500
///   }
/// }
/// ```
///
/// Validation errors are produced before any store interaction; store errors
/// carry the underlying driver error's text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Store(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Store(_) => "store_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        // Log according to severity.
        if status.is_server_error() {
            tracing::error!(code = self.code(), status = status.as_u16(), "{message}");
        } else {
            tracing::warn!(code = self.code(), status = status.as_u16(), "{message}");
        }

        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message,
                status: status.as_u16(),
            },
        };

        (status, Json(envelope)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    /// Helper: convert an `AppError` into its JSON body string.
    async fn body_string(err: AppError) -> String {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_422() {
        let response = AppError::validation("subject_id is required").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_string(AppError::validation("subject_id is required")).await;
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"]["code"], "validation_error");
        assert_eq!(value["error"]["message"], "subject_id is required");
        assert_eq!(value["error"]["status"], 422);
    }

    #[tokio::test]
    async fn store_maps_to_500() {
        let response = AppError::store("connection refused").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_string(AppError::store("connection refused")).await;
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"]["code"], "store_error");
        assert_eq!(value["error"]["message"], "connection refused");
        assert_eq!(value["error"]["status"], 500);
    }
}
