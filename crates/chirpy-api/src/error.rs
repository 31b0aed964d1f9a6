use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_types::api::ErrorResponse;
use chirpy_types::error::CoreError;
use tracing::error;

/// Handler error. The one place core error kinds become status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request the extractors could not decode.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Core(core) => match core {
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, core.to_string()),
                CoreError::AlreadyExists(_) => (StatusCode::CONFLICT, core.to_string()),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, core.to_string()),
                CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, core.to_string()),
                CoreError::CorruptData(_) | CoreError::Io(_) | CoreError::Internal(_) => {
                    error!("Responding with 500: {}", core);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Something went wrong".to_string(),
                    )
                }
            },
            ApiError::Rejected { status, message } => (*status, message.clone()),
            ApiError::Internal(msg) => {
                error!("Responding with 500: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("spawn_blocking join error: {}", e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
