use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rag_advisor::{AdvisoryFailure, RagError};
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] AiLlmError),

    #[error(transparent)]
    Rag(#[from] RagError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),

    /// Any failure of the advisory pipeline.
    #[error(transparent)]
    Advisory(#[from] AdvisoryFailure),
}

impl AppError {
    /// Request validation is answered by the JSON extractor; every error that
    /// reaches this type is a server-side failure.
    fn status_code(&self) -> StatusCode {
        match self {
            // Config/Rag/Bind/Server only occur at startup.
            AppError::Config(_)
            | AppError::Rag(_)
            | AppError::Bind { .. }
            | AppError::Server(_)
            | AppError::Advisory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body shared by every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn advisory_failure_is_500_with_detail() {
        let failure = AdvisoryFailure::from(RagError::NoChunksProduced);
        let res = AppError::from(failure).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v, serde_json::json!({"detail": "no chunks produced from document"}));
    }

    #[test]
    fn startup_errors_map_to_500() {
        let err = AppError::Bind {
            addr: "0.0.0.0:8000".into(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
