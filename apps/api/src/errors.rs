use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::session::Stage;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot {operation} while the session is in stage {stage:?}")]
    InvalidTransition {
        operation: &'static str,
        stage: Stage,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Generation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a generator failure with the step that triggered it.
    /// A missing credential is a configuration problem, not a generation one.
    pub fn from_llm(step: &str, err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => {
                AppError::Configuration("No API key configured (set OPENAI_API_KEY)".to_string())
            }
            other => AppError::Generation(format!("{step} failed: {other}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_STAGE", self.to_string())
            }
            AppError::Configuration(msg) => {
                tracing::warn!("Configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_maps_to_configuration() {
        let err = AppError::from_llm("Resume generation", LlmError::MissingCredential);
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_api_error_message_is_kept_for_the_user() {
        let err = AppError::from_llm(
            "Resume generation",
            LlmError::Api {
                status: 401,
                message: "Incorrect API key provided".to_string(),
            },
        );
        let AppError::Generation(msg) = err else {
            panic!("expected generation error");
        };
        assert!(msg.starts_with("Resume generation failed"));
        assert!(msg.contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err: AppError = anyhow::anyhow!("serializer exploded").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("serializer exploded"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::InvalidTransition {
                    operation: "start the interview",
                    stage: Stage::Idle,
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::Configuration("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Generation("x".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal(anyhow::anyhow!("x")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
