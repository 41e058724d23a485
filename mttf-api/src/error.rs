use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use mttf_core::{ErrorKind, PredictError};

#[derive(Debug)]
pub enum AppError {
    Predict(PredictError),
    ServiceUnavailable(String),
    Internal(anyhow::Error),
}

/// Input problems are the caller's to fix; anything else is a deployment fault.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    if kind.is_user_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub fn log_predict_error(err: &PredictError) {
    if err.kind().is_user_error() {
        tracing::warn!("Prediction rejected: {}", err);
    } else {
        tracing::error!("Prediction failed: {}", err);
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Predict(err) => {
                log_predict_error(&err);
                let kind = err.kind();
                (status_for(kind), json!({ "error": err.to_string(), "kind": kind }))
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": msg, "kind": "service_unavailable" }),
            ),
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error", "kind": "internal" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        Self::Predict(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Predict(body_error(rejection.body_text()))
    }
}

/// Undecodable request bodies are input errors like any other.
pub fn body_error(reason: String) -> PredictError {
    PredictError::invalid_input("request body", reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::UnrecognizedCategory), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::InvalidInput), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::SchemaMismatch), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::ArtifactLoad), StatusCode::INTERNAL_SERVER_ERROR);
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err: AppError = anyhow::anyhow!("thread pool poisoned").context("scoring").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["kind"], "internal");
        assert_eq!(body["error"], "Internal Server Error");
        assert!(!body.to_string().contains("poisoned"));
    }

    #[tokio::test]
    async fn test_body_error_is_invalid_input() {
        let response = AppError::from(body_error("missing field `age`".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_body(response).await;
        assert_eq!(body["kind"], "invalid_input");
        assert_eq!(body["error"], "Invalid request body: missing field `age`");
    }

    #[test]
    fn test_predict_error_response() {
        let err = AppError::from(PredictError::unrecognized("ProductType", "Lathe"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
