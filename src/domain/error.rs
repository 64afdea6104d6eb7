use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the generation layer.
///
/// Validation failures surface as HTTP 400 with a `{"error": message}` body;
/// anything unexpected during record building maps to HTTP 500. Validation
/// always happens before generation starts, so a failed request never leaves
/// a response half-written.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A supplied query or body parameter failed validation.
    #[error("invalid value for parameter '{0}'")]
    InvalidParameter(&'static str),

    /// The custom endpoint was called without a non-empty schema.
    #[error("request body must include a non-empty 'schema' object")]
    MissingSchema,

    /// Unexpected failure while building a record. Should not occur under a
    /// valid configuration; treated as a defect.
    #[error("internal generation error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) | ApiError::MissingSchema => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal generation error: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_maps_to_400() {
        let response = ApiError::InvalidParameter("count").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_schema_maps_to_400() {
        let response = ApiError::MissingSchema.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn message_names_the_parameter() {
        let err = ApiError::InvalidParameter("ageRange");
        assert!(err.to_string().contains("ageRange"));
    }
}
