// Route exports
pub mod matching;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::core::MatchError;
use crate::models::ErrorResponse;
use crate::services::StorageError;

pub use matching::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matching::configure),
    );
}

/// JSON, query-string and payload settings shared by the server and tests
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error));
}

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Validation(String),

    #[error("{kind}: {message}")]
    BadRequest { kind: &'static str, message: String },

    #[error("donor {0} not found")]
    DonorNotFound(i64),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Match(MatchError::InvalidReferencePoint) => "invalid_reference_point",
            ApiError::Match(MatchError::InvalidRadius(_)) => "invalid_radius",
            ApiError::Match(MatchError::UnknownBloodGroup(_)) => "unknown_blood_group",
            ApiError::Storage(_) => "storage_error",
            ApiError::Validation(_) => "validation_failed",
            ApiError::BadRequest { kind, .. } => *kind,
            ApiError::DonorNotFound(_) => "not_found",
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Match(MatchError::InvalidReferencePoint) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Match(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::DonorNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let message = match self {
            ApiError::BadRequest { message, .. } => message.clone(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest {
        kind: "invalid_json",
        message: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest {
        kind: "invalid_query",
        message: format!("Invalid query: {}", err),
    }
    .into()
}

/// Handle path segment errors
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest {
        kind: "invalid_path",
        message: format!("Invalid path: {}", err),
    }
    .into()
}
