//! HTTP response handling for errors

use super::types::BulkError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail carried by [`ErrorResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ResponseError for BulkError {
    fn status_code(&self) -> StatusCode {
        match self {
            BulkError::Conflict(_) => StatusCode::CONFLICT,
            BulkError::Validation(_) | BulkError::RowSource(_) => StatusCode::BAD_REQUEST,
            BulkError::Serialization(_) => StatusCode::BAD_REQUEST,
            BulkError::NotFound(_) => StatusCode::NOT_FOUND,
            BulkError::Remote(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        })
    }
}
