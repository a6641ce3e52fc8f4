use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use lookalike_similarity::WeightError;
use thiserror::Error;

/// Request failure, rendered as `{"success": false, "error": "..."}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}

impl From<lookalike_core::Error> for ApiError {
    fn from(e: lookalike_core::Error) -> Self {
        use lookalike_core::Error;
        match e {
            Error::CatalogNotFound(_) | Error::ProductNotFound(_) => ApiError::NotFound(e.to_string()),
            Error::CatalogExists(_) | Error::InvalidCandidate { .. } | Error::InvalidConfig(_) => {
                ApiError::BadRequest(e.to_string())
            }
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<WeightError> for ApiError {
    fn from(e: WeightError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
