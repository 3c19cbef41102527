//! HTTP mapping for `NotebookError`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use super::models::ErrorResponse;
use crate::error::NotebookError;

impl ResponseError for NotebookError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
