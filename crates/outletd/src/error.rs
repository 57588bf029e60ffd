//! HTTP error mapping for outletd.
//!
//! Every failure is a 400 carrying the raw error text in `detail`, except an
//! empty catalog which is a 404.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use outlet_common::ErrorBody;
use thiserror::Error;

use crate::store::StoreError;
use crate::translator::TranslateError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<TranslateError> for ApiError {
    fn from(e: TranslateError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
