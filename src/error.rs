use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use failure::Fail;
use log::error;

use crate::response;

/// Failures reaching or querying the store.
#[derive(Debug, Fail)]
pub enum StoreError {
    #[fail(display = "{}", _0)]
    Pool(#[cause] diesel::r2d2::PoolError),
    #[fail(display = "{}", _0)]
    Query(#[cause] diesel::result::Error),
    #[fail(display = "store task was cancelled")]
    Cancelled,
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        StoreError::Pool(e)
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        StoreError::Query(e)
    }
}

/// Everything a request can fail with. The display text is what the client
/// sees in the `error` envelope.
#[derive(Debug, Fail)]
pub enum AppError {
    #[fail(display = "Invalid payload")]
    InvalidPayload,
    #[fail(display = "Invalid product ID")]
    InvalidProductId,
    // Identical for every authentication failure so callers cannot probe
    // which step rejected them.
    #[fail(display = "Invalid/Missing Credentials.")]
    Unauthorized,
    #[fail(display = "Product {} not found", _0)]
    ProductNotFound(i32),
    #[fail(display = "{}", _0)]
    Store(#[cause] StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<BlockingError> for AppError {
    fn from(_: BlockingError) -> Self {
        AppError::Store(StoreError::Cancelled)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload | AppError::InvalidProductId => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Store(e) = self {
            error!("{}", e);
        }
        response::error(self.status_code(), &self.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidProductId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ProductNotFound(3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Store(StoreError::Cancelled).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_text_passes_through() {
        let e: AppError = StoreError::Query(diesel::result::Error::NotFound).into();
        assert_eq!(e.to_string(), diesel::result::Error::NotFound.to_string());
    }
}
