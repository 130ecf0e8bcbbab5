use actix_web::web;
use std::sync::Arc;

use crate::error::{AppError, StoreError};
use crate::store::Store;

/// Shared by every worker for the life of the process.
pub struct AppState {
    store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> AppState {
        AppState { store }
    }

    /// Run blocking store work on the blocking thread pool.
    pub async fn with_store<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&dyn Store) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(web::block(move || f(store.as_ref())).await??)
    }
}
