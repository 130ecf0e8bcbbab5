use actix_web::{http::StatusCode, web, HttpResponse};
use log::info;

use crate::error::AppError;
use crate::response;
use crate::state::AppState;

pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let removed = state
        .with_store(move |store| store.delete_product(id))
        .await?;
    if removed == 0 {
        return Err(AppError::ProductNotFound(id));
    }

    info!("Deleted product {}", id);
    Ok(response::message(StatusCode::OK, "Deleted."))
}
