use actix_web::{web, HttpResponse};
use log::info;

use crate::error::AppError;
use crate::models::ProductPayload;
use crate::state::AppState;

/// Replace both fields of an existing product and return the stored row.
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let payload = payload.into_inner();
    let product = state
        .with_store(move |store| store.update_product(id, &payload))
        .await?
        .ok_or(AppError::ProductNotFound(id))?;

    info!("Updated product {}", id);
    Ok(HttpResponse::Ok().json(product))
}
