use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::state::AppState;

pub async fn get(state: web::Data<AppState>, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = state
        .with_store(move |store| store.get_product(id))
        .await?
        .ok_or(AppError::ProductNotFound(id))?;

    Ok(HttpResponse::Ok().json(product))
}
