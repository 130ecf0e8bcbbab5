use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::state::AppState;

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = state.with_store(|store| store.list_products()).await?;
    Ok(HttpResponse::Ok().json(products))
}
