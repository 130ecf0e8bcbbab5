use actix_web::{http::StatusCode, web, HttpResponse};
use log::info;

use crate::error::AppError;
use crate::models::ProductPayload;
use crate::response;
use crate::state::AppState;

pub async fn create(
    state: web::Data<AppState>,
    payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let product = state
        .with_store(move |store| store.create_product(&payload))
        .await?;

    info!("Created product {}", product.id);
    Ok(response::message(StatusCode::CREATED, "New row added."))
}
