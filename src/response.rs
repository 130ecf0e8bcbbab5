use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;

/// `{"error": message}` with the given status.
pub fn error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

/// `{"message": message}` with the given status.
pub fn message(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "message": message }))
}
