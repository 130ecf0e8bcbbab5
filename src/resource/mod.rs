pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use create::create;
pub use delete::delete;
pub use get::get;
pub use list::list;
pub use update::update;

use actix_web::{middleware::from_fn, web};
use log::debug;

use crate::auth::require_basic_auth;
use crate::error::AppError;

/// Bodies larger than this are rejected as invalid payloads.
const JSON_LIMIT: usize = 4096;

/// API Guide (keep updated!)
/// - /api/products/list
///     - GET: every product
/// - /api/products/new
///     - POST { name, manufacturer }: add a product
/// - /api/products/{id}
///     - GET: one product
///     - PUT { name, manufacturer }: replace a product
///     - DELETE: remove a product
///
/// Every route requires Basic authentication. Ids are digits only; anything
/// else fails to match and never reaches the guard.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            // clients send PUT bodies without a content type
            .content_type_required(false)
            .error_handler(|err, _req| {
                debug!("Rejected payload: {}", err);
                AppError::InvalidPayload.into()
            }),
    )
    .app_data(
        web::PathConfig::default().error_handler(|_err, _req| AppError::InvalidProductId.into()),
    )
    .service(
        web::scope("/api/products")
            .service(
                web::resource("/list")
                    .wrap(from_fn(require_basic_auth))
                    .route(web::get().to(list)),
            )
            .service(
                web::resource("/new")
                    .wrap(from_fn(require_basic_auth))
                    .route(web::post().to(create)),
            )
            .service(
                web::resource("/{id:[0-9]+}")
                    .wrap(from_fn(require_basic_auth))
                    .route(web::get().to(get))
                    .route(web::put().to(update))
                    .route(web::delete().to(delete)),
            ),
    );
}
