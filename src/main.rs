#[macro_use]
extern crate diesel;

mod auth;
mod config;
mod error;
mod hash;
mod models;
mod resource;
mod response;
mod schema;
mod state;
mod store;

use actix_web::{middleware, web, App, HttpServer};
use config::Config;
use hash::SaltedHash;
use log::{error, info};
use ring::rand::SystemRandom;
use state::AppState;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use store::PgStore;

static HASH_PASSWORD: &str = "hash-password";

/// Combined log format.
static ACCESS_LOG_FORMAT: &str = r#"%a - - %t "%r" %s %b "%{Referer}i" "%{User-Agent}i""#;

/// Read one password and write the column values for a new `users` row.
/// Users are provisioned by hand; the service only reads them.
fn hash_password<R: BufRead, W: Write>(mut input: R, mut out: W) -> io::Result<()> {
    let mut password = String::new();
    input.read_line(&mut password)?;
    let password = password.trim_end_matches(|c| c == '\n' || c == '\r');

    let rng = SystemRandom::new();
    let SaltedHash { salt, hash } = SaltedHash::from_password(&rng, password).map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("failed to generate salt: {}", e))
    })?;

    writeln!(out, "salt: {}", salt)?;
    writeln!(out, "salted_password_hash: {}", hash)?;
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("products_api=info,actix_web=info"),
    )
    .init();

    if std::env::args().nth(1).as_deref() == Some(HASH_PASSWORD) {
        return hash_password(io::stdin().lock(), io::stdout().lock());
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Connecting to {}", config.database.describe());
    let store = match PgStore::connect(&config.database.url()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open store connection: {}", e);
            std::process::exit(1);
        }
    };
    let state = web::Data::new(AppState::new(Arc::new(store)));

    info!(
        "Starting HTTP server on {}:{}...",
        config.server_host, config.server_port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::new(ACCESS_LOG_FORMAT))
            .configure(resource::configure)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
