//! # Scribe API Server
//!
//! Actix-web request layer over the Scribe services. The binary in
//! `main.rs` wires configuration, telemetry and CORS around [`configure_app`].

use actix_cors::Cors;
use actix_web::web;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

use config::AppConfig;
use state::AppState;

/// Register shared state and every route.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .configure(handlers::configure_routes);
    }
}

/// CORS policy from `CORS_ORIGINS`. No explicit origins means any origin.
pub fn cors(config: &AppConfig) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if config.cors_origins.is_empty() {
        return cors.allow_any_origin();
    }

    config
        .cors_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
