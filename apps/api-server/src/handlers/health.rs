//! Liveness endpoints.

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "healthy" })
}

/// GET /
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(RootResponse {
        status: "ok",
        app: "Scribe API",
        version: env!("CARGO_PKG_VERSION"),
    })
}
