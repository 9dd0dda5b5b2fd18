use axum::{routing::get, Router};

use crate::features::kodepos::handlers::{self, KodeposState};

/// Create routes for the site pages
pub fn routes(state: KodeposState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        // Hierarchy, one route per depth
        .route("/provinsi", get(handlers::list_provinces))
        .route("/provinsi/{provinsi}", get(handlers::get_province))
        .route(
            "/provinsi/{provinsi}/kabupaten/{kabupaten}",
            get(handlers::get_regency),
        )
        .route(
            "/provinsi/{provinsi}/kabupaten/{kabupaten}/kecamatan/{kecamatan}",
            get(handlers::get_district),
        )
        .route(
            "/provinsi/{provinsi}/kabupaten/{kabupaten}/kecamatan/{kecamatan}/kelurahan/{kelurahan}",
            get(handlers::get_village),
        )
        // Postal code lookup and its form target
        .route("/kodepos", get(handlers::kodepos_form))
        .route("/kodepos/{kodepos}", get(handlers::get_kodepos))
        .route("/cari", get(handlers::search))
        .fallback(handlers::fallback)
        .with_state(state)
}
