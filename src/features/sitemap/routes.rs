use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::sitemap::handlers;
use crate::features::sitemap::services::SitemapService;

/// Create routes for the sitemap feature
pub fn routes(service: Arc<SitemapService>) -> Router {
    Router::new()
        .route("/sitemap.xml", get(handlers::sitemap_index))
        // `{file}` is "<page>.xml"; the handler strips the extension
        .route("/sitemap/{file}", get(handlers::sitemap_chunk))
        .route("/robots.txt", get(handlers::robots))
        .with_state(service)
}
