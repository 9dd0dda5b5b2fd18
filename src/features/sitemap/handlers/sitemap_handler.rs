use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppPath;
use crate::features::sitemap::services::SitemapService;
use crate::shared::constants::{SITEMAP_INDEX_MAX_AGE_SECS, SITEMAP_MAX_AGE_SECS};

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

fn xml_response(body: String, max_age: u32) -> Response {
    (
        [
            (header::CONTENT_TYPE, XML_CONTENT_TYPE.to_string()),
            (header::CACHE_CONTROL, format!("public, max-age={}", max_age)),
        ],
        body,
    )
        .into_response()
}

/// `/sitemap.xml`
pub async fn sitemap_index(State(service): State<Arc<SitemapService>>) -> Result<Response> {
    let xml = service.index().await?;
    Ok(xml_response(xml, SITEMAP_INDEX_MAX_AGE_SECS))
}

/// `/sitemap/{page}.xml`
pub async fn sitemap_chunk(
    State(service): State<Arc<SitemapService>>,
    AppPath(file): AppPath<String>,
) -> Result<Response> {
    let not_found = || AppError::NotFound(format!("Sitemap {} tidak ditemukan", file));

    // Only the plain decimal form is served, so `01.xml` and `+1.xml` are 404
    let page = file
        .strip_suffix(".xml")
        .and_then(|digits| {
            let page: i64 = digits.parse().ok()?;
            (page.to_string() == digits).then_some(page)
        })
        .ok_or_else(not_found)?;

    match service.chunk(page).await? {
        Some(xml) => Ok(xml_response(xml, SITEMAP_MAX_AGE_SECS)),
        None => Err(not_found()),
    }
}

pub async fn robots(State(service): State<Arc<SitemapService>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        service.robots(),
    )
}
