use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppPath, AppQuery};
use crate::features::kodepos::dtos::{KodeposFormQuery, SearchQuery};
use crate::features::kodepos::paths::{self, HOME_PATH};
use crate::features::kodepos::services::{LocationService, Lookup};
use crate::features::kodepos::views;
use crate::shared::templates::TemplateRenderer;
use crate::shared::types::{Page, SiteInfo};

const PLACE_NOT_FOUND: &str =
    "Periksa ejaan nama kelurahan/kecamatan/kabupaten atau jelajahi dari halaman provinsi.";
const PAGE_NOT_FOUND: &str = "Halaman yang Anda cari tidak tersedia.";

/// Shared state of the page routes
#[derive(Clone)]
pub struct KodeposState {
    pub service: Arc<LocationService>,
    pub renderer: Arc<TemplateRenderer>,
    pub site: Arc<SiteInfo>,
}

impl KodeposState {
    fn render<T: Serialize>(&self, template: &str, page: &Page<T>) -> Result<Html<String>> {
        Ok(Html(self.renderer.render(template, page)?))
    }

    fn not_found(&self, path: &str, message: &str) -> Result<Response> {
        let page = views::not_found(&self.site, path, message);
        let html = self.render("pages/not_found.html", &page)?;
        Ok((StatusCode::NOT_FOUND, html).into_response())
    }

    /// Turn a lookup into a rendered page, a permanent redirect or a 404
    fn respond<T, P, F>(&self, lookup: Lookup<T>, template: &str, uri: &Uri, build: F) -> Result<Response>
    where
        P: Serialize,
        F: FnOnce(&SiteInfo, T) -> Page<P>,
    {
        match lookup {
            Lookup::Found(detail) => {
                let page = build(&self.site, detail);
                Ok(self.render(template, &page)?.into_response())
            }
            Lookup::Redirect(path) => {
                tracing::debug!(from = %uri.path(), to = %path, "Redirecting to canonical path");
                Ok(Redirect::permanent(&path).into_response())
            }
            Lookup::NotFound => self.not_found(uri.path(), PLACE_NOT_FOUND),
        }
    }
}

pub async fn home(State(state): State<KodeposState>) -> Result<Html<String>> {
    state.render("pages/home.html", &views::home(&state.site))
}

pub async fn list_provinces(State(state): State<KodeposState>) -> Result<Html<String>> {
    let provinces = state.service.provinces().await?;
    state.render(
        "pages/provinsi_index.html",
        &views::province_index(&state.site, provinces),
    )
}

pub async fn get_province(
    State(state): State<KodeposState>,
    AppPath(provinsi): AppPath<String>,
    uri: Uri,
) -> Result<Response> {
    let lookup = state.service.province(&provinsi).await?;
    state.respond(lookup, "pages/provinsi.html", &uri, views::province)
}

pub async fn get_regency(
    State(state): State<KodeposState>,
    AppPath((provinsi, kabupaten)): AppPath<(String, String)>,
    uri: Uri,
) -> Result<Response> {
    let lookup = state.service.regency(&provinsi, &kabupaten).await?;
    state.respond(lookup, "pages/kabupaten.html", &uri, views::regency)
}

pub async fn get_district(
    State(state): State<KodeposState>,
    AppPath((provinsi, kabupaten, kecamatan)): AppPath<(String, String, String)>,
    uri: Uri,
) -> Result<Response> {
    let lookup = state
        .service
        .district(&provinsi, &kabupaten, &kecamatan)
        .await?;
    state.respond(lookup, "pages/kecamatan.html", &uri, views::district)
}

pub async fn get_village(
    State(state): State<KodeposState>,
    AppPath((provinsi, kabupaten, kecamatan, kelurahan)): AppPath<(String, String, String, String)>,
    uri: Uri,
) -> Result<Response> {
    let lookup = state
        .service
        .village(&provinsi, &kabupaten, &kecamatan, &kelurahan)
        .await?;
    state.respond(lookup, "pages/kelurahan.html", &uri, views::village)
}

pub async fn get_kodepos(
    State(state): State<KodeposState>,
    AppPath(kodepos): AppPath<String>,
    uri: Uri,
) -> Result<Response> {
    match state.service.kodepos(&kodepos).await? {
        Lookup::NotFound => state.not_found(
            uri.path(),
            &format!("Kode pos {} tidak ditemukan.", kodepos),
        ),
        lookup => state.respond(lookup, "pages/kodepos.html", &uri, views::kodepos),
    }
}

/// Target of the postal code form; forwards to the code's page
pub async fn kodepos_form(AppQuery(query): AppQuery<KodeposFormQuery>) -> Redirect {
    match query.kode.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => Redirect::to(&paths::kodepos_path(code)),
        _ => Redirect::to(HOME_PATH),
    }
}

pub async fn search(
    State(state): State<KodeposState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Html<String>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let results = state
        .service
        .search(query.q.as_deref().unwrap_or_default())
        .await?;
    state.render("pages/cari.html", &views::search(&state.site, results))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn fallback(State(state): State<KodeposState>, uri: Uri) -> Result<Response> {
    tracing::debug!(path = %uri.path(), "No route matched");
    state.not_found(uri.path(), PAGE_NOT_FOUND)
}
