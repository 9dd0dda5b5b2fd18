//! Site paths for every level of the hierarchy.
//!
//! All segments go through [`to_slug`], the same function used to match
//! inbound segments, so emitted links resolve back to their rows.

use crate::shared::slug::to_slug;

pub const HOME_PATH: &str = "/";
pub const PROVINCE_INDEX_PATH: &str = "/provinsi";
pub const SEARCH_PATH: &str = "/cari";

pub fn province_path(provinsi: &str) -> String {
    format!("/provinsi/{}", to_slug(provinsi))
}

pub fn regency_path(provinsi: &str, kabupaten: &str) -> String {
    format!("{}/kabupaten/{}", province_path(provinsi), to_slug(kabupaten))
}

pub fn district_path(provinsi: &str, kabupaten: &str, kecamatan: &str) -> String {
    format!(
        "{}/kecamatan/{}",
        regency_path(provinsi, kabupaten),
        to_slug(kecamatan)
    )
}

pub fn village_path(provinsi: &str, kabupaten: &str, kecamatan: &str, kelurahan: &str) -> String {
    format!(
        "{}/kelurahan/{}",
        district_path(provinsi, kabupaten, kecamatan),
        to_slug(kelurahan)
    )
}

pub fn kodepos_path(kodepos: &str) -> String {
    format!("/kodepos/{}", urlencoding::encode(kodepos))
}

pub fn search_path(term: &str) -> String {
    if term.is_empty() {
        SEARCH_PATH.to_string()
    } else {
        format!("{}?q={}", SEARCH_PATH, urlencoding::encode(term))
    }
}

/// Path for a resolved prefix of the hierarchy (1 to 4 names)
pub fn hierarchy_path(names: &[String]) -> String {
    match names {
        [p] => province_path(p),
        [p, k] => regency_path(p, k),
        [p, k, kec] => district_path(p, k, kec),
        [p, k, kec, kel] => village_path(p, k, kec, kel),
        _ => PROVINCE_INDEX_PATH.to_string(),
    }
}
