use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::kodepos::models::{DistrictRef, KodeposRecord, VillageEntry};
use crate::features::kodepos::paths;

/// Query string of `/cari`
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(max = 100, message = "Kata kunci maksimal 100 karakter"))]
    pub q: Option<String>,
}

/// Query string of the postal code form (`/kodepos?kode=...`)
#[derive(Debug, Deserialize)]
pub struct KodeposFormQuery {
    pub kode: Option<String>,
}

/// A named link to another page of the site
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub href: String,
}

impl Link {
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

/// A village of a known district, with its postal code
#[derive(Debug, Clone, Serialize)]
pub struct VillageLink {
    pub name: String,
    pub kodepos: String,
    pub href: String,
    pub kodepos_href: String,
}

impl VillageLink {
    pub fn new(provinsi: &str, kabupaten: &str, kecamatan: &str, entry: &VillageEntry) -> Self {
        Self {
            name: entry.kelurahan.clone(),
            kodepos: entry.kodepos.clone(),
            href: paths::village_path(provinsi, kabupaten, kecamatan, &entry.kelurahan),
            kodepos_href: paths::kodepos_path(&entry.kodepos),
        }
    }
}

/// A full record with its page link
#[derive(Debug, Clone, Serialize)]
pub struct PlaceLink {
    #[serde(flatten)]
    pub record: KodeposRecord,
    pub href: String,
}

impl From<KodeposRecord> for PlaceLink {
    fn from(record: KodeposRecord) -> Self {
        Self {
            href: record.path(),
            record,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistrictLink {
    #[serde(flatten)]
    pub district: DistrictRef,
    pub href: String,
}

impl From<DistrictRef> for DistrictLink {
    fn from(district: DistrictRef) -> Self {
        Self {
            href: district.path(),
            district,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

// ==================== Page payloads ====================

#[derive(Debug, Serialize)]
pub struct HomeData {
    pub search_action: &'static str,
    pub kodepos_action: &'static str,
    pub examples: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct ProvinceIndexData {
    pub provinces: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct ProvinceData {
    pub provinsi: String,
    pub regencies: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct RegencyData {
    pub provinsi: String,
    pub kabupaten: String,
    pub province_href: String,
    pub districts: Vec<Link>,
    pub siblings: Vec<Link>,
    /// Sibling regencies not listed
    pub more_siblings: usize,
}

#[derive(Debug, Serialize)]
pub struct DistrictData {
    pub provinsi: String,
    pub kabupaten: String,
    pub kecamatan: String,
    pub regency_href: String,
    pub villages: Vec<VillageLink>,
    pub unique_kodepos: usize,
    pub siblings: Vec<Link>,
    pub more_siblings: usize,
}

#[derive(Debug, Serialize)]
pub struct VillageData {
    pub record: KodeposRecord,
    pub district_href: String,
    pub kodepos_href: String,
    pub siblings: Vec<VillageLink>,
    pub shared: Vec<PlaceLink>,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Serialize)]
pub struct KodeposData {
    pub kodepos: String,
    pub villages: Vec<PlaceLink>,
}

#[derive(Debug, Serialize)]
pub struct SearchData {
    pub term: String,
    pub villages: Vec<PlaceLink>,
    pub districts: Vec<DistrictLink>,
}

#[derive(Debug, Serialize)]
pub struct NotFoundData {
    pub message: String,
}
