//! Deduplicated projections of `tbl_kodepos` used by list queries.

use serde::Serialize;
use sqlx::FromRow;

use crate::features::kodepos::paths;

/// Village name with its postal code, scoped to a known district
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct VillageEntry {
    pub kelurahan: String,
    pub kodepos: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RegencyRef {
    pub provinsi: String,
    pub kabupaten: String,
}

impl RegencyRef {
    pub fn path(&self) -> String {
        paths::regency_path(&self.provinsi, &self.kabupaten)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DistrictRef {
    pub provinsi: String,
    pub kabupaten: String,
    pub kecamatan: String,
}

impl DistrictRef {
    pub fn path(&self) -> String {
        paths::district_path(&self.provinsi, &self.kabupaten, &self.kecamatan)
    }
}

/// Full identity of a village, without its postal code
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct VillageRef {
    pub provinsi: String,
    pub kabupaten: String,
    pub kecamatan: String,
    pub kelurahan: String,
}

impl VillageRef {
    pub fn path(&self) -> String {
        paths::village_path(
            &self.provinsi,
            &self.kabupaten,
            &self.kecamatan,
            &self.kelurahan,
        )
    }
}
