use serde::Serialize;
use sqlx::FromRow;

use crate::features::kodepos::paths;

/// One row of `tbl_kodepos`: a village and its postal code
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct KodeposRecord {
    pub provinsi: String,
    pub kabupaten: String,
    pub kecamatan: String,
    pub kelurahan: String,
    pub kodepos: String,
}

impl KodeposRecord {
    /// Canonical village page path for this record
    pub fn path(&self) -> String {
        paths::village_path(
            &self.provinsi,
            &self.kabupaten,
            &self.kecamatan,
            &self.kelurahan,
        )
    }
}
