use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::kodepos::models::{
    DistrictRef, KodeposRecord, RegencyRef, VillageEntry, VillageRef,
};

/// Read-only access to the postal code table.
///
/// Every list is deduplicated on its projection and ordered by
/// (provinsi, kabupaten, kecamatan, kelurahan). Name arguments are exact
/// display names, already resolved from URL slugs.
#[async_trait]
pub trait KodeposRepository: Send + Sync {
    /// Distinct province names
    async fn provinces(&self) -> Result<Vec<String>>;

    /// Distinct regency names of a province
    async fn regencies(&self, provinsi: &str) -> Result<Vec<String>>;

    /// Distinct district names of a regency
    async fn districts(&self, provinsi: &str, kabupaten: &str) -> Result<Vec<String>>;

    /// Distinct (kelurahan, kodepos) pairs of a district
    async fn villages(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
    ) -> Result<Vec<VillageEntry>>;

    /// First record for a village (lowest postal code when it has several)
    async fn record(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
        kelurahan: &str,
    ) -> Result<Option<KodeposRecord>>;

    /// Records using a postal code; `limit = None` returns all of them
    async fn by_kodepos(&self, kodepos: &str, limit: Option<i64>) -> Result<Vec<KodeposRecord>>;

    /// Records whose village name starts with `prefix` (case-insensitive)
    async fn search_villages(&self, prefix: &str, limit: i64) -> Result<Vec<KodeposRecord>>;

    /// Distinct districts whose name starts with `prefix` (case-insensitive)
    async fn search_districts(&self, prefix: &str, limit: i64) -> Result<Vec<DistrictRef>>;

    /// Number of distinct villages (4-tuples)
    async fn count_villages(&self) -> Result<i64>;

    /// One page of distinct villages
    async fn village_page(&self, limit: i64, offset: i64) -> Result<Vec<VillageRef>>;

    /// Every distinct regency with its province
    async fn all_regencies(&self) -> Result<Vec<RegencyRef>>;

    /// Every distinct district with its parents
    async fn all_districts(&self) -> Result<Vec<DistrictRef>>;
}
