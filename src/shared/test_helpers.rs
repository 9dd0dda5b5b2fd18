#![cfg(test)]

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::error::{AppError, Result};
use crate::features::kodepos::models::{
    DistrictRef, KodeposRecord, RegencyRef, VillageEntry, VillageRef,
};
use crate::features::kodepos::repositories::KodeposRepository;

pub fn record(
    provinsi: &str,
    kabupaten: &str,
    kecamatan: &str,
    kelurahan: &str,
    kodepos: &str,
) -> KodeposRecord {
    KodeposRecord {
        provinsi: provinsi.to_string(),
        kabupaten: kabupaten.to_string(),
        kecamatan: kecamatan.to_string(),
        kelurahan: kelurahan.to_string(),
        kodepos: kodepos.to_string(),
    }
}

/// Small, realistic slice of the table covering the interesting cases:
/// shared postal codes, names with punctuation and diacritics, and two
/// villages that collapse to the same slug.
pub fn sample_records() -> Vec<KodeposRecord> {
    vec![
        record("Aceh", "Kab. Aceh Besar", "Darul Imarah", "Lamreung", "23352"),
        record("Aceh", "Kab. Aceh Besar", "Darul Imarah", "Garot", "23352"),
        record("Aceh", "Kab. Aceh Besar", "Darul Imarah", "Punie", "23352"),
        record("Aceh", "Kab. Aceh Besar", "Ingin Jaya", "Lubok", "23371"),
        record("Aceh", "Kota Banda Aceh", "Baiturrahman", "Ateuk Jawo", "23241"),
        record("Bali", "Kab. Badung", "Kuta Selatan", "Bénoa", "80361"),
        record("Bali", "Kab. Badung", "Kuta Selatan", "Jimbaran", "80361"),
        record("DI Yogyakarta (DIY)", "Kota Yogyakarta", "Gondokusuman", "Baciro", "55225"),
        record("DI Yogyakarta (DIY)", "Kota Yogyakarta", "Gondokusuman", "Demangan", "55221"),
        record("Jawa Tengah", "Kab. Grobogan", "Purwodadi", "Purwodadi", "58111"),
        record("Jawa Tengah", "Kab. Grobogan", "Purwodadi", "Suka Maju", "58112"),
        record("Jawa Tengah", "Kab. Grobogan", "Purwodadi", "Suka-Maju", "58113"),
        record("Jawa Tengah", "Kab. Grobogan", "Purwodadi", "Kuripan", "58111"),
        record("Jawa Tengah", "Kab. Grobogan", "Purwodadi", "Kuripan", "58119"),
        record("Sumatera Utara", "Kab. Labuhanbatu", "Bilah Hulu", "Aek Nabara", "21451"),
        record("Sumatera Utara", "Kab. Labuhanbatu", "Bilah Hulu", "Bangka-Belitung", "21451"),
    ]
}

/// `KodeposRepository` over an in-memory table, sorted like the real store
pub struct MemoryKodeposRepository {
    records: Vec<KodeposRecord>,
    calls: AtomicUsize,
}

impl MemoryKodeposRepository {
    pub fn new(mut records: Vec<KodeposRecord>) -> Self {
        records.sort_by(|a, b| {
            (&a.provinsi, &a.kabupaten, &a.kecamatan, &a.kelurahan, &a.kodepos).cmp(&(
                &b.provinsi,
                &b.kabupaten,
                &b.kecamatan,
                &b.kelurahan,
                &b.kodepos,
            ))
        });
        Self {
            records,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn sample() -> Self {
        Self::new(sample_records())
    }

    /// Number of repository calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn distinct<T: Ord + Clone>(&self, items: impl Iterator<Item = T>) -> Vec<T> {
        items.collect::<BTreeSet<T>>().into_iter().collect()
    }
}

#[async_trait]
impl KodeposRepository for MemoryKodeposRepository {
    async fn provinces(&self) -> Result<Vec<String>> {
        self.touch();
        Ok(self.distinct(self.records.iter().map(|r| r.provinsi.clone())))
    }

    async fn regencies(&self, provinsi: &str) -> Result<Vec<String>> {
        self.touch();
        Ok(self.distinct(
            self.records
                .iter()
                .filter(|r| r.provinsi == provinsi)
                .map(|r| r.kabupaten.clone()),
        ))
    }

    async fn districts(&self, provinsi: &str, kabupaten: &str) -> Result<Vec<String>> {
        self.touch();
        Ok(self.distinct(
            self.records
                .iter()
                .filter(|r| r.provinsi == provinsi && r.kabupaten == kabupaten)
                .map(|r| r.kecamatan.clone()),
        ))
    }

    async fn villages(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
    ) -> Result<Vec<VillageEntry>> {
        self.touch();
        let pairs = self.distinct(
            self.records
                .iter()
                .filter(|r| {
                    r.provinsi == provinsi && r.kabupaten == kabupaten && r.kecamatan == kecamatan
                })
                .map(|r| (r.kelurahan.clone(), r.kodepos.clone())),
        );
        Ok(pairs
            .into_iter()
            .map(|(kelurahan, kodepos)| VillageEntry { kelurahan, kodepos })
            .collect())
    }

    async fn record(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
        kelurahan: &str,
    ) -> Result<Option<KodeposRecord>> {
        self.touch();
        Ok(self
            .records
            .iter()
            .find(|r| {
                r.provinsi == provinsi
                    && r.kabupaten == kabupaten
                    && r.kecamatan == kecamatan
                    && r.kelurahan == kelurahan
            })
            .cloned())
    }

    async fn by_kodepos(&self, kodepos: &str, limit: Option<i64>) -> Result<Vec<KodeposRecord>> {
        self.touch();
        let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(self
            .records
            .iter()
            .filter(|r| r.kodepos == kodepos)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_villages(&self, prefix: &str, limit: i64) -> Result<Vec<KodeposRecord>> {
        self.touch();
        let prefix = prefix.to_lowercase();
        Ok(self
            .records
            .iter()
            .filter(|r| r.kelurahan.to_lowercase().starts_with(&prefix))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn search_districts(&self, prefix: &str, limit: i64) -> Result<Vec<DistrictRef>> {
        self.touch();
        let prefix = prefix.to_lowercase();
        let districts = self.distinct(
            self.records
                .iter()
                .filter(|r| r.kecamatan.to_lowercase().starts_with(&prefix))
                .map(|r| (r.provinsi.clone(), r.kabupaten.clone(), r.kecamatan.clone())),
        );
        Ok(districts
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|(provinsi, kabupaten, kecamatan)| DistrictRef {
                provinsi,
                kabupaten,
                kecamatan,
            })
            .collect())
    }

    async fn count_villages(&self) -> Result<i64> {
        Ok(self.village_page(i64::MAX, 0).await?.len() as i64)
    }

    async fn village_page(&self, limit: i64, offset: i64) -> Result<Vec<VillageRef>> {
        self.touch();
        let villages = self.distinct(self.records.iter().map(|r| {
            (
                r.provinsi.clone(),
                r.kabupaten.clone(),
                r.kecamatan.clone(),
                r.kelurahan.clone(),
            )
        }));
        Ok(villages
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(provinsi, kabupaten, kecamatan, kelurahan)| VillageRef {
                provinsi,
                kabupaten,
                kecamatan,
                kelurahan,
            })
            .collect())
    }

    async fn all_regencies(&self) -> Result<Vec<RegencyRef>> {
        self.touch();
        let regencies = self.distinct(
            self.records
                .iter()
                .map(|r| (r.provinsi.clone(), r.kabupaten.clone())),
        );
        Ok(regencies
            .into_iter()
            .map(|(provinsi, kabupaten)| RegencyRef {
                provinsi,
                kabupaten,
            })
            .collect())
    }

    async fn all_districts(&self) -> Result<Vec<DistrictRef>> {
        self.touch();
        let districts = self.distinct(
            self.records
                .iter()
                .map(|r| (r.provinsi.clone(), r.kabupaten.clone(), r.kecamatan.clone())),
        );
        Ok(districts
            .into_iter()
            .map(|(provinsi, kabupaten, kecamatan)| DistrictRef {
                provinsi,
                kabupaten,
                kecamatan,
            })
            .collect())
    }
}

/// Repository whose every read fails, as after exhausted retries
pub struct FailingKodeposRepository;

impl FailingKodeposRepository {
    fn fail<T>() -> Result<T> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl KodeposRepository for FailingKodeposRepository {
    async fn provinces(&self) -> Result<Vec<String>> {
        Self::fail()
    }
    async fn regencies(&self, _: &str) -> Result<Vec<String>> {
        Self::fail()
    }
    async fn districts(&self, _: &str, _: &str) -> Result<Vec<String>> {
        Self::fail()
    }
    async fn villages(&self, _: &str, _: &str, _: &str) -> Result<Vec<VillageEntry>> {
        Self::fail()
    }
    async fn record(&self, _: &str, _: &str, _: &str, _: &str) -> Result<Option<KodeposRecord>> {
        Self::fail()
    }
    async fn by_kodepos(&self, _: &str, _: Option<i64>) -> Result<Vec<KodeposRecord>> {
        Self::fail()
    }
    async fn search_villages(&self, _: &str, _: i64) -> Result<Vec<KodeposRecord>> {
        Self::fail()
    }
    async fn search_districts(&self, _: &str, _: i64) -> Result<Vec<DistrictRef>> {
        Self::fail()
    }
    async fn count_villages(&self) -> Result<i64> {
        Self::fail()
    }
    async fn village_page(&self, _: i64, _: i64) -> Result<Vec<VillageRef>> {
        Self::fail()
    }
    async fn all_regencies(&self) -> Result<Vec<RegencyRef>> {
        Self::fail()
    }
    async fn all_districts(&self) -> Result<Vec<DistrictRef>> {
        Self::fail()
    }
}
