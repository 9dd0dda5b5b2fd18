use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::kodepos::models::{DistrictRef, KodeposRecord, VillageEntry};
use crate::features::kodepos::paths;
use crate::features::kodepos::repositories::KodeposRepository;
use crate::shared::constants::{
    SEARCH_LIMIT, SHARED_KODEPOS_LIMIT, SIBLING_DISPLAY_LIMIT, SIBLING_VILLAGE_LIMIT,
};
use crate::shared::slug::resolve_segment;
use crate::shared::validation::KODEPOS_REGEX;

/// Outcome of resolving URL segments to a place
#[derive(Debug, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// The segments matched, but not in canonical form; carries the canonical path
    Redirect(String),
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceDetail {
    pub provinsi: String,
    pub regencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegencyDetail {
    pub provinsi: String,
    pub kabupaten: String,
    pub districts: Vec<String>,
    pub siblings: Vec<String>,
    /// Number of other regencies in the province, shown or not
    pub sibling_total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistrictDetail {
    pub provinsi: String,
    pub kabupaten: String,
    pub kecamatan: String,
    pub villages: Vec<VillageEntry>,
    pub unique_kodepos: usize,
    pub siblings: Vec<String>,
    pub sibling_total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VillageDetail {
    pub record: KodeposRecord,
    /// Other villages of the same district
    pub siblings: Vec<VillageEntry>,
    /// Villages using the same postal code, this one included
    pub shared: Vec<KodeposRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KodeposDetail {
    pub kodepos: String,
    pub villages: Vec<KodeposRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Trimmed search term; empty when nothing was searched
    pub term: String,
    pub villages: Vec<KodeposRecord>,
    pub districts: Vec<DistrictRef>,
}

/// Names matched for a run of URL segments, plus the candidates of the
/// deepest level (reused as siblings by the page builders).
struct Chain {
    names: Vec<String>,
    redirect: bool,
    peers: Vec<String>,
    villages: Vec<VillageEntry>,
}

impl Chain {
    fn canonical_path(&self) -> String {
        paths::hierarchy_path(&self.names)
    }

    fn siblings(&self, limit: usize) -> (Vec<String>, usize) {
        let current = self.names.last();
        let others: Vec<&String> = self
            .peers
            .iter()
            .filter(|name| Some(*name) != current)
            .collect();
        let total = others.len();
        (others.into_iter().take(limit).cloned().collect(), total)
    }
}

/// Service answering every page lookup from the postal code table
pub struct LocationService {
    repo: Arc<dyn KodeposRepository>,
}

impl LocationService {
    pub fn new(repo: Arc<dyn KodeposRepository>) -> Self {
        Self { repo }
    }

    /// Resolve segments level by level against the stored names
    async fn resolve(&self, segments: &[&str]) -> Result<Option<Chain>> {
        let mut names: Vec<String> = Vec::with_capacity(segments.len());
        let mut redirect = false;
        let mut peers = Vec::new();
        let mut villages = Vec::new();

        for (depth, segment) in segments.iter().enumerate() {
            peers = match depth {
                0 => self.repo.provinces().await?,
                1 => self.repo.regencies(&names[0]).await?,
                2 => self.repo.districts(&names[0], &names[1]).await?,
                _ => {
                    villages = self
                        .repo
                        .villages(&names[0], &names[1], &names[2])
                        .await?;
                    let mut village_names: Vec<String> =
                        villages.iter().map(|v| v.kelurahan.clone()).collect();
                    village_names.dedup();
                    village_names
                }
            };

            let Some(resolved) = resolve_segment(peers.iter().map(String::as_str), segment) else {
                tracing::debug!(depth, segment = %segment, "Path segment matched no stored name");
                return Ok(None);
            };
            redirect |= resolved.needs_redirect(segment);
            names.push(resolved.name.to_string());
        }

        Ok(Some(Chain {
            names,
            redirect,
            peers,
            villages,
        }))
    }

    /// All province names
    pub async fn provinces(&self) -> Result<Vec<String>> {
        self.repo.provinces().await
    }

    pub async fn province(&self, provinsi: &str) -> Result<Lookup<ProvinceDetail>> {
        let Some(chain) = self.resolve(&[provinsi]).await? else {
            return Ok(Lookup::NotFound);
        };
        if chain.redirect {
            return Ok(Lookup::Redirect(chain.canonical_path()));
        }

        let provinsi = chain.names[0].clone();
        let regencies = self.repo.regencies(&provinsi).await?;

        Ok(Lookup::Found(ProvinceDetail {
            provinsi,
            regencies,
        }))
    }

    pub async fn regency(&self, provinsi: &str, kabupaten: &str) -> Result<Lookup<RegencyDetail>> {
        let Some(chain) = self.resolve(&[provinsi, kabupaten]).await? else {
            return Ok(Lookup::NotFound);
        };
        if chain.redirect {
            return Ok(Lookup::Redirect(chain.canonical_path()));
        }

        let (siblings, sibling_total) = chain.siblings(SIBLING_DISPLAY_LIMIT);
        let provinsi = chain.names[0].clone();
        let kabupaten = chain.names[1].clone();
        let districts = self.repo.districts(&provinsi, &kabupaten).await?;

        Ok(Lookup::Found(RegencyDetail {
            provinsi,
            kabupaten,
            districts,
            siblings,
            sibling_total,
        }))
    }

    pub async fn district(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
    ) -> Result<Lookup<DistrictDetail>> {
        let Some(chain) = self.resolve(&[provinsi, kabupaten, kecamatan]).await? else {
            return Ok(Lookup::NotFound);
        };
        if chain.redirect {
            return Ok(Lookup::Redirect(chain.canonical_path()));
        }

        let (siblings, sibling_total) = chain.siblings(SIBLING_DISPLAY_LIMIT);
        let provinsi = chain.names[0].clone();
        let kabupaten = chain.names[1].clone();
        let kecamatan = chain.names[2].clone();
        let villages = self.repo.villages(&provinsi, &kabupaten, &kecamatan).await?;
        let unique_kodepos = villages
            .iter()
            .map(|v| v.kodepos.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Ok(Lookup::Found(DistrictDetail {
            provinsi,
            kabupaten,
            kecamatan,
            villages,
            unique_kodepos,
            siblings,
            sibling_total,
        }))
    }

    pub async fn village(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
        kelurahan: &str,
    ) -> Result<Lookup<VillageDetail>> {
        let Some(chain) = self
            .resolve(&[provinsi, kabupaten, kecamatan, kelurahan])
            .await?
        else {
            return Ok(Lookup::NotFound);
        };
        if chain.redirect {
            return Ok(Lookup::Redirect(chain.canonical_path()));
        }

        let [provinsi, kabupaten, kecamatan, kelurahan] = [0, 1, 2, 3].map(|i| &chain.names[i]);
        let Some(record) = self
            .repo
            .record(provinsi, kabupaten, kecamatan, kelurahan)
            .await?
        else {
            return Ok(Lookup::NotFound);
        };

        let siblings = chain
            .villages
            .iter()
            .filter(|v| &v.kelurahan != kelurahan)
            .take(SIBLING_VILLAGE_LIMIT)
            .cloned()
            .collect();
        let shared = self
            .repo
            .by_kodepos(&record.kodepos, Some(SHARED_KODEPOS_LIMIT))
            .await?;

        Ok(Lookup::Found(VillageDetail {
            record,
            siblings,
            shared,
        }))
    }

    /// Every village using a postal code; malformed codes are not queried
    pub async fn kodepos(&self, kodepos: &str) -> Result<Lookup<KodeposDetail>> {
        if !KODEPOS_REGEX.is_match(kodepos) {
            return Ok(Lookup::NotFound);
        }

        let villages = self.repo.by_kodepos(kodepos, None).await?;
        if villages.is_empty() {
            return Ok(Lookup::NotFound);
        }

        Ok(Lookup::Found(KodeposDetail {
            kodepos: kodepos.to_string(),
            villages,
        }))
    }

    /// Prefix search over village and district names
    pub async fn search(&self, term: &str) -> Result<SearchResults> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(SearchResults::default());
        }

        let villages = self.repo.search_villages(term, SEARCH_LIMIT).await?;
        let districts = self.repo.search_districts(term, SEARCH_LIMIT).await?;
        tracing::debug!(
            term,
            villages = villages.len(),
            districts = districts.len(),
            "Search completed"
        );

        Ok(SearchResults {
            term: term.to_string(),
            villages,
            districts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::slug::to_slug;
    use crate::shared::test_helpers::{record, sample_records, MemoryKodeposRepository};

    fn service() -> (Arc<MemoryKodeposRepository>, LocationService) {
        let repo = Arc::new(MemoryKodeposRepository::sample());
        (repo.clone(), LocationService::new(repo))
    }

    #[tokio::test]
    async fn test_province_lists_regencies() {
        let (_, service) = service();
        let lookup = service.province("aceh").await.unwrap();
        assert_eq!(
            lookup,
            Lookup::Found(ProvinceDetail {
                provinsi: "Aceh".into(),
                regencies: vec!["Kab. Aceh Besar".into(), "Kota Banda Aceh".into()],
            })
        );
    }

    #[tokio::test]
    async fn test_non_canonical_segment_redirects() {
        let (_, service) = service();
        assert_eq!(
            service.province("Aceh").await.unwrap(),
            Lookup::Redirect("/provinsi/aceh".into())
        );
        assert_eq!(
            service
                .regency("di-yogyakarta-diy", "Kota Yogyakarta")
                .await
                .unwrap(),
            Lookup::Redirect("/provinsi/di-yogyakarta-diy/kabupaten/kota-yogyakarta".into())
        );
    }

    #[tokio::test]
    async fn test_legacy_segment_redirects_to_canonical() {
        let (_, service) = service();

        let lookup = service
            .village("sumatera-utara", "kab-labuhanbatu", "bilah-hulu", "bangkabelitung")
            .await
            .unwrap();
        assert_eq!(
            lookup,
            Lookup::Redirect(
                "/provinsi/sumatera-utara/kabupaten/kab-labuhanbatu/kecamatan/bilah-hulu/kelurahan/bangka-belitung"
                    .into()
            )
        );

        // diacritic dropped instead of stripped
        let lookup = service
            .village("bali", "kab-badung", "kuta-selatan", "bnoa")
            .await
            .unwrap();
        assert_eq!(
            lookup,
            Lookup::Redirect(
                "/provinsi/bali/kabupaten/kab-badung/kecamatan/kuta-selatan/kelurahan/benoa".into()
            )
        );
    }

    #[tokio::test]
    async fn test_empty_segment_never_resolves() {
        let (_, service) = service();
        assert_eq!(service.province("").await.unwrap(), Lookup::NotFound);
        assert_eq!(service.province("---").await.unwrap(), Lookup::NotFound);
        assert_eq!(
            service.regency("aceh", "").await.unwrap(),
            Lookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_unknown_parent_is_not_found() {
        let (_, service) = service();
        assert_eq!(
            service
                .district("papua", "kab-aceh-besar", "darul-imarah")
                .await
                .unwrap(),
            Lookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_self_lookup_finds_every_record() {
        let (_, service) = service();

        // "Suka-Maju" collides with "Suka Maju", which sorts first
        for expected in sample_records()
            .into_iter()
            .filter(|r| r.kelurahan != "Suka-Maju")
        {
            let lookup = service
                .village(
                    &to_slug(&expected.provinsi),
                    &to_slug(&expected.kabupaten),
                    &to_slug(&expected.kecamatan),
                    &to_slug(&expected.kelurahan),
                )
                .await
                .unwrap();
            let Lookup::Found(detail) = lookup else {
                panic!("{} not found by its own slugs", expected.kelurahan);
            };
            assert_eq!(detail.record.kelurahan, expected.kelurahan);
            assert_eq!(detail.record.kecamatan, expected.kecamatan);
            assert_eq!(detail.record.provinsi, expected.provinsi);
        }
    }

    #[tokio::test]
    async fn test_collision_resolves_to_first_in_sort_order() {
        let (_, service) = service();
        let Lookup::Found(detail) = service
            .village("jawa-tengah", "kab-grobogan", "purwodadi", "suka-maju")
            .await
            .unwrap()
        else {
            panic!("expected a village");
        };
        assert_eq!(detail.record.kelurahan, "Suka Maju");
        assert_eq!(detail.record.kodepos, "58112");
    }

    #[tokio::test]
    async fn test_village_with_several_codes_uses_lowest() {
        let (_, service) = service();
        let Lookup::Found(detail) = service
            .village("jawa-tengah", "kab-grobogan", "purwodadi", "kuripan")
            .await
            .unwrap()
        else {
            panic!("expected a village");
        };
        assert_eq!(detail.record.kodepos, "58111");
        assert!(detail.siblings.iter().all(|v| v.kelurahan != "Kuripan"));
    }

    #[tokio::test]
    async fn test_village_siblings_and_shared_codes() {
        let (_, service) = service();
        let Lookup::Found(detail) = service
            .village("aceh", "kab-aceh-besar", "darul-imarah", "lamreung")
            .await
            .unwrap()
        else {
            panic!("expected a village");
        };

        let siblings: Vec<&str> = detail.siblings.iter().map(|v| v.kelurahan.as_str()).collect();
        assert_eq!(siblings, vec!["Garot", "Punie"]);
        assert_eq!(detail.shared.len(), 3);
        assert!(detail.shared.contains(&detail.record));
    }

    #[tokio::test]
    async fn test_regency_siblings() {
        let (_, service) = service();
        let Lookup::Found(detail) = service.regency("aceh", "kab-aceh-besar").await.unwrap() else {
            panic!("expected a regency");
        };
        assert_eq!(detail.districts, vec!["Darul Imarah", "Ingin Jaya"]);
        assert_eq!(detail.siblings, vec!["Kota Banda Aceh"]);
        assert_eq!(detail.sibling_total, 1);
    }

    #[tokio::test]
    async fn test_district_counts_unique_codes() {
        let (_, service) = service();
        let Lookup::Found(detail) = service
            .district("jawa-tengah", "kab-grobogan", "purwodadi")
            .await
            .unwrap()
        else {
            panic!("expected a district");
        };
        assert_eq!(detail.villages.len(), 5);
        assert_eq!(detail.unique_kodepos, 4);
        assert!(detail.siblings.is_empty());
        assert_eq!(detail.sibling_total, 0);
    }

    #[tokio::test]
    async fn test_sibling_display_is_capped() {
        let records: Vec<_> = (0..20)
            .map(|i| record("Papua", &format!("Kab. Contoh {i:02}"), "Distrik", "Kampung", "99999"))
            .collect();
        let service = LocationService::new(Arc::new(MemoryKodeposRepository::new(records)));

        let Lookup::Found(detail) = service.regency("papua", "kab-contoh-00").await.unwrap() else {
            panic!("expected a regency");
        };
        assert_eq!(detail.siblings.len(), SIBLING_DISPLAY_LIMIT);
        assert_eq!(detail.sibling_total, 19);
        assert_eq!(detail.siblings[0], "Kab. Contoh 01");
    }

    #[tokio::test]
    async fn test_kodepos_returns_every_village() {
        let (_, service) = service();
        let Lookup::Found(detail) = service.kodepos("23352").await.unwrap() else {
            panic!("expected villages");
        };
        assert_eq!(detail.villages.len(), 3);
        assert!(detail.villages.iter().all(|r| r.kodepos == "23352"));

        assert_eq!(service.kodepos("10000").await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_kodepos_skips_query() {
        let (repo, service) = service();
        for code in ["2335", "233520", "2335a", ""] {
            assert_eq!(service.kodepos(code).await.unwrap(), Lookup::NotFound);
        }
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_matches_prefixes() {
        let (_, service) = service();
        let results = service.search("  purwo ").await.unwrap();
        assert_eq!(results.term, "purwo");
        assert_eq!(results.villages.len(), 1);
        assert_eq!(results.villages[0].kelurahan, "Purwodadi");
        assert_eq!(results.districts.len(), 1);
        assert_eq!(results.districts[0].kecamatan, "Purwodadi");
    }

    #[tokio::test]
    async fn test_blank_search_issues_no_query() {
        let (repo, service) = service();
        let results = service.search("   ").await.unwrap();
        assert_eq!(results, SearchResults::default());
        assert_eq!(repo.calls(), 0);
    }
}
