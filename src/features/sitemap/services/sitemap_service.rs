use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::error::{AppError, Result};
use crate::features::kodepos::paths::{HOME_PATH, PROVINCE_INDEX_PATH};
use crate::features::kodepos::{paths, KodeposRepository};
use crate::shared::constants::SITEMAP_PAGE_SIZE;
use crate::shared::templates::TemplateRenderer;
use crate::shared::types::SiteInfo;
use crate::shared::validation::SLUG_REGEX;

#[derive(Debug, Serialize)]
struct UrlEntry {
    loc: String,
    lastmod: String,
    changefreq: &'static str,
    priority: &'static str,
}

#[derive(Debug, Serialize)]
struct SitemapEntry {
    loc: String,
    lastmod: String,
}

/// Number of village sitemap documents, never less than one
fn page_count(villages: i64, page_size: i64) -> i64 {
    if villages <= 0 {
        return 1;
    }
    (villages + page_size - 1) / page_size
}

/// Builds the sitemap index, its chunks and `robots.txt`
pub struct SitemapService {
    repo: Arc<dyn KodeposRepository>,
    renderer: Arc<TemplateRenderer>,
    site: Arc<SiteInfo>,
    lastmod: NaiveDate,
    page_size: i64,
}

impl SitemapService {
    pub fn new(
        repo: Arc<dyn KodeposRepository>,
        renderer: Arc<TemplateRenderer>,
        site: Arc<SiteInfo>,
        lastmod: NaiveDate,
    ) -> Self {
        Self {
            repo,
            renderer,
            site,
            lastmod,
            page_size: SITEMAP_PAGE_SIZE,
        }
    }

    #[cfg(test)]
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn chunk_url(&self, page: i64) -> String {
        self.site.absolute(&format!("/sitemap/{}.xml", page))
    }

    fn entry(&self, path: &str, changefreq: &'static str, priority: &'static str) -> UrlEntry {
        UrlEntry {
            loc: self.site.absolute(path),
            lastmod: self.lastmod.to_string(),
            changefreq,
            priority,
        }
    }

    /// Number of chunk documents listed by the index
    pub async fn pages(&self) -> Result<i64> {
        let villages = self.repo.count_villages().await?;
        Ok(page_count(villages, self.page_size))
    }

    /// `sitemapindex` document listing every chunk
    pub async fn index(&self) -> Result<String> {
        let pages = self.pages().await?;
        let sitemaps: Vec<SitemapEntry> = (0..pages)
            .map(|page| SitemapEntry {
                loc: self.chunk_url(page),
                lastmod: self.lastmod.to_string(),
            })
            .collect();

        tracing::debug!(pages, "Rendering sitemap index");
        Ok(self.renderer.render(
            "sitemap/index.xml",
            minijinja::context! { sitemaps => sitemaps },
        )?)
    }

    /// `urlset` document for one chunk; `None` past the last chunk.
    ///
    /// Chunk 0 also carries the home page and every province, regency and
    /// district URL ahead of its villages.
    pub async fn chunk(&self, page: i64) -> Result<Option<String>> {
        if page < 0 {
            return Ok(None);
        }
        let Some(offset) = page.checked_mul(self.page_size) else {
            return Ok(None);
        };

        let villages = self.repo.village_page(self.page_size, offset).await?;
        if page > 0 && villages.is_empty() {
            return Ok(None);
        }

        let mut urls = Vec::with_capacity(villages.len());
        if page == 0 {
            urls.push(self.entry(HOME_PATH, "daily", "1.0"));
            urls.push(self.entry(PROVINCE_INDEX_PATH, "weekly", "0.7"));

            let provinces = self.repo.provinces().await?;
            urls.extend(
                provinces
                    .iter()
                    .map(|provinsi| paths::province_path(provinsi))
                    .filter(|path| routable(path))
                    .map(|path| self.entry(&path, "weekly", "0.5")),
            );
            let regencies = self.repo.all_regencies().await?;
            urls.extend(
                regencies
                    .iter()
                    .map(|regency| regency.path())
                    .filter(|path| routable(path))
                    .map(|path| self.entry(&path, "weekly", "0.6")),
            );
            let districts = self.repo.all_districts().await?;
            urls.extend(
                districts
                    .iter()
                    .map(|district| district.path())
                    .filter(|path| routable(path))
                    .map(|path| self.entry(&path, "monthly", "0.8")),
            );
        }
        urls.extend(
            villages
                .iter()
                .map(|village| village.path())
                .filter(|path| routable(path))
                .map(|path| self.entry(&path, "monthly", "0.9")),
        );
        // Names sharing a slug sort next to each other and yield the same URL
        urls.dedup_by(|a, b| a.loc == b.loc);

        tracing::debug!(page, urls = urls.len(), "Rendering sitemap chunk");
        let xml = self
            .renderer
            .render("sitemap/urlset.xml", minijinja::context! { urls => urls })?;
        Ok(Some(xml))
    }

    pub fn robots(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\n\nSitemap: {}\n",
            self.site.absolute("/sitemap.xml")
        )
    }

    /// Write `sitemap.xml` and `sitemap/{i}.xml` under `dir`, returning the
    /// number of chunks written
    pub async fn write_all(&self, dir: &Path) -> Result<i64> {
        let chunk_dir = dir.join("sitemap");
        tokio::fs::create_dir_all(&chunk_dir)
            .await
            .map_err(|e| AppError::Internal(format!("{}: {}", chunk_dir.display(), e)))?;

        let pages = self.pages().await?;
        for page in 0..pages {
            let Some(xml) = self.chunk(page).await? else {
                break;
            };
            let file = chunk_dir.join(format!("{}.xml", page));
            write_file(&file, &xml).await?;
            tracing::info!("Wrote {}", file.display());
        }

        let index_file = dir.join("sitemap.xml");
        write_file(&index_file, &self.index().await?).await?;
        tracing::info!("Wrote {} ({} chunks)", index_file.display(), pages);

        Ok(pages)
    }
}

/// Whether every segment of a hierarchy path is a non-empty slug. Names made
/// only of punctuation produce an empty segment that no route can resolve.
fn routable(path: &str) -> bool {
    path.split('/').skip(1).all(|segment| SLUG_REGEX.is_match(segment))
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{record, MemoryKodeposRepository};

    fn service() -> SitemapService {
        SitemapService::new(
            Arc::new(MemoryKodeposRepository::sample()),
            Arc::new(TemplateRenderer::new().unwrap()),
            Arc::new(SiteInfo::new("https://kodepos.online")),
            NaiveDate::from_ymd_opt(2025, 11, 26).unwrap(),
        )
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10_000), 1);
        assert_eq!(page_count(1, 10_000), 1);
        assert_eq!(page_count(10_000, 10_000), 1);
        assert_eq!(page_count(10_001, 10_000), 2);
        assert_eq!(page_count(83_000, 10_000), 9);
    }

    #[tokio::test]
    async fn test_index_lists_every_chunk() {
        let xml = service().with_page_size(4).index().await.unwrap();
        // 15 distinct villages
        assert_eq!(xml.matches("<sitemap>").count(), 4);
        assert!(xml.contains("<loc>https://kodepos.online/sitemap/0.xml</loc>"));
        assert!(xml.contains("<loc>https://kodepos.online/sitemap/3.xml</loc>"));
        assert!(xml.contains("<lastmod>2025-11-26</lastmod>"));
    }

    #[tokio::test]
    async fn test_first_chunk_carries_hierarchy() {
        let xml = service().chunk(0).await.unwrap().unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://kodepos.online</loc>"));
        assert!(xml.contains("<loc>https://kodepos.online/provinsi</loc>"));
        assert!(xml.contains("<loc>https://kodepos.online/provinsi/di-yogyakarta-diy</loc>"));
        assert!(xml.contains(
            "<loc>https://kodepos.online/provinsi/bali/kabupaten/kab-badung/kecamatan/kuta-selatan/kelurahan/benoa</loc>"
        ));
        // 2 static + 5 provinces + 6 regencies + 7 districts + 14 village URLs
        assert_eq!(xml.matches("<url>").count(), 34);
        assert_eq!(xml.matches("<priority>0.9</priority>").count(), 14);
    }

    #[tokio::test]
    async fn test_later_chunks_hold_only_villages() {
        let service = service().with_page_size(10);
        let xml = service.chunk(1).await.unwrap().unwrap();
        // "Suka Maju" and "Suka-Maju" share one URL
        assert_eq!(xml.matches("<url>").count(), 4);
        assert!(!xml.contains("<loc>https://kodepos.online</loc>"));

        assert!(service.chunk(2).await.unwrap().is_none());
        assert!(service.chunk(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_table_still_has_first_chunk() {
        let service = SitemapService::new(
            Arc::new(MemoryKodeposRepository::new(Vec::new())),
            Arc::new(TemplateRenderer::new().unwrap()),
            Arc::new(SiteInfo::new("https://kodepos.online")),
            NaiveDate::from_ymd_opt(2025, 11, 26).unwrap(),
        );
        assert_eq!(service.pages().await.unwrap(), 1);
        let xml = service.chunk(0).await.unwrap().unwrap();
        assert_eq!(xml.matches("<url>").count(), 2);
    }

    #[tokio::test]
    async fn test_colliding_slugs_listed_once() {
        let xml = service().chunk(0).await.unwrap().unwrap();
        let loc = "<loc>https://kodepos.online/provinsi/jawa-tengah/kabupaten/kab-grobogan/kecamatan/purwodadi/kelurahan/suka-maju</loc>";
        assert_eq!(xml.matches(loc).count(), 1);
    }

    #[tokio::test]
    async fn test_overflowing_page_is_past_end() {
        let service = service();
        assert!(service.chunk(i64::MAX).await.unwrap().is_none());
        assert!(service
            .with_page_size(10)
            .chunk(i64::MAX / 5)
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_routable() {
        assert!(routable("/provinsi/aceh/kabupaten/kab-aceh-besar"));
        assert!(!routable("/provinsi/aceh/kabupaten/"));
        assert!(!routable("/provinsi//kabupaten/kab-aceh-besar"));
    }

    #[tokio::test]
    async fn test_unroutable_names_are_skipped() {
        let service = SitemapService::new(
            Arc::new(MemoryKodeposRepository::new(vec![
                record("Aceh", "Kab. Pidie", "Delima", "Garot", "24162"),
                record("Aceh", "Kab. Pidie", "Delima", "(-)", "24163"),
            ])),
            Arc::new(TemplateRenderer::new().unwrap()),
            Arc::new(SiteInfo::new("https://kodepos.online")),
            NaiveDate::from_ymd_opt(2025, 11, 26).unwrap(),
        );
        let xml = service.chunk(0).await.unwrap().unwrap();

        // 2 static + province + regency + district + one routable village
        assert_eq!(xml.matches("<url>").count(), 6);
        assert!(!xml.contains("/kelurahan/</loc>"));
    }

    #[test]
    fn test_robots_points_at_index() {
        assert_eq!(
            service().robots(),
            "User-agent: *\nAllow: /\n\nSitemap: https://kodepos.online/sitemap.xml\n"
        );
    }

    #[tokio::test]
    async fn test_write_all() {
        let dir = std::env::temp_dir().join(format!("kodepos-sitemap-{}", uuid::Uuid::now_v7()));
        let pages = service().with_page_size(10).write_all(&dir).await.unwrap();

        assert_eq!(pages, 2);
        assert!(dir.join("sitemap.xml").exists());
        assert!(dir.join("sitemap/0.xml").exists());
        assert!(dir.join("sitemap/1.xml").exists());
        assert!(!dir.join("sitemap/2.xml").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
