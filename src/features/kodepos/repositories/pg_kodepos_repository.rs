use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::config::RetryConfig;
use crate::core::database::with_retry;
use crate::core::error::Result;
use crate::features::kodepos::models::{
    DistrictRef, KodeposRecord, RegencyRef, VillageEntry, VillageRef,
};
use crate::features::kodepos::repositories::KodeposRepository;

/// `KodeposRepository` over the Postgres `tbl_kodepos` table
pub struct PgKodeposRepository {
    pool: PgPool,
    retry: RetryConfig,
}

impl PgKodeposRepository {
    pub fn new(pool: PgPool, retry: RetryConfig) -> Self {
        Self { pool, retry }
    }
}

/// Escape LIKE wildcards so user input is matched literally (`ESCAPE '\'`)
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl KodeposRepository for PgKodeposRepository {
    async fn provinces(&self) -> Result<Vec<String>> {
        let rows = with_retry(&self.retry, "provinces", || {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT DISTINCT provinsi
                FROM tbl_kodepos
                ORDER BY provinsi
                "#,
            )
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn regencies(&self, provinsi: &str) -> Result<Vec<String>> {
        let rows = with_retry(&self.retry, "regencies", || {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT DISTINCT kabupaten
                FROM tbl_kodepos
                WHERE provinsi = $1
                ORDER BY kabupaten
                "#,
            )
            .bind(provinsi)
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn districts(&self, provinsi: &str, kabupaten: &str) -> Result<Vec<String>> {
        let rows = with_retry(&self.retry, "districts", || {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT DISTINCT kecamatan
                FROM tbl_kodepos
                WHERE provinsi = $1 AND kabupaten = $2
                ORDER BY kecamatan
                "#,
            )
            .bind(provinsi)
            .bind(kabupaten)
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn villages(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
    ) -> Result<Vec<VillageEntry>> {
        let rows = with_retry(&self.retry, "villages", || {
            sqlx::query_as::<_, VillageEntry>(
                r#"
                SELECT DISTINCT kelurahan, kodepos
                FROM tbl_kodepos
                WHERE provinsi = $1 AND kabupaten = $2 AND kecamatan = $3
                ORDER BY kelurahan, kodepos
                "#,
            )
            .bind(provinsi)
            .bind(kabupaten)
            .bind(kecamatan)
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn record(
        &self,
        provinsi: &str,
        kabupaten: &str,
        kecamatan: &str,
        kelurahan: &str,
    ) -> Result<Option<KodeposRecord>> {
        let row = with_retry(&self.retry, "record", || {
            sqlx::query_as::<_, KodeposRecord>(
                r#"
                SELECT provinsi, kabupaten, kecamatan, kelurahan, kodepos
                FROM tbl_kodepos
                WHERE provinsi = $1 AND kabupaten = $2 AND kecamatan = $3 AND kelurahan = $4
                ORDER BY kodepos
                LIMIT 1
                "#,
            )
            .bind(provinsi)
            .bind(kabupaten)
            .bind(kecamatan)
            .bind(kelurahan)
            .fetch_optional(&self.pool)
        })
        .await?;

        Ok(row)
    }

    async fn by_kodepos(&self, kodepos: &str, limit: Option<i64>) -> Result<Vec<KodeposRecord>> {
        // LIMIT NULL is no limit in Postgres
        let rows = with_retry(&self.retry, "by_kodepos", || {
            sqlx::query_as::<_, KodeposRecord>(
                r#"
                SELECT provinsi, kabupaten, kecamatan, kelurahan, kodepos
                FROM tbl_kodepos
                WHERE kodepos = $1
                ORDER BY provinsi, kabupaten, kecamatan, kelurahan
                LIMIT $2
                "#,
            )
            .bind(kodepos)
            .bind(limit)
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn search_villages(&self, prefix: &str, limit: i64) -> Result<Vec<KodeposRecord>> {
        let pattern = escape_like(prefix);
        let rows = with_retry(&self.retry, "search_villages", || {
            sqlx::query_as::<_, KodeposRecord>(
                r#"
                SELECT provinsi, kabupaten, kecamatan, kelurahan, kodepos
                FROM tbl_kodepos
                WHERE lower(kelurahan) LIKE lower($1) || '%' ESCAPE '\'
                ORDER BY provinsi, kabupaten, kecamatan, kelurahan
                LIMIT $2
                "#,
            )
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn search_districts(&self, prefix: &str, limit: i64) -> Result<Vec<DistrictRef>> {
        let pattern = escape_like(prefix);
        let rows = with_retry(&self.retry, "search_districts", || {
            sqlx::query_as::<_, DistrictRef>(
                r#"
                SELECT DISTINCT provinsi, kabupaten, kecamatan
                FROM tbl_kodepos
                WHERE lower(kecamatan) LIKE lower($1) || '%' ESCAPE '\'
                ORDER BY provinsi, kabupaten, kecamatan
                LIMIT $2
                "#,
            )
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn count_villages(&self) -> Result<i64> {
        let count = with_retry(&self.retry, "count_villages", || {
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM (
                    SELECT DISTINCT provinsi, kabupaten, kecamatan, kelurahan
                    FROM tbl_kodepos
                ) AS villages
                "#,
            )
            .fetch_one(&self.pool)
        })
        .await?;

        Ok(count)
    }

    async fn village_page(&self, limit: i64, offset: i64) -> Result<Vec<VillageRef>> {
        let rows = with_retry(&self.retry, "village_page", || {
            sqlx::query_as::<_, VillageRef>(
                r#"
                SELECT DISTINCT provinsi, kabupaten, kecamatan, kelurahan
                FROM tbl_kodepos
                ORDER BY provinsi, kabupaten, kecamatan, kelurahan
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn all_regencies(&self) -> Result<Vec<RegencyRef>> {
        let rows = with_retry(&self.retry, "all_regencies", || {
            sqlx::query_as::<_, RegencyRef>(
                r#"
                SELECT DISTINCT provinsi, kabupaten
                FROM tbl_kodepos
                ORDER BY provinsi, kabupaten
                "#,
            )
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }

    async fn all_districts(&self) -> Result<Vec<DistrictRef>> {
        let rows = with_retry(&self.retry, "all_districts", || {
            sqlx::query_as::<_, DistrictRef>(
                r#"
                SELECT DISTINCT provinsi, kabupaten, kecamatan
                FROM tbl_kodepos
                ORDER BY provinsi, kabupaten, kecamatan
                "#,
            )
            .fetch_all(&self.pool)
        })
        .await?;

        Ok(rows)
    }
}
