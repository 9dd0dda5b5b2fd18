use std::env;
use std::time::Duration;

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub sitemap: SitemapConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Public origin used for canonical URLs, JSON-LD and sitemaps (no trailing slash)
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub retry: RetryConfig,
}

/// Bounded retry policy for reads against the store.
///
/// Attempt `n` (1-based) that fails with a transient error waits
/// `base_delay * n` before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub attempts: u32,
    pub base_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct SitemapConfig {
    /// Fixed `lastmod` written into every sitemap entry
    pub lastmod: NaiveDate,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            sitemap: SitemapConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_BASE_URL: &'static str = "https://kodepos.online";

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let base_url = normalize_base_url(
            &env::var("BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
        )?;

        Ok(Self {
            host,
            port,
            base_url,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 20;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            retry: RetryConfig::from_env()?,
        })
    }
}

impl RetryConfig {
    const DEFAULT_ATTEMPTS: u32 = 3;
    const DEFAULT_DELAY_MS: u64 = 500;

    pub fn from_env() -> Result<Self, String> {
        let attempts = env::var("DB_QUERY_ATTEMPTS")
            .unwrap_or_else(|_| Self::DEFAULT_ATTEMPTS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_QUERY_ATTEMPTS must be a valid number".to_string())?;
        if attempts == 0 {
            return Err("DB_QUERY_ATTEMPTS must be at least 1".to_string());
        }

        let delay_ms = env::var("DB_RETRY_DELAY_MS")
            .unwrap_or_else(|_| Self::DEFAULT_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_RETRY_DELAY_MS must be a valid number".to_string())?;

        Ok(Self {
            attempts,
            base_delay: Duration::from_millis(delay_ms),
        })
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: Self::DEFAULT_ATTEMPTS,
            base_delay: Duration::from_millis(Self::DEFAULT_DELAY_MS),
        }
    }
}

impl SitemapConfig {
    const DEFAULT_LASTMOD: &'static str = "2025-11-26";

    pub fn from_env() -> Result<Self, String> {
        let raw = env::var("SITEMAP_LASTMOD").unwrap_or_else(|_| Self::DEFAULT_LASTMOD.to_string());
        let lastmod = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| "SITEMAP_LASTMOD must be a date in YYYY-MM-DD format".to_string())?;

        Ok(Self { lastmod })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err("BASE_URL must start with http:// or https://".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_trims_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://kodepos.online/").unwrap(),
            "https://kodepos.online"
        );
        assert_eq!(
            normalize_base_url("  http://localhost:3002//  ").unwrap(),
            "http://localhost:3002"
        );
    }

    #[test]
    fn test_normalize_base_url_requires_scheme() {
        assert!(normalize_base_url("kodepos.online").is_err());
        assert!(normalize_base_url("").is_err());
    }

    #[test]
    fn test_retry_delay_grows_linearly() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_after(1), Duration::from_millis(500));
        assert_eq!(retry.delay_after(2), Duration::from_millis(1000));
    }
}
