use crate::core::config::{DatabaseConfig, RetryConfig};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::future::Future;
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Run a read against the store, retrying transient failures.
///
/// Non-transient errors (bad SQL, decode failures) are returned immediately.
/// After `retry.attempts` transient failures the last error is returned.
pub async fn with_retry<T, F, Fut>(
    retry: &RetryConfig,
    operation: &str,
    mut run: F,
) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 1;
    loop {
        match run().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < retry.attempts && is_transient(&e) => {
                let delay = retry.delay_after(attempt);
                tracing::warn!(
                    "Query '{}' failed (attempt {}/{}), retrying in {:?}: {}",
                    operation,
                    attempt,
                    retry.attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    "Query '{}' failed after {} attempt(s): {:?}",
                    operation,
                    attempt,
                    e
                );
                return Err(e);
            }
        }
    }
}

/// Whether an error is worth another attempt
pub fn is_transient(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db.code().is_some_and(|code| is_transient_sqlstate(&code)),
        _ => false,
    }
}

// Connection exceptions (08), operator intervention (57P0x), serialization
// failure, deadlock and too_many_connections.
fn is_transient_sqlstate(code: &str) -> bool {
    code.starts_with("08")
        || code.starts_with("57P0")
        || matches!(code, "40001" | "40P01" | "53300")
}
