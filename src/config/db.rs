use ::anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Shared handle to the SQLite pool.
///
/// Every statement obtains its executor through [`DB::conn`], which bumps a counter.
/// Tests use [`DB::query_count`] to assert how many round-trips an operation costs.
pub struct DB {
    pool: SqlitePool,
    queries: AtomicU64,
}

impl DB {
    // Create a single connection pool for SQLx that is shared across the entire application.
    pub async fn new(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(pool_size);

        // An in-memory database lives as long as its connection, never recycle it.
        if url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        Ok(DB {
            pool,
            queries: AtomicU64::new(0),
        })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Executor for exactly one statement.
    pub fn conn(&self) -> &SqlitePool {
        let n = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("query #{}", n);
        &self.pool
    }

    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}
