//! # Local Cache Module
//!
//! Durable mirror of the last successfully fetched product list and message
//! list. The dashboard starts from it before the first network round-trip
//! completes and rewrites it after every successful refresh.
//!
//! ## Layout
//!
//! One SQLite table of named slots, each holding a JSON array:
//! - `peramore_items`: product and gallery rows
//! - `peramore_msgs`: contact messages
//!
//! No expiry and no versioning: the last save wins, whole collections at a
//! time.
//!
//! ## Key Components
//!
//! - `LocalCache`: connection pool and schema management
//! - `schema.rs`: table definitions and migration bookkeeping
//! - `slots.rs`: snapshot load/save

pub mod schema;
pub mod slots;

use crate::admin::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

/// Local cache connection manager
#[derive(Debug, Clone)]
pub struct LocalCache {
    pool: SqlitePool,
}

impl LocalCache {
    /// Open or create the cache database at `path`
    ///
    /// Creates parent directories and the file when missing. Uses WAL mode.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;

        let cache = Self { pool };
        cache.init_schema().await?;

        tracing::debug!("Local cache opened at {}", path.display());
        Ok(cache)
    }

    /// Private in-memory cache, gone when dropped
    pub async fn in_memory() -> Result<Self> {
        // Every connection to :memory: is its own database, so keep one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let cache = Self { pool };
        cache.init_schema().await?;
        Ok(cache)
    }

    /// Create tables and apply pending migrations
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(schema::CREATE_MIGRATIONS_TABLE)
            .execute(&self.pool)
            .await?;

        let current: (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await?;

        for version in schema::pending_migrations(current.0) {
            self.apply_migration(version).await?;
        }
        Ok(())
    }

    async fn apply_migration(&self, version: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        if let Some(sql) = schema::migration_sql(version) {
            sqlx::query(sql).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
            .bind(version)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!("Applied cache migration {}", version);
        Ok(())
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applied schema version
    pub async fn schema_version(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
