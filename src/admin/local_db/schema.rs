//! Cache Schema Definitions
//!
//! Contains the table definitions and migration bookkeeping.

/// Current cache schema version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Schema migration versions
pub const MIGRATION_VERSIONS: &[i64] = &[1];

pub const CREATE_MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)";

const CREATE_CACHE_SLOTS: &str = "CREATE TABLE IF NOT EXISTS cache_slots (
    slot TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// SQL applied by a migration
pub fn migration_sql(version: i64) -> Option<&'static str> {
    match version {
        1 => Some(CREATE_CACHE_SLOTS),
        _ => None,
    }
}

/// Get pending migrations
pub fn pending_migrations(current_version: i64) -> Vec<i64> {
    MIGRATION_VERSIONS
        .iter()
        .filter(|&&v| v > current_version)
        .cloned()
        .collect()
}
