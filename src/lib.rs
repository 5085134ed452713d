//! Peramore Admin - Main Library
//!
//! Data layer of the Peramore admin dashboard. The shop keeps its product
//! catalog, gallery and contact messages in a spreadsheet behind a small
//! script endpoint; this library mirrors them locally, refreshes them in the
//! background and writes the administrator's edits back.
//!
//! # Module Structure
//!
//! - **`shared`** - Records and wire types
//!   - Catalog items, messages, stable record ids
//!   - Write requests and their acknowledgements
//!   - Application configuration and shared errors
//!
//! - **`admin`** - The dashboard data layer
//!   - HTTP remote store and SQLite local cache
//!   - Coalescing refresh engine and interval timer
//!   - Optimistic mutations with per-record rollback
//!   - Delete confirmation gate, tab filters and item editor
//!
//! # Usage
//!
//! ```rust,no_run
//! use peramore_admin::admin::{AdminSession, Config, HttpRemoteStore, LocalCache, Tab};
//! use std::sync::Arc;
//!
//! # async fn example() -> peramore_admin::admin::Result<()> {
//! let config = Config::load()?;
//! let remote = Arc::new(HttpRemoteStore::new(config.clone())?);
//! let cache = LocalCache::open(&config.cache_path()).await?;
//!
//! let mut session = AdminSession::start(config, remote, cache).await;
//! session.select_tab(Tab::Collection).await?;
//! for item in session.visible_items().await {
//!     println!("{} ({:?})", item.nom, item.prix);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Shared state lives behind `Arc<tokio::sync::RwLock<_>>`; the session owns
//! its background tasks and aborts them when dropped.
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for record and serialization problems
//! - `shared::config::ConfigError` for configuration problems
//! - `admin::error::AdminError` for everything at runtime

/// Records and wire types
pub mod shared;

/// Dashboard data layer
pub mod admin;
