//! # Sync Engine
//!
//! Keeps the in-memory snapshot of both remote collections fresh.
//!
//! ## Refresh
//!
//! A refresh fetches products and messages concurrently. Only when both
//! fetches succeed are the in-memory lists and the local cache replaced,
//! together. A failure of either leaves everything as it was; the error is
//! logged and recorded in [`SyncStatus`].
//!
//! ## Overlapping requests
//!
//! Startup, the interval timer and every mutation ask for refreshes, and
//! they can arrive while one is already running. Refreshes are serialised:
//! a request that finds one in flight waits for it, and skips its own
//! round-trip if a refresh that *started after* the request has completed
//! successfully in the meantime. Since two fetch cycles never overlap, an
//! older response can never overwrite a newer one.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use peramore_admin::admin::sync::SyncEngine;
//! use peramore_admin::admin::local_db::LocalCache;
//! use peramore_admin::admin::remote::FakeRemoteStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> peramore_admin::admin::Result<()> {
//! let cache = LocalCache::in_memory().await?;
//! let engine = SyncEngine::new(Arc::new(FakeRemoteStore::new()), cache);
//! engine.refresh().await?;
//! println!("{} unread", engine.unread_count().await);
//! # Ok(())
//! # }
//! ```

pub mod scheduler;
pub mod sync_state;

pub use scheduler::SyncScheduler;
pub use sync_state::{RefreshOutcome, SyncStatus};

use crate::admin::error::Result;
use crate::admin::local_db::LocalCache;
use crate::admin::remote::RemoteStore;
use crate::shared::{CatalogItem, Message, Snapshot};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Owner of the in-memory snapshot
pub struct SyncEngine {
    remote: Arc<dyn RemoteStore>,
    cache: LocalCache,
    snapshot: RwLock<Snapshot>,
    status: RwLock<SyncStatus>,
    /// Set while a fetch cycle runs, reported through [`SyncStatus`]
    syncing: AtomicBool,
    /// Held for the whole fetch cycle
    refresh_lock: Mutex<()>,
    /// Tickets handed to refresh requests
    requested: AtomicU64,
    /// Highest ticket satisfied by a successful refresh
    covered: AtomicU64,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("requested", &self.requested.load(Ordering::SeqCst))
            .field("covered", &self.covered.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    pub fn new(remote: Arc<dyn RemoteStore>, cache: LocalCache) -> Self {
        Self {
            remote,
            cache,
            snapshot: RwLock::new(Snapshot::default()),
            status: RwLock::new(SyncStatus::default()),
            syncing: AtomicBool::new(false),
            refresh_lock: Mutex::new(()),
            requested: AtomicU64::new(0),
            covered: AtomicU64::new(0),
        }
    }

    /// Start from the cached snapshot, if there is one
    ///
    /// Returns whether anything was loaded. A cache that cannot be read is
    /// logged and treated as empty.
    pub async fn seed_from_cache(&self) -> bool {
        match self.cache.load().await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    "Seeded from cache: {} products, {} messages",
                    snapshot.products.len(),
                    snapshot.messages.len()
                );
                *self.snapshot.write().await = snapshot;
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Cannot read local cache, starting empty: {}", e);
                false
            }
        }
    }

    pub async fn seed(&self, snapshot: Snapshot) {
        *self.snapshot.write().await = snapshot;
    }

    /// Fetch both collections and replace local state on joint success
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let ticket = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = self.refresh_lock.lock().await;

        if self.covered.load(Ordering::SeqCst) >= ticket {
            tracing::debug!("Refresh request {} coalesced", ticket);
            return Ok(RefreshOutcome::Coalesced);
        }
        let covers = self.requested.load(Ordering::SeqCst);

        let _syncing = SyncingFlag::raise(&self.syncing);

        let fetched = futures_util::future::try_join(
            self.remote.fetch_products(),
            self.remote.fetch_messages(),
        )
        .await;

        let (products, messages) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!("Refresh failed, keeping last known state: {}", e);
                let mut status = self.status.write().await;
                status.last_error = Some(e.to_string());
                status.failed_count += 1;
                return Err(e);
            }
        };

        let snapshot = Snapshot::new(products, messages);
        let outcome = RefreshOutcome::Applied {
            products: snapshot.products.len(),
            messages: snapshot.messages.len(),
            unread: snapshot.unread(),
        };

        *self.snapshot.write().await = snapshot.clone();
        if let Err(e) = self.cache.save(&snapshot).await {
            tracing::warn!("Refreshed snapshot not cached: {}", e);
        }

        {
            let mut status = self.status.write().await;
            status.last_sync = Some(chrono::Utc::now());
            status.last_error = None;
            status.refresh_count += 1;
        }
        self.covered.store(covers, Ordering::SeqCst);

        tracing::info!(
            "Refreshed: {} products, {} messages, {} unread",
            snapshot.products.len(),
            snapshot.messages.len(),
            snapshot.unread()
        );
        Ok(outcome)
    }

    /// Run `f` against the live snapshot under the write lock
    pub async fn update<R>(&self, f: impl FnOnce(&mut Snapshot) -> R) -> R {
        let mut snapshot = self.snapshot.write().await;
        f(&mut snapshot)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn products(&self) -> Vec<CatalogItem> {
        self.snapshot.read().await.products.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.snapshot.read().await.messages.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.snapshot.read().await.unread()
    }

    pub async fn status(&self) -> SyncStatus {
        let mut status = self.status.read().await.clone();
        status.is_syncing = self.syncing.load(Ordering::SeqCst);
        status
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }
}

/// Raised for one fetch cycle, lowered on drop even if the refresh is cancelled
struct SyncingFlag<'a>(&'a AtomicBool);

impl<'a> SyncingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SyncingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
