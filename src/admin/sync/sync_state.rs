//! # Sync State
//!
//! What the shell needs to show about freshness: whether a refresh is
//! running, when the last one succeeded and why the last one failed.

use chrono::{DateTime, Utc};

/// Current synchronization state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStatus {
    /// Whether a refresh is currently running
    pub is_syncing: bool,
    /// Completion time of the last successful refresh
    pub last_sync: Option<DateTime<Utc>>,
    /// Error of the last refresh, cleared by the next success
    pub last_error: Option<String>,
    pub refresh_count: u64,
    pub failed_count: u64,
}

impl SyncStatus {
    pub fn is_stale(&self) -> bool {
        self.last_sync.is_none() || self.last_error.is_some()
    }
}

/// Result of a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This call fetched and applied a new snapshot
    Applied {
        products: usize,
        messages: usize,
        unread: usize,
    },
    /// A refresh that started after this request already completed
    Coalesced,
}
