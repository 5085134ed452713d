//! Peramore Admin Module
//!
//! The data layer behind the admin dashboard: it keeps a local copy of the
//! product catalog and the contact inbox in sync with the spreadsheet script,
//! and applies the administrator's edits optimistically.
//!
//! # Architecture
//!
//! - **`config`** - Configuration loading (script URL, timers, cache path)
//! - **`error`** - Error type shared by the whole module
//! - **`remote`** - Remote store contract, HTTP client and in-memory fake
//! - **`local_db`** - SQLite mirror of the last fetched snapshot
//! - **`sync`** - Refresh engine, sync status and the interval timer
//! - **`offline`** - Optimistic mutations with rollback and reconciliation
//! - **`delete_gate`** - Countdown gate in front of every delete
//! - **`views`** - Tab filters, category suggestions and the item editor
//! - **`session`** - One dashboard session owning all of the above
//! - **`main`** - Headless binary (`peramore-admin`)
//!
//! # Module Structure
//!
//! ```text
//! admin/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── config.rs       - Configuration management
//! ├── error.rs        - AdminError
//! ├── remote/         - RemoteStore, HttpRemoteStore, FakeRemoteStore
//! ├── local_db/       - LocalCache
//! ├── sync/           - SyncEngine, SyncScheduler, SyncStatus
//! ├── offline/        - MutationLayer
//! ├── delete_gate.rs  - DeleteGate
//! ├── views.rs        - Tab, ItemEditor
//! └── session.rs      - AdminSession
//! ```

pub mod config;
pub mod delete_gate;
pub mod error;
pub mod local_db;
pub mod offline;
pub mod remote;
pub mod session;
pub mod sync;
pub mod views;

// Re-export commonly used types
pub use config::Config;
pub use delete_gate::{DeleteGate, DeleteTarget, GateState};
pub use error::{AdminError, Result};
pub use local_db::LocalCache;
pub use offline::MutationLayer;
pub use remote::{CollectionKind, FakeRemoteStore, HttpRemoteStore, RemoteStore};
pub use session::AdminSession;
pub use sync::{RefreshOutcome, SyncEngine, SyncScheduler, SyncStatus};
pub use views::{ItemDraft, ItemEditor, Tab};
