//! Shared Module
//!
//! Records exchanged with the spreadsheet script, the write actions that
//! modify them, and the configuration and error types used across the crate.
//! Nothing in here performs I/O.

/// Record ids and lenient field decoding
pub mod record;

/// Products and gallery media
pub mod catalog;

/// Contact form messages
pub mod message;

/// Write actions and their acknowledgements
pub mod mutation;

/// Paired collections
pub mod snapshot;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use catalog::{CatalogItem, ItemType};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use message::{ContactPreference, Message, MessageStatus};
pub use mutation::{Mutation, MutationAck, StatusUpdate};
pub use record::RecordId;
pub use snapshot::Snapshot;
