//! # Reconciliation
//!
//! Folds a write acknowledgement back into the snapshot. A rejected or lost
//! write reverts its own edit; an accepted write that returns the stored
//! record replaces the optimistic copy with it.

use crate::admin::offline::optimistic::Undo;
use crate::shared::{CatalogItem, Message, Snapshot};
use serde_json::Value;

/// What reconciling an acknowledgement did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationResult {
    /// Optimistic state kept as is
    Kept,
    /// Touched record replaced by the stored one
    Replaced,
    /// Optimistic edit reverted
    RolledBack,
}

/// Revert exactly the records `undo` describes
///
/// Records that have since disappeared or been replaced by a refresh are
/// left alone.
pub fn rollback(snapshot: &mut Snapshot, undo: Undo) -> ReconciliationResult {
    match undo {
        Undo::RemoveProduct { id } => snapshot.products.retain(|p| p.id != id),
        Undo::RestoreProduct { previous } => {
            if let Some(existing) = snapshot.products.iter_mut().find(|p| p.id == previous.id) {
                *existing = previous;
            }
        }
        Undo::ReinsertProduct { index, previous } => {
            if !snapshot.products.iter().any(|p| p.id == previous.id) {
                let index = index.min(snapshot.products.len());
                snapshot.products.insert(index, previous);
            }
        }
        Undo::ReinsertMessage { index, previous } => {
            if !snapshot.messages.iter().any(|m| m.id == previous.id) {
                let index = index.min(snapshot.messages.len());
                snapshot.messages.insert(index, previous);
            }
        }
        Undo::RestoreStatus { id, previous } => {
            if let Some(message) = snapshot.messages.iter_mut().find(|m| m.id == id) {
                message.statut = previous;
            }
        }
        Undo::MarkUnread { ids } => {
            for message in snapshot.messages.iter_mut().filter(|m| ids.contains(&m.id)) {
                message.statut = crate::shared::MessageStatus::Nouveau;
            }
        }
        Undo::Nothing => return ReconciliationResult::Kept,
    }
    ReconciliationResult::RolledBack
}

/// Swap the optimistic record for the one the store returned
///
/// Only single-record edits that leave the record in place are replaced.
/// A record that cannot be decoded is logged and ignored.
pub fn apply_authoritative(snapshot: &mut Snapshot, undo: &Undo, record: Value) -> ReconciliationResult {
    match undo {
        Undo::RemoveProduct { id } => replace_product(snapshot, *id, record),
        Undo::RestoreProduct { previous } => replace_product(snapshot, previous.id, record),
        Undo::RestoreStatus { id, .. } => {
            let Some(stored) = decode::<Message>(record) else {
                return ReconciliationResult::Kept;
            };
            match snapshot.messages.iter_mut().find(|m| m.id == *id) {
                Some(message) => {
                    *message = stored;
                    ReconciliationResult::Replaced
                }
                None => ReconciliationResult::Kept,
            }
        }
        _ => ReconciliationResult::Kept,
    }
}

fn replace_product(snapshot: &mut Snapshot, id: crate::shared::RecordId, record: Value) -> ReconciliationResult {
    let Some(stored) = decode::<CatalogItem>(record) else {
        return ReconciliationResult::Kept;
    };
    match snapshot.products.iter_mut().find(|p| p.id == id) {
        Some(product) => {
            *product = stored;
            ReconciliationResult::Replaced
        }
        None => ReconciliationResult::Kept,
    }
}

fn decode<T: serde::de::DeserializeOwned>(record: Value) -> Option<T> {
    match serde_json::from_value(record) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!("Ignoring undecodable record in write acknowledgement: {}", e);
            None
        }
    }
}
