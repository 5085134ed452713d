//! # Optimistic Updates
//!
//! Local edits applied to the snapshot before the remote store has seen the
//! write. Each edit returns an [`Undo`] describing exactly what it touched,
//! so a refused write can be reverted without disturbing anything a refresh
//! or another write changed in the meantime.

use crate::shared::{CatalogItem, Message, MessageStatus, RecordId, Snapshot};

/// Inverse of one optimistic edit
#[derive(Debug, Clone, PartialEq)]
pub enum Undo {
    /// Remove the appended product
    RemoveProduct { id: RecordId },
    /// Put the product back as it was
    RestoreProduct { previous: CatalogItem },
    /// Re-insert a removed product near its old position
    ReinsertProduct { index: usize, previous: CatalogItem },
    /// Re-insert a removed message near its old position
    ReinsertMessage { index: usize, previous: Message },
    /// Put one message status back
    RestoreStatus { id: RecordId, previous: MessageStatus },
    /// Flip the listed messages back to unread
    MarkUnread { ids: Vec<RecordId> },
    /// The edit found nothing to change
    Nothing,
}

/// Append a new product
pub fn add_product(snapshot: &mut Snapshot, item: CatalogItem) -> Undo {
    let id = item.id;
    snapshot.products.push(item);
    Undo::RemoveProduct { id }
}

/// Overwrite the product sharing `item`'s id
pub fn replace_product(snapshot: &mut Snapshot, item: CatalogItem) -> Undo {
    match snapshot.products.iter_mut().find(|p| p.id == item.id) {
        Some(existing) => Undo::RestoreProduct {
            previous: std::mem::replace(existing, item),
        },
        None => Undo::Nothing,
    }
}

pub fn remove_product(snapshot: &mut Snapshot, id: RecordId) -> Undo {
    match snapshot.products.iter().position(|p| p.id == id) {
        Some(index) => Undo::ReinsertProduct {
            index,
            previous: snapshot.products.remove(index),
        },
        None => Undo::Nothing,
    }
}

pub fn remove_message(snapshot: &mut Snapshot, id: RecordId) -> Undo {
    match snapshot.messages.iter().position(|m| m.id == id) {
        Some(index) => Undo::ReinsertMessage {
            index,
            previous: snapshot.messages.remove(index),
        },
        None => Undo::Nothing,
    }
}

pub fn set_status(snapshot: &mut Snapshot, id: RecordId, statut: MessageStatus) -> Undo {
    match snapshot.messages.iter_mut().find(|m| m.id == id) {
        Some(message) => Undo::RestoreStatus {
            id,
            previous: std::mem::replace(&mut message.statut, statut),
        },
        None => Undo::Nothing,
    }
}

/// Flip every unread message to read
pub fn mark_all_read(snapshot: &mut Snapshot) -> Undo {
    let ids: Vec<RecordId> = snapshot
        .messages
        .iter_mut()
        .filter(|m| m.is_unread())
        .map(|m| {
            m.statut = MessageStatus::Lu;
            m.id
        })
        .collect();

    if ids.is_empty() {
        Undo::Nothing
    } else {
        Undo::MarkUnread { ids }
    }
}

impl Undo {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Undo::Nothing)
    }
}
