//! # Optimistic Mutation Layer
//!
//! Every edit made from the dashboard goes through here:
//!
//! 1. the change is applied to the in-memory snapshot, so it is visible
//!    before the network is touched;
//! 2. the write is sent to the remote store and its acknowledgement read;
//! 3. the acknowledgement is reconciled: a stored record replaces the
//!    optimistic copy, a refusal or a transport error reverts exactly the
//!    records the edit touched;
//! 4. a refresh is requested, whatever the outcome. Its failure is only
//!    logged.
//!
//! Writes are not serialised against each other; each one only ever reverts
//! its own edit.
//!
//! ## Key Components
//!
//! - `optimistic.rs`: the local edits and their inverses
//! - `reconciliation.rs`: folding acknowledgements back into the snapshot

pub mod optimistic;
pub mod reconciliation;

pub use optimistic::Undo;
pub use reconciliation::ReconciliationResult;

use crate::admin::delete_gate::DeleteTarget;
use crate::admin::error::{AdminError, Result};
use crate::admin::sync::SyncEngine;
use crate::shared::{CatalogItem, Message, MessageStatus, Mutation, MutationAck, RecordId, StatusUpdate};
use std::sync::Arc;

/// Applies edits locally, then writes them through
#[derive(Debug, Clone)]
pub struct MutationLayer {
    engine: Arc<SyncEngine>,
}

impl MutationLayer {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    /// Create `item`, or overwrite `editing_target` with it
    ///
    /// An edit keeps the target's id and tells the store the target's old
    /// name, so renames reach the right row. Returns the record as it stands
    /// locally after reconciliation and the follow-up refresh, or `None` when
    /// the refreshed catalog no longer holds it.
    pub async fn submit_item(
        &self,
        mut item: CatalogItem,
        editing_target: Option<&CatalogItem>,
    ) -> Result<Option<CatalogItem>> {
        item.validate()?;

        let (undo, mutation) = match editing_target {
            Some(target) => {
                item.id = target.id;
                let undo = self
                    .engine
                    .update(|s| optimistic::replace_product(s, item.clone()))
                    .await;
                let mutation = Mutation::UpdateProduct {
                    item: item.clone(),
                    old_nom: target.nom.clone(),
                };
                (undo, mutation)
            }
            None => {
                item.id = RecordId::new();
                let undo = self
                    .engine
                    .update(|s| optimistic::add_product(s, item.clone()))
                    .await;
                (undo, Mutation::AddItem { item: item.clone() })
            }
        };

        self.write_through(mutation, undo).await?;

        let products = self.engine.products().await;
        Ok(locate(&products, &item).cloned())
    }

    /// Remove a product or a message
    ///
    /// Only the session calls this, once its delete gate has been confirmed.
    pub(crate) async fn delete_item(&self, target: DeleteTarget) -> Result<()> {
        match target {
            DeleteTarget::Item(item) => {
                let undo = self
                    .engine
                    .update(|s| optimistic::remove_product(s, item.id))
                    .await;
                let mutation = Mutation::DeleteProduct {
                    id: item.id,
                    nom: item.nom,
                };
                self.write_through(mutation, undo).await
            }
            DeleteTarget::Message(message) => {
                let undo = self
                    .engine
                    .update(|s| optimistic::remove_message(s, message.id))
                    .await;
                let mutation = Mutation::update_message(&message, StatusUpdate::Delete);
                self.write_through(mutation, undo).await
            }
        }
    }

    pub async fn set_message_status(&self, message: &Message, status: MessageStatus) -> Result<()> {
        let undo = self
            .engine
            .update(|s| optimistic::set_status(s, message.id, status))
            .await;
        let mutation = Mutation::update_message(message, status.into());
        self.write_through(mutation, undo).await
    }

    /// Flip every unread message to read
    ///
    /// Returns `false`, without writing anything, when nothing was unread.
    pub async fn mark_all_read(&self) -> Result<bool> {
        let undo = self.engine.update(optimistic::mark_all_read).await;
        if undo.is_nothing() {
            return Ok(false);
        }
        self.write_through(Mutation::MarkAllRead, undo).await?;
        Ok(true)
    }

    async fn write_through(&self, mutation: Mutation, undo: Undo) -> Result<()> {
        tracing::debug!("Sending {} for {:?}", mutation.action(), mutation.target());

        let outcome = match self.engine.remote().send_mutation(&mutation).await {
            Ok(MutationAck::Applied { record: Some(record) }) => {
                self.engine
                    .update(|s| reconciliation::apply_authoritative(s, &undo, record))
                    .await;
                Ok(())
            }
            Ok(MutationAck::Applied { record: None }) => Ok(()),
            Ok(MutationAck::Rejected { reason }) => {
                self.revert(&mutation, undo, &reason).await;
                Err(AdminError::Rejected(reason))
            }
            Err(e) => {
                self.revert(&mutation, undo, &e.to_string()).await;
                Err(e)
            }
        };

        if let Err(e) = self.engine.refresh().await {
            tracing::warn!("Refresh after {} failed: {}", mutation.action(), e);
        }
        outcome
    }

    async fn revert(&self, mutation: &Mutation, undo: Undo, reason: &str) {
        let result = self.engine.update(|s| reconciliation::rollback(s, undo)).await;
        tracing::warn!(
            "{} failed, local change {:?}: {}",
            mutation.action(),
            result,
            reason
        );
    }
}

/// Find `item` in `products`
///
/// A store without an id column returns rows under ids derived from their
/// fields, so an id miss falls back to the latest row of the same name and
/// type.
fn locate<'a>(products: &'a [CatalogItem], item: &CatalogItem) -> Option<&'a CatalogItem> {
    products.iter().find(|p| p.id == item.id).or_else(|| {
        products
            .iter()
            .rev()
            .find(|p| p.nom == item.nom && p.item_type == item.item_type)
    })
}
