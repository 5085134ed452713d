//! Write actions sent to the spreadsheet script
//!
//! Every write is a `POST` whose JSON body is `{ "action": ..., ...fields }`.
//! Records are addressed by their stable id; the legacy natural-key fields
//! (`oldNom`, `nom`, `clientNom`, `msgContent`) travel along so that a
//! script which does not store ids can still find the row.

use crate::shared::catalog::CatalogItem;
use crate::shared::message::{Message, MessageStatus};
use crate::shared::record::RecordId;
use serde::{Deserialize, Serialize};

/// Status carried by `update_message`; `delete` removes the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusUpdate {
    Nouveau,
    Lu,
    Archive,
    Delete,
}

impl From<MessageStatus> for StatusUpdate {
    fn from(status: MessageStatus) -> Self {
        match status {
            MessageStatus::Nouveau => StatusUpdate::Nouveau,
            MessageStatus::Lu => StatusUpdate::Lu,
            MessageStatus::Archive => StatusUpdate::Archive,
        }
    }
}

/// One write request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Mutation {
    AddItem {
        #[serde(flatten)]
        item: CatalogItem,
    },
    UpdateProduct {
        #[serde(flatten)]
        item: CatalogItem,
        #[serde(rename = "oldNom")]
        old_nom: String,
    },
    DeleteProduct {
        id: RecordId,
        nom: String,
    },
    UpdateMessage {
        id: RecordId,
        #[serde(rename = "clientNom")]
        client_nom: String,
        #[serde(rename = "msgContent")]
        msg_content: String,
        status: StatusUpdate,
    },
    MarkAllRead,
}

impl Mutation {
    pub fn update_message(message: &Message, status: StatusUpdate) -> Self {
        Mutation::UpdateMessage {
            id: message.id,
            client_nom: message.nom.clone(),
            msg_content: message.message.clone(),
            status,
        }
    }

    /// Wire name of the action
    pub fn action(&self) -> &'static str {
        match self {
            Mutation::AddItem { .. } => "add_item",
            Mutation::UpdateProduct { .. } => "update_product",
            Mutation::DeleteProduct { .. } => "delete_product",
            Mutation::UpdateMessage { .. } => "update_message",
            Mutation::MarkAllRead => "mark_all_read",
        }
    }

    /// Record the write targets, if it targets a single one
    pub fn target(&self) -> Option<RecordId> {
        match self {
            Mutation::AddItem { item } | Mutation::UpdateProduct { item, .. } => Some(item.id),
            Mutation::DeleteProduct { id, .. } | Mutation::UpdateMessage { id, .. } => Some(*id),
            Mutation::MarkAllRead => None,
        }
    }
}

/// Body a script may answer a write with
///
/// `{"ok": true, "record": {...}}` or `{"ok": false, "error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AckBody {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub record: Option<serde_json::Value>,
}

fn default_ok() -> bool {
    true
}

/// Outcome of a write as reported by the remote store
#[derive(Debug, Clone, PartialEq)]
pub enum MutationAck {
    /// The write took effect; `record` is the authoritative row when sent back
    Applied { record: Option<serde_json::Value> },
    /// The script refused the write
    Rejected { reason: String },
}

impl MutationAck {
    /// Interpret a 2xx response body
    ///
    /// Scripts that answer with nothing, or with something that isn't an
    /// acknowledgement object, count as having applied the write.
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return MutationAck::Applied { record: None };
        }
        match serde_json::from_str::<AckBody>(trimmed) {
            Ok(AckBody { ok: true, record, .. }) => MutationAck::Applied { record },
            Ok(AckBody { ok: false, error, .. }) => MutationAck::Rejected {
                reason: error.unwrap_or_else(|| "write rejected".to_string()),
            },
            Err(_) => MutationAck::Applied { record: None },
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, MutationAck::Applied { .. })
    }
}
