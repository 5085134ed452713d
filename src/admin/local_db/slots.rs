//! # Snapshot Slots
//!
//! Load and save the two cached collections. A save always writes both
//! slots in one transaction, so a reader never sees products from one
//! refresh next to messages from another.

use crate::admin::error::Result;
use crate::admin::local_db::LocalCache;
use crate::shared::Snapshot;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::Row;

/// Slot holding the product and gallery rows
pub const PRODUCTS_SLOT: &str = "peramore_items";
/// Slot holding the contact messages
pub const MESSAGES_SLOT: &str = "peramore_msgs";

const UPSERT_SLOT: &str = "INSERT INTO cache_slots (slot, payload, updated_at) VALUES (?, ?, ?)
    ON CONFLICT(slot) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at";

impl LocalCache {
    /// Last saved snapshot, `None` when nothing was ever saved
    ///
    /// A slot that is missing or cannot be decoded reads as an empty list.
    pub async fn load(&self) -> Result<Option<Snapshot>> {
        let rows = sqlx::query("SELECT slot, payload FROM cache_slots WHERE slot IN (?, ?)")
            .bind(PRODUCTS_SLOT)
            .bind(MESSAGES_SLOT)
            .fetch_all(self.pool())
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut snapshot = Snapshot::default();
        for row in rows {
            let slot: String = row.try_get("slot")?;
            let payload: String = row.try_get("payload")?;
            match slot.as_str() {
                PRODUCTS_SLOT => snapshot.products = decode_slot(&slot, &payload),
                MESSAGES_SLOT => snapshot.messages = decode_slot(&slot, &payload),
                _ => {}
            }
        }
        Ok(Some(snapshot))
    }

    /// Replace both slots with `snapshot`
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let products = serde_json::to_string(&snapshot.products).map_err(crate::shared::SharedError::from)?;
        let messages = serde_json::to_string(&snapshot.messages).map_err(crate::shared::SharedError::from)?;
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool().begin().await?;
        for (slot, payload) in [(PRODUCTS_SLOT, products), (MESSAGES_SLOT, messages)] {
            sqlx::query(UPSERT_SLOT)
                .bind(slot)
                .bind(payload)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::debug!(
            "Cached {} products and {} messages",
            snapshot.products.len(),
            snapshot.messages.len()
        );
        Ok(())
    }

    /// When the slots were last written
    pub async fn last_saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(updated_at) FROM cache_slots")
            .fetch_one(self.pool())
            .await?;

        Ok(latest
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    /// Forget both collections
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM cache_slots")
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

fn decode_slot<T: DeserializeOwned>(slot: &str, payload: &str) -> Vec<T> {
    match serde_json::from_str(payload) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Ignoring unreadable cache slot {}: {}", slot, e);
            Vec::new()
        }
    }
}
