/**
 * Remote Store Client
 *
 * Talks to the spreadsheet script: one URL, reads selected by an `action`
 * query parameter, writes posted as `{ action, ...fields }` JSON.
 */
pub mod fake;

pub use fake::FakeRemoteStore;

use crate::admin::config::Config;
use crate::admin::error::{AdminError, Result};
use crate::shared::{CatalogItem, Message, Mutation, MutationAck};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// The two collections the script serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Products,
    Messages,
}

impl CollectionKind {
    /// Value of the `action` query parameter
    pub fn action(&self) -> &'static str {
        match self {
            CollectionKind::Products => "get_products",
            CollectionKind::Messages => "get_messages",
        }
    }
}

/// Read and write access to the remote collections
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<CatalogItem>>;

    async fn fetch_messages(&self) -> Result<Vec<Message>>;

    /// Dispatch one write and report what the store made of it
    async fn send_mutation(&self, mutation: &Mutation) -> Result<MutationAck>;
}

/// reqwest-backed store
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    config: Config,
    client: Client,
}

impl HttpRemoteStore {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, client })
    }

    async fn fetch_collection<T: DeserializeOwned>(&self, kind: CollectionKind) -> Result<Vec<T>> {
        let url = self.config.action_url(kind.action());
        tracing::debug!("GET {}", kind.action());

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(AdminError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let records: Vec<T> = serde_json::from_str(&body)
            .map_err(|e| AdminError::decode(kind.action(), e.to_string()))?;

        tracing::debug!("{} returned {} records", kind.action(), records.len());
        Ok(records)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_products(&self) -> Result<Vec<CatalogItem>> {
        self.fetch_collection(CollectionKind::Products).await
    }

    async fn fetch_messages(&self) -> Result<Vec<Message>> {
        self.fetch_collection(CollectionKind::Messages).await
    }

    async fn send_mutation(&self, mutation: &Mutation) -> Result<MutationAck> {
        tracing::debug!("POST {}", mutation.action());

        // The script parses the raw post body; it must go out as text/plain.
        let body = serde_json::to_string(mutation).map_err(crate::shared::SharedError::from)?;
        let response = self
            .client
            .post(self.config.script_url())
            .header("Content-Type", "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AdminError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let ack = MutationAck::from_body(&text);
        if let MutationAck::Rejected { reason } = &ack {
            tracing::warn!("{} rejected by remote store: {}", mutation.action(), reason);
        }
        Ok(ack)
    }
}
