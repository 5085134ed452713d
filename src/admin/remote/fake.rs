//! In-memory remote store
//!
//! Behaves like the spreadsheet script: fetches return the stored rows and
//! writes are applied with the script's own matching rules (by name for
//! products, by sender and body for messages). Failures, rejections and
//! slow or held calls can be switched on to exercise the sync paths.

use crate::admin::error::{AdminError, Result};
use crate::admin::remote::{CollectionKind, RemoteStore};
use crate::shared::{CatalogItem, Message, MessageStatus, Mutation, MutationAck, StatusUpdate};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};

/// One call observed by the fake, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Fetch(CollectionKind),
    Write(Mutation),
}

#[derive(Debug)]
pub struct FakeRemoteStore {
    products: Mutex<Vec<CatalogItem>>,
    messages: Mutex<Vec<Message>>,
    calls: Mutex<Vec<RemoteCall>>,
    /// Canned acknowledgements, used before the default `Applied`
    acks: Mutex<VecDeque<Result<MutationAck>>>,
    fail_products: AtomicBool,
    fail_messages: AtomicBool,
    apply_writes: AtomicBool,
    fetch_delay: Mutex<Duration>,
    fetches_in_flight: AtomicUsize,
    max_fetches_in_flight: AtomicUsize,
    write_gate: Semaphore,
    writes_held: AtomicBool,
}

impl Default for FakeRemoteStore {
    fn default() -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            acks: Mutex::new(VecDeque::new()),
            fail_products: AtomicBool::new(false),
            fail_messages: AtomicBool::new(false),
            apply_writes: AtomicBool::new(true),
            fetch_delay: Mutex::new(Duration::ZERO),
            fetches_in_flight: AtomicUsize::new(0),
            max_fetches_in_flight: AtomicUsize::new(0),
            write_gate: Semaphore::new(0),
            writes_held: AtomicBool::new(false),
        }
    }
}

impl FakeRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(products: Vec<CatalogItem>, messages: Vec<Message>) -> Self {
        Self {
            products: Mutex::new(products),
            messages: Mutex::new(messages),
            ..Self::default()
        }
    }

    pub async fn set_products(&self, products: Vec<CatalogItem>) {
        *self.products.lock().await = products;
    }

    pub async fn set_messages(&self, messages: Vec<Message>) {
        *self.messages.lock().await = messages;
    }

    pub async fn products(&self) -> Vec<CatalogItem> {
        self.products.lock().await.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    pub fn fail_fetch(&self, kind: CollectionKind, fail: bool) {
        match kind {
            CollectionKind::Products => self.fail_products.store(fail, Ordering::SeqCst),
            CollectionKind::Messages => self.fail_messages.store(fail, Ordering::SeqCst),
        }
    }

    /// Keep acknowledging writes but stop applying them to the stored rows
    pub fn ignore_writes(&self) {
        self.apply_writes.store(false, Ordering::SeqCst);
    }

    /// Answer the next write with `ack` instead of applying it
    pub async fn push_ack(&self, ack: Result<MutationAck>) {
        self.acks.lock().await.push_back(ack);
    }

    pub async fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().await = delay;
    }

    /// Park every write until [`release_writes`](Self::release_writes)
    pub fn hold_writes(&self) {
        self.writes_held.store(true, Ordering::SeqCst);
    }

    pub fn release_writes(&self, count: usize) {
        self.write_gate.add_permits(count);
    }

    pub async fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().await.clone()
    }

    pub async fn writes(&self) -> Vec<Mutation> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                RemoteCall::Write(m) => Some(m.clone()),
                RemoteCall::Fetch(_) => None,
            })
            .collect()
    }

    pub async fn fetch_count(&self, kind: CollectionKind) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| **call == RemoteCall::Fetch(kind))
            .count()
    }

    /// Highest number of product fetches that were running at once
    pub fn max_fetches_in_flight(&self) -> usize {
        self.max_fetches_in_flight.load(Ordering::SeqCst)
    }

    async fn begin_fetch(&self, kind: CollectionKind) -> Result<()> {
        self.calls.lock().await.push(RemoteCall::Fetch(kind));

        let track = kind == CollectionKind::Products;
        if track {
            let now = self.fetches_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_fetches_in_flight.fetch_max(now, Ordering::SeqCst);
        }

        let delay = *self.fetch_delay.lock().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if track {
            self.fetches_in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        let failing = match kind {
            CollectionKind::Products => self.fail_products.load(Ordering::SeqCst),
            CollectionKind::Messages => self.fail_messages.load(Ordering::SeqCst),
        };
        if failing {
            return Err(AdminError::Status {
                status: 500,
                body: format!("{} unavailable", kind.action()),
            });
        }
        Ok(())
    }

    async fn apply(&self, mutation: &Mutation) {
        match mutation {
            Mutation::AddItem { item } => self.products.lock().await.push(item.clone()),
            Mutation::UpdateProduct { item, old_nom } => {
                let mut products = self.products.lock().await;
                for existing in products.iter_mut().filter(|p| &p.nom == old_nom) {
                    *existing = item.clone();
                }
            }
            Mutation::DeleteProduct { nom, .. } => {
                self.products.lock().await.retain(|p| &p.nom != nom);
            }
            Mutation::UpdateMessage {
                client_nom,
                msg_content,
                status,
                ..
            } => {
                let mut messages = self.messages.lock().await;
                let matches = |m: &Message| &m.nom == client_nom && &m.message == msg_content;
                match status {
                    StatusUpdate::Delete => messages.retain(|m| !matches(m)),
                    other => {
                        let statut = match other {
                            StatusUpdate::Lu => MessageStatus::Lu,
                            StatusUpdate::Archive => MessageStatus::Archive,
                            _ => MessageStatus::Nouveau,
                        };
                        for message in messages.iter_mut().filter(|m| matches(m)) {
                            message.statut = statut;
                        }
                    }
                }
            }
            Mutation::MarkAllRead => {
                for message in self.messages.lock().await.iter_mut() {
                    if message.statut == MessageStatus::Nouveau {
                        message.statut = MessageStatus::Lu;
                    }
                }
            }
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemoteStore {
    async fn fetch_products(&self) -> Result<Vec<CatalogItem>> {
        self.begin_fetch(CollectionKind::Products).await?;
        Ok(self.products.lock().await.clone())
    }

    async fn fetch_messages(&self) -> Result<Vec<Message>> {
        self.begin_fetch(CollectionKind::Messages).await?;
        Ok(self.messages.lock().await.clone())
    }

    async fn send_mutation(&self, mutation: &Mutation) -> Result<MutationAck> {
        self.calls.lock().await.push(RemoteCall::Write(mutation.clone()));

        if self.writes_held.load(Ordering::SeqCst) {
            if let Ok(permit) = self.write_gate.acquire().await {
                permit.forget();
            }
        }

        if let Some(canned) = self.acks.lock().await.pop_front() {
            return canned;
        }

        if self.apply_writes.load(Ordering::SeqCst) {
            self.apply(mutation).await;
        }
        Ok(MutationAck::Applied { record: None })
    }
}
