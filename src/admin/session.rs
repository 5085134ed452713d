//! # Admin Session
//!
//! One dashboard session: the sync engine, the mutation layer, the delete
//! gate, the item editor, the active tab and the two background timers
//! (periodic refresh and delete countdown). Dropping the session, or calling
//! [`AdminSession::shutdown`], stops both timers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use peramore_admin::admin::{AdminSession, Config, HttpRemoteStore, LocalCache};
//! use std::sync::Arc;
//!
//! # async fn example() -> peramore_admin::admin::Result<()> {
//! let config = Config::load()?;
//! let remote = Arc::new(HttpRemoteStore::new(config.clone())?);
//! let cache = LocalCache::open(&config.cache_path()).await?;
//!
//! let mut session = AdminSession::start(config, remote, cache).await;
//! println!("{} unread", session.unread_count().await);
//! session.shutdown();
//! # Ok(())
//! # }
//! ```

use crate::admin::config::Config;
use crate::admin::delete_gate::{DeleteGate, DeleteTarget, GateState};
use crate::admin::error::Result;
use crate::admin::local_db::LocalCache;
use crate::admin::offline::MutationLayer;
use crate::admin::remote::RemoteStore;
use crate::admin::sync::{RefreshOutcome, SyncEngine, SyncScheduler, SyncStatus};
use crate::admin::views::{self, ItemEditor, Tab};
use crate::shared::{CatalogItem, ItemType, Message, MessageStatus, Snapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

const GATE_TICK: Duration = Duration::from_secs(1);

pub struct AdminSession {
    engine: Arc<SyncEngine>,
    mutations: MutationLayer,
    gate: Arc<Mutex<DeleteGate>>,
    editor: ItemEditor,
    active_tab: Arc<RwLock<Tab>>,
    scheduler: Option<SyncScheduler>,
    ticker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("engine", &self.engine)
            .field("editor", &self.editor)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl AdminSession {
    /// Seed from the cache and start the refresh timer
    ///
    /// The timer's first tick is the startup refresh. Must be called from
    /// inside a tokio runtime.
    pub async fn start(config: Config, remote: Arc<dyn RemoteStore>, cache: LocalCache) -> Self {
        let engine = Arc::new(SyncEngine::new(remote, cache));
        engine.seed_from_cache().await;

        let mutations = MutationLayer::new(Arc::clone(&engine));
        let active_tab = Arc::new(RwLock::new(Tab::default()));

        let scheduler = SyncScheduler::spawn(config.refresh_interval(), {
            let engine = Arc::clone(&engine);
            let mutations = mutations.clone();
            let active_tab = Arc::clone(&active_tab);
            move || {
                let engine = Arc::clone(&engine);
                let mutations = mutations.clone();
                let active_tab = Arc::clone(&active_tab);
                async move {
                    // Failures are logged by the engine.
                    let _ = engine.refresh().await;
                    if *active_tab.read().await == Tab::Messages {
                        if let Err(e) = mutations.mark_all_read().await {
                            tracing::warn!("Marking messages read failed: {}", e);
                        }
                    }
                }
            }
        });

        tracing::info!("Admin session started");
        Self {
            engine,
            mutations,
            gate: Arc::new(Mutex::new(DeleteGate::new(config.delete_countdown()))),
            editor: ItemEditor::new(ItemType::default()),
            active_tab,
            scheduler: Some(scheduler),
            ticker: None,
        }
    }

    pub async fn active_tab(&self) -> Tab {
        *self.active_tab.read().await
    }

    /// Switch tabs, dropping any edit in progress
    ///
    /// Opening the inbox marks every message read.
    pub async fn select_tab(&mut self, tab: Tab) -> Result<()> {
        *self.active_tab.write().await = tab;
        let item_type = tab.item_type().unwrap_or(self.editor.draft.item_type);
        self.editor.reset(item_type);

        if tab == Tab::Messages {
            self.mutations.mark_all_read().await?;
        }
        Ok(())
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        self.engine.refresh().await
    }

    pub fn start_edit(&mut self, item: &CatalogItem) {
        self.editor.start_edit(item);
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    pub fn editor(&self) -> &ItemEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ItemEditor {
        &mut self.editor
    }

    /// Create or update the item in the editor
    ///
    /// The form is emptied on success and kept as is on failure. Returns the
    /// stored record, `None` if the refreshed catalog no longer lists it.
    pub async fn submit_editor(&mut self) -> Result<Option<CatalogItem>> {
        let tab = self.active_tab().await;
        let (item, target) = self.editor.prepare_submit(tab);
        let item_type = item.item_type;

        let stored = self.mutations.submit_item(item, target.as_ref()).await?;
        self.editor.reset(item_type);
        Ok(stored)
    }

    /// Arm the delete gate for `target` and start its countdown
    pub async fn request_delete(&mut self, target: DeleteTarget) {
        self.stop_ticker();
        self.gate.lock().await.arm(target);

        let gate = Arc::clone(&self.gate);
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(GATE_TICK);
            interval.tick().await;
            loop {
                interval.tick().await;
                match gate.lock().await.tick() {
                    Some(0) | None => break,
                    Some(_) => {}
                }
            }
        }));
    }

    pub async fn cancel_delete(&mut self) {
        self.stop_ticker();
        self.gate.lock().await.cancel();
    }

    /// Carry out the armed delete once its countdown is over
    ///
    /// Returns `false`, changing nothing, while the countdown is running or
    /// when nothing is armed. This is the only way to delete a record:
    ///
    /// ```compile_fail
    /// use peramore_admin::admin::{AdminSession, DeleteTarget};
    /// use peramore_admin::shared::{CatalogItem, ItemType};
    ///
    /// async fn skip_the_gate(session: &AdminSession) {
    ///     let chaise = CatalogItem::new("Chaise", ItemType::Collection);
    ///     let _ = session.mutations().delete_item(DeleteTarget::Item(chaise)).await;
    /// }
    /// ```
    pub async fn confirm_delete(&mut self) -> Result<bool> {
        let Some(target) = self.gate.lock().await.confirm() else {
            return Ok(false);
        };
        self.stop_ticker();
        self.mutations.delete_item(target).await?;
        Ok(true)
    }

    pub async fn gate_state(&self) -> GateState {
        self.gate.lock().await.state().clone()
    }

    pub async fn gate_progress(&self) -> f32 {
        self.gate.lock().await.progress()
    }

    /// Archive from the inbox, restore to read from the archives
    pub async fn toggle_archive(&self, message: &Message) -> Result<()> {
        let status = match self.active_tab().await {
            Tab::Archives => MessageStatus::Lu,
            _ => MessageStatus::Archive,
        };
        self.mutations.set_message_status(message, status).await
    }

    pub async fn visible_messages(&self) -> Vec<Message> {
        let tab = self.active_tab().await;
        views::visible_messages(&self.engine.messages().await, tab)
    }

    pub async fn visible_items(&self) -> Vec<CatalogItem> {
        let tab = self.active_tab().await;
        views::visible_items(&self.engine.products().await, tab)
    }

    pub async fn category_suggestions(&self) -> Vec<String> {
        views::category_suggestions(&self.engine.products().await)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.engine.snapshot().await
    }

    pub async fn unread_count(&self) -> usize {
        self.engine.unread_count().await
    }

    pub async fn status(&self) -> SyncStatus {
        self.engine.status().await
    }

    pub fn mutations(&self) -> &MutationLayer {
        &self.mutations
    }

    /// Stop the refresh timer and the delete countdown
    pub fn shutdown(&mut self) {
        self.stop_ticker();
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
            tracing::info!("Admin session stopped");
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for AdminSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
