//! Whole-session scenarios

use crate::common::*;
use assert_matches::assert_matches;
use peramore_admin::admin::remote::fake::RemoteCall;
use peramore_admin::admin::{
    AdminError, AdminSession, CollectionKind, DeleteTarget, FakeRemoteStore, GateState, HttpRemoteStore, LocalCache,
    Tab,
};
use peramore_admin::shared::{CatalogItem, ItemType, Message, MessageStatus, Mutation, MutationAck, Snapshot};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::ResponseTemplate;

async fn start(store: &Arc<FakeRemoteStore>, cache: LocalCache) -> AdminSession {
    AdminSession::start(config_for("https://script.example.com/exec"), Arc::clone(store) as _, cache).await
}

fn count_writes(writes: &[Mutation], action: &str) -> usize {
    writes.iter().filter(|m| m.action() == action).count()
}

/// Poll `check` every `step` until it holds, at most `attempts` times
async fn eventually<F, Fut>(step: Duration, attempts: usize, check: F)
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..attempts {
        if check().await {
            return;
        }
        tokio::time::sleep(step).await;
    }
    panic!("condition not reached after {} attempts", attempts);
}

#[tokio::test]
async fn test_starts_from_cache_then_refreshes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let cached = Snapshot::new(catalog(), vec![]);
    LocalCache::open(&path).await.unwrap().save(&cached).await.unwrap();

    let remote = snapshot();
    let store = Arc::new(FakeRemoteStore::with_data(remote.products.clone(), remote.messages.clone()));
    store.set_fetch_delay(Duration::from_millis(200)).await;

    let mut session = start(&store, LocalCache::open(&path).await.unwrap()).await;
    session.select_tab(Tab::Collection).await.unwrap();
    assert_eq!(session.snapshot().await, cached);

    session.refresh().await.unwrap();
    assert_eq!(session.snapshot().await, remote);
    assert_eq!(session.unread_count().await, 1);
    assert!(session.status().await.last_sync.is_some());
    session.shutdown();

    let reopened = LocalCache::open(&path).await.unwrap();
    assert_eq!(reopened.load().await.unwrap(), Some(remote));
}

#[tokio::test]
async fn test_failed_refresh_keeps_cached_state() {
    let store = Arc::new(FakeRemoteStore::with_data(catalog(), inbox()));
    store.fail_fetch(CollectionKind::Messages, true);
    let cached = Snapshot::new(vec![], inbox());
    let cache = memory_cache().await;
    cache.save(&cached).await.unwrap();

    let mut session = start(&store, cache).await;
    session.select_tab(Tab::Archives).await.unwrap();

    assert_matches!(session.refresh().await, Err(AdminError::Status { status: 500, .. }));
    assert_eq!(session.snapshot().await, cached);
    assert!(session.status().await.last_error.is_some());
}

#[tokio::test]
async fn test_new_item_shows_before_its_write_lands() {
    let store = Arc::new(FakeRemoteStore::new());
    store.hold_writes();
    let session = start(&store, memory_cache().await).await;
    session.refresh().await.unwrap();

    let mutations = session.mutations().clone();
    let item = CatalogItem::new("Chaise", ItemType::Collection).with_prix("50");
    let submit = tokio::spawn(async move { mutations.submit_item(item, None).await });

    while store.writes().await.is_empty() {
        tokio::task::yield_now().await;
    }
    let products = session.snapshot().await.products;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].nom, "Chaise");
    assert_eq!(products[0].prix.as_deref(), Some("50"));

    let fetches_before_write = store.fetch_count(CollectionKind::Products).await;
    store.release_writes(1);
    submit.await.unwrap().unwrap();

    // The write is followed by its own refresh.
    let calls = store.calls().await;
    let write_at = calls
        .iter()
        .position(|c| matches!(c, RemoteCall::Write(Mutation::AddItem { .. })))
        .unwrap();
    assert!(calls[write_at + 1..].contains(&RemoteCall::Fetch(CollectionKind::Products)));
    assert!(store.fetch_count(CollectionKind::Products).await > fetches_before_write);
    assert_eq!(session.snapshot().await.products.len(), 1);
}

#[tokio::test]
async fn test_rejected_submit_rolls_back_and_keeps_draft() {
    let store = Arc::new(FakeRemoteStore::new());
    let mut session = start(&store, memory_cache().await).await;
    session.select_tab(Tab::Collection).await.unwrap();
    session.refresh().await.unwrap();

    store
        .push_ack(Ok(MutationAck::Rejected { reason: "quota".into() }))
        .await;
    session.editor_mut().draft.nom = "Chaise".into();

    assert_matches!(session.submit_editor().await, Err(AdminError::Rejected(_)));
    assert!(session.visible_items().await.is_empty());
    assert_eq!(session.editor().draft.nom, "Chaise");
}

#[tokio::test]
async fn test_rename_through_editor() {
    let original = CatalogItem::new("Vase A", ItemType::Collection).with_prix("40");
    let store = Arc::new(FakeRemoteStore::with_data(vec![original.clone()], vec![]));
    let mut session = start(&store, memory_cache().await).await;
    session.select_tab(Tab::Collection).await.unwrap();
    session.refresh().await.unwrap();

    session.start_edit(&original);
    session.editor_mut().draft.nom = "Vase B".into();
    let stored = session.submit_editor().await.unwrap().unwrap();

    assert_eq!(stored.nom, "Vase B");
    assert_eq!(stored.id, original.id);
    let visible = session.visible_items().await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].nom, "Vase B");
    assert_eq!(visible[0].prix.as_deref(), Some("40"));
    assert_matches!(
        store.writes().await.as_slice(),
        [Mutation::UpdateProduct { old_nom, .. }] if old_nom == "Vase A"
    );
    assert!(!session.editor().is_editing());
}

#[tokio::test]
async fn test_inbox_is_marked_read_on_every_refresh() {
    let store = Arc::new(FakeRemoteStore::with_data(vec![], inbox()));
    let cache = memory_cache().await;
    let session = start(&store, cache).await;
    tokio::time::pause();

    // Startup tick: refresh, then mark read.
    eventually(Duration::from_millis(100), 50, || async {
        count_writes(&store.writes().await, "mark_all_read") == 1
    })
    .await;
    assert_eq!(session.unread_count().await, 0);

    store
        .set_messages(vec![Message::new("Léa", "lea@example.com", "Nouvelle demande")])
        .await;
    eventually(Duration::from_secs(1), 60, || async {
        count_writes(&store.writes().await, "mark_all_read") == 2
    })
    .await;

    assert_eq!(session.unread_count().await, 0);
    assert!(store.messages().await.iter().all(|m| m.statut == MessageStatus::Lu));
}

#[tokio::test]
async fn test_other_tabs_leave_unread_alone() {
    let store = Arc::new(FakeRemoteStore::with_data(vec![], vec![]));
    let mut session = start(&store, memory_cache().await).await;
    session.select_tab(Tab::Galerie).await.unwrap();
    tokio::time::pause();

    store.set_messages(inbox()).await;
    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(session.unread_count().await, 1);
    assert_eq!(count_writes(&store.writes().await, "mark_all_read"), 0);

    session.select_tab(Tab::Messages).await.unwrap();
    assert_eq!(session.unread_count().await, 0);
    assert_eq!(count_writes(&store.writes().await, "mark_all_read"), 1);
}

#[tokio::test]
async fn test_early_confirm_does_nothing() {
    let message = inbox().remove(1);
    let store = Arc::new(FakeRemoteStore::with_data(vec![], vec![message.clone()]));
    let mut session = start(&store, memory_cache().await).await;
    session.refresh().await.unwrap();
    tokio::time::pause();

    session.request_delete(DeleteTarget::Message(message.clone())).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!session.confirm_delete().await.unwrap());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!session.confirm_delete().await.unwrap());
    assert_matches!(session.gate_state().await, GateState::Armed { seconds_remaining: 1, .. });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(session.gate_progress().await, 1.0);
    assert!(session.confirm_delete().await.unwrap());
    assert!(session.snapshot().await.messages.is_empty());
    assert!(store.messages().await.is_empty());
}

#[tokio::test]
async fn test_delete_needs_an_armed_gate() {
    let items = catalog();
    let store = Arc::new(FakeRemoteStore::with_data(items.clone(), vec![]));
    let mut session = start(&store, memory_cache().await).await;
    session.refresh().await.unwrap();
    tokio::time::pause();

    assert!(!session.confirm_delete().await.unwrap());

    session.request_delete(DeleteTarget::Item(items[0].clone())).await;
    tokio::time::sleep(Duration::from_millis(3500)).await;
    session.cancel_delete().await;
    assert!(!session.confirm_delete().await.unwrap());

    assert_eq!(session.snapshot().await.products, items);
    assert_eq!(count_writes(&store.writes().await, "delete_product"), 0);
}

#[tokio::test]
async fn test_rearming_restarts_countdown() {
    let items = catalog();
    let store = Arc::new(FakeRemoteStore::with_data(items.clone(), vec![]));
    let mut session = start(&store, memory_cache().await).await;
    session.refresh().await.unwrap();
    tokio::time::pause();

    session.request_delete(DeleteTarget::Item(items[0].clone())).await;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    session.request_delete(DeleteTarget::Item(items[1].clone())).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_matches!(
        session.gate_state().await,
        GateState::Armed { seconds_remaining: 2, target: DeleteTarget::Item(ref item) } if item.id == items[1].id
    );
}

#[tokio::test]
async fn test_shutdown_stops_refreshing() {
    let store = Arc::new(FakeRemoteStore::new());
    let mut session = start(&store, memory_cache().await).await;
    session.refresh().await.unwrap();
    tokio::time::pause();
    tokio::time::sleep(Duration::from_millis(10)).await;

    session.shutdown();
    let fetches = store.fetch_count(CollectionKind::Products).await;
    tokio::time::sleep(Duration::from_secs(300)).await;

    assert_eq!(store.fetch_count(CollectionKind::Products).await, fetches);
}

#[tokio::test]
async fn test_session_over_http() {
    let script = ScriptServer::start().await;
    script.serve_products(sheet_products()).await;
    script.serve_messages(sheet_messages()).await;
    script.accept_writes(ResponseTemplate::new(200)).await;

    let remote = Arc::new(HttpRemoteStore::new(script.config()).unwrap());
    let mut session = AdminSession::start(script.config(), remote, memory_cache().await).await;
    session.select_tab(Tab::Galerie).await.unwrap();
    session.refresh().await.unwrap();

    assert_eq!(session.visible_items().await.len(), 1);
    assert_eq!(session.category_suggestions().await, vec!["Mobilier"]);

    session.editor_mut().draft.nom = "Vitrine".into();
    session.editor_mut().draft.categorie = "Atelier".into();
    session.submit_editor().await.unwrap();

    let add = script
        .posted_bodies()
        .await
        .into_iter()
        .find(|body| body["action"] == "add_item")
        .unwrap();
    assert_eq!(add["nom"], json!("Vitrine"));
    assert_eq!(add["type"], json!("galerie"));
    assert_eq!(add["categorie"], json!("Atelier"));
    session.shutdown();
}

#[tokio::test]
async fn test_item_added_to_sheet_without_ids_stays_addressable() {
    let script = ScriptServer::start().await;
    script.serve_products(json!([])).await;
    script.serve_messages(json!([])).await;
    script.accept_writes(ResponseTemplate::new(200)).await;

    let remote = Arc::new(HttpRemoteStore::new(script.config()).unwrap());
    let mut session = AdminSession::start(script.config(), remote, memory_cache().await).await;
    session.select_tab(Tab::Galerie).await.unwrap();
    session.refresh().await.unwrap();

    // The sheet stores the new row but has no id column.
    script
        .replace_products(json!([
            {"nom": "Vitrine", "prix": "", "dimension": "", "lien_image": "", "categorie": "Atelier", "type": "galerie"}
        ]))
        .await;
    session.editor_mut().draft.nom = "Vitrine".into();
    session.editor_mut().draft.categorie = "Atelier".into();
    let stored = session.submit_editor().await.unwrap().unwrap();

    let products = session.snapshot().await.products;
    assert_eq!(products.len(), 1);
    assert_eq!(stored, products[0]);
    assert_eq!(stored.categorie, "Atelier");
    session.shutdown();
}
