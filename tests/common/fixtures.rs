//! Record fixtures

use peramore_admin::admin::{Config, LocalCache};
use peramore_admin::shared::{AppConfig, CatalogItem, ItemType, Message, MessageStatus, Snapshot};
use serde_json::{json, Value};
use std::time::Duration;

pub fn catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("Chaise Lina", ItemType::Collection)
            .with_prix("50")
            .with_dimension("45x45x90")
            .with_categorie("Mobilier"),
        CatalogItem::new("Lampe Opale", ItemType::Collection)
            .with_prix("120")
            .with_categorie("Luminaire"),
        CatalogItem::new("Atelier", ItemType::Galerie).with_image("https://img.example.com/atelier.jpg"),
    ]
}

pub fn inbox() -> Vec<Message> {
    vec![
        Message::new("Claire", "claire@example.com", "Bonjour, la chaise est-elle disponible ?"),
        Message::new("Paul", "paul@example.com", "Merci pour la livraison").with_status(MessageStatus::Lu),
        Message::new("Inès", "ines@example.com", "Devis pour une table").with_status(MessageStatus::Archive),
    ]
}

pub fn snapshot() -> Snapshot {
    Snapshot::new(catalog(), inbox())
}

/// Product rows the way the script returns them: no ids, numbers for cells
pub fn sheet_products() -> Value {
    json!([
        {"nom": "Chaise Lina", "prix": 50, "dimension": "45x45x90", "lien_image": "", "categorie": "Mobilier", "type": "collection"},
        {"nom": "Atelier", "prix": "", "dimension": "", "lien_image": "https://img.example.com/atelier.jpg", "categorie": "", "type": "galerie"}
    ])
}

pub fn sheet_messages() -> Value {
    json!([
        {"nom": "Claire", "email": "claire@example.com", "phone": 612345678, "message": "Bonjour", "date": "2024-03-02T10:15:00.000Z", "preferenceContact": "email", "statut": "nouveau"},
        {"nom": "Paul", "email": "paul@example.com", "phone": "", "message": "Merci", "date": "2024-03-01 09:00:00", "preferenceContact": "sms", "statut": "lu"}
    ])
}

pub fn config_for(script_url: &str) -> Config {
    let builder = AppConfig::builder()
        .script_url(script_url)
        .refresh_interval(Duration::from_secs(30))
        .request_timeout(Duration::from_secs(5));
    Config::with_builder(builder).unwrap()
}

pub async fn memory_cache() -> LocalCache {
    LocalCache::in_memory().await.unwrap()
}
