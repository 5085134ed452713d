//! Paired state of both remote collections

use crate::shared::catalog::CatalogItem;
use crate::shared::message::{unread_count, Message};
use serde::{Deserialize, Serialize};

/// Product list and message list as of one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub products: Vec<CatalogItem>,
    pub messages: Vec<Message>,
}

impl Snapshot {
    pub fn new(products: Vec<CatalogItem>, messages: Vec<Message>) -> Self {
        Self { products, messages }
    }

    pub fn unread(&self) -> usize {
        unread_count(&self.messages)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.messages.is_empty()
    }
}
