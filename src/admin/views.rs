//! # Dashboard View Model
//!
//! Everything the presentation shell needs to draw the four tabs, without
//! depending on any UI toolkit: which records each tab shows, the category
//! suggestions offered while editing, and the item editor's draft.

use crate::shared::{CatalogItem, ItemType, Message, RecordId};
use std::collections::HashSet;
use std::fmt;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Inbox: every message that is not archived
    #[default]
    Messages,
    Archives,
    Collection,
    Galerie,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Messages, Tab::Archives, Tab::Collection, Tab::Galerie];

    /// Item type edited on this tab, if it is a catalog tab
    pub fn item_type(&self) -> Option<ItemType> {
        match self {
            Tab::Collection => Some(ItemType::Collection),
            Tab::Galerie => Some(ItemType::Galerie),
            Tab::Messages | Tab::Archives => None,
        }
    }

    pub fn is_inbox(&self) -> bool {
        matches!(self, Tab::Messages | Tab::Archives)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Messages => "Messages",
            Tab::Archives => "Archives",
            Tab::Collection => "Collection",
            Tab::Galerie => "Galerie",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Messages listed on `tab`, in snapshot order
pub fn visible_messages(messages: &[Message], tab: Tab) -> Vec<Message> {
    match tab {
        Tab::Messages => messages.iter().filter(|m| !m.is_archived()).cloned().collect(),
        Tab::Archives => messages.iter().filter(|m| m.is_archived()).cloned().collect(),
        Tab::Collection | Tab::Galerie => Vec::new(),
    }
}

/// Catalog items listed on `tab`, in snapshot order
pub fn visible_items(items: &[CatalogItem], tab: Tab) -> Vec<CatalogItem> {
    match tab.item_type() {
        Some(item_type) => items.iter().filter(|i| i.item_type == item_type).cloned().collect(),
        None => Vec::new(),
    }
}

/// Distinct non-empty categories, first occurrence first
pub fn category_suggestions(items: &[CatalogItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|i| i.categorie.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect()
}

/// Draft of the item being created or edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub nom: String,
    pub prix: String,
    pub dimension: String,
    pub lien_image: String,
    pub categorie: String,
    pub item_type: ItemType,
}

impl ItemDraft {
    pub fn empty(item_type: ItemType) -> Self {
        Self {
            item_type,
            ..Self::default()
        }
    }

    fn from_item(item: &CatalogItem) -> Self {
        Self {
            nom: item.nom.clone(),
            prix: item.prix.clone().unwrap_or_default(),
            dimension: item.dimension.clone().unwrap_or_default(),
            lien_image: item.lien_image.clone(),
            categorie: item.categorie.clone(),
            item_type: item.item_type,
        }
    }

    /// Item carrying the draft fields; blank optional fields are left out
    pub fn to_item(&self) -> CatalogItem {
        let optional = |field: &str| {
            let field = field.trim();
            (!field.is_empty()).then(|| field.to_string())
        };

        CatalogItem {
            id: RecordId::new(),
            nom: self.nom.trim().to_string(),
            prix: optional(&self.prix),
            dimension: optional(&self.dimension),
            lien_image: self.lien_image.trim().to_string(),
            categorie: self.categorie.trim().to_string(),
            item_type: self.item_type,
        }
    }
}

/// Create/edit form state
#[derive(Debug, Clone, Default)]
pub struct ItemEditor {
    pub draft: ItemDraft,
    editing: Option<CatalogItem>,
}

impl ItemEditor {
    pub fn new(item_type: ItemType) -> Self {
        Self {
            draft: ItemDraft::empty(item_type),
            editing: None,
        }
    }

    /// Load `item` into the form for editing
    pub fn start_edit(&mut self, item: &CatalogItem) {
        self.draft = ItemDraft::from_item(item);
        self.editing = Some(item.clone());
    }

    /// Drop the edit and empty the form, keeping the draft type
    pub fn cancel(&mut self) {
        *self = Self::new(self.draft.item_type);
    }

    pub fn editing_target(&self) -> Option<&CatalogItem> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Item to submit from `tab`, and the record it overwrites
    ///
    /// On a catalog tab the item type is forced to the tab's type.
    pub fn prepare_submit(&self, tab: Tab) -> (CatalogItem, Option<CatalogItem>) {
        let mut item = self.draft.to_item();
        if let Some(item_type) = tab.item_type() {
            item.item_type = item_type;
        }
        (item, self.editing.clone())
    }

    /// Empty the form after a submit, typed for `item_type`
    pub fn reset(&mut self, item_type: ItemType) {
        *self = Self::new(item_type);
    }
}
