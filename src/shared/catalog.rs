/**
 * Catalog Item Data Structure
 *
 * Products of the shop ("collection") and pictures of the gallery
 * ("galerie") share one sheet and one record type. The `type` column
 * decides which tab shows the row.
 */
use crate::shared::error::SharedError;
use crate::shared::record::{opt_record_id, opt_text_or_number, text_or_number, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tab an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Items for sale
    #[default]
    Collection,
    /// Gallery media
    Galerie,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Collection => "collection",
            ItemType::Galerie => "galerie",
        }
    }

    /// Lenient parse used for sheet rows; anything unknown is shop stock
    pub fn from_sheet(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "galerie" => ItemType::Galerie,
            _ => ItemType::Collection,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product or gallery media entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SheetItem")]
pub struct CatalogItem {
    pub id: RecordId,
    /// Display name; the legacy key the sheet matches on
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub lien_image: String,
    pub categorie: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

/// Row as the sheet sends it
#[derive(Deserialize)]
struct SheetItem {
    #[serde(default, deserialize_with = "opt_record_id")]
    id: Option<RecordId>,
    #[serde(default, deserialize_with = "text_or_number")]
    nom: String,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    prix: Option<String>,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    dimension: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    lien_image: String,
    #[serde(default, deserialize_with = "text_or_number")]
    categorie: String,
    #[serde(default, rename = "type", deserialize_with = "text_or_number")]
    item_type: String,
}

impl From<SheetItem> for CatalogItem {
    fn from(row: SheetItem) -> Self {
        let id = row
            .id
            .unwrap_or_else(|| RecordId::from_natural_key("product", &[&row.nom]));
        Self {
            id,
            nom: row.nom,
            prix: row.prix,
            dimension: row.dimension,
            lien_image: row.lien_image,
            categorie: row.categorie,
            item_type: ItemType::from_sheet(&row.item_type),
        }
    }
}

impl CatalogItem {
    /// New item with a fresh id
    pub fn new(nom: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: RecordId::new(),
            nom: nom.into(),
            prix: None,
            dimension: None,
            lien_image: String::new(),
            categorie: String::new(),
            item_type,
        }
    }

    pub fn with_prix(mut self, prix: impl Into<String>) -> Self {
        self.prix = Some(prix.into());
        self
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    pub fn with_image(mut self, lien_image: impl Into<String>) -> Self {
        self.lien_image = lien_image.into();
        self
    }

    pub fn with_categorie(mut self, categorie: impl Into<String>) -> Self {
        self.categorie = categorie.into();
        self
    }

    /// The only field the sheet cannot do without
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.nom.trim().is_empty() {
            return Err(SharedError::validation("nom", "item name cannot be empty"));
        }
        Ok(())
    }
}
