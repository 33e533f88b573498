use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A catalogued, extracted clothing item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// ID in the database
    pub id: i64,

    /// Unique display filename, `<source-stem> - <article>.png`
    pub filename: String,

    /// Path of the extracted image in the output area
    pub file_path: PathBuf,

    /// Optional free-text description
    pub description: Option<String>,

    /// Clothing categories attached to the item
    pub categories: Vec<String>,

    /// Descriptive tags attached to the item
    pub tags: Vec<String>,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last metadata update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Fields needed to insert a new item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub filename: String,
    pub file_path: PathBuf,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

/// A composite artifact referencing one or more items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outfit {
    /// ID in the database
    pub id: i64,

    /// Unique display filename of the composite
    pub filename: String,

    /// Path of the composite image in the output area
    pub file_path: PathBuf,

    /// Optional free-text description
    pub description: Option<String>,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last update timestamp (RFC 3339)
    pub updated_at: String,

    /// Member items in composition order
    pub items: Vec<OutfitItem>,
}

/// Fields needed to insert a new outfit; members are passed separately
#[derive(Debug, Clone)]
pub struct NewOutfit {
    pub filename: String,
    pub file_path: PathBuf,
    pub description: Option<String>,
}

/// Membership relation between an outfit and an item.
///
/// A reference, not an ownership relation: removing the outfit leaves
/// the item untouched. Filename and path are denormalized for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitItem {
    pub outfit_id: i64,
    pub item_id: i64,
    pub filename: String,
    pub file_path: PathBuf,
}
