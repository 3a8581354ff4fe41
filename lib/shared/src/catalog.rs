use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a catalog record, with the numeric type code the server uses in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Show,
    Season,
    Episode,
}

impl ItemKind {
    pub fn type_code(self) -> u8 {
        match self {
            ItemKind::Show => 2,
            ItemKind::Season => 3,
            ItemKind::Episode => 4,
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "show" => Some(ItemKind::Show),
            "season" => Some(ItemKind::Season),
            "episode" => Some(ItemKind::Episode),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Show => write!(f, "show"),
            ItemKind::Season => write!(f, "season"),
            ItemKind::Episode => write!(f, "episode"),
        }
    }
}

/// A record owned by the remote catalog.
///
/// Only `title` and `title_locked` are ever rewritten; everything else is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub kind: ItemKind,
    /// Path of the first media part as recorded by the server
    pub backing_path: Option<String>,
    pub title: String,
    pub title_locked: bool,
    /// Season or episode number, when the server reports one
    pub index: Option<u32>,
}

/// One page of a section listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Total number of items the server claims the listing holds
    pub total_size: Option<usize>,
    /// Records the server sent, including ones not kept in `items`; paging advances by this
    pub received: usize,
    pub items: Vec<CatalogItem>,
}

/// A library section (e.g. "TV Shows", "Dance").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub kind: String,
}
