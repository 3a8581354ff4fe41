use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use shared::catalog::{CatalogItem, CatalogPage, ItemKind, Section};
use std::fmt;

// Internal structs for deserializing raw API responses

#[derive(Deserialize, Debug)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetadataContainer {
    pub total_size: Option<usize>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<Metadata>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct DirectoryContainer {
    #[serde(rename = "Directory", default)]
    pub directory: Vec<Directory>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Directory {
    pub key: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Metadata {
    #[serde(deserialize_with = "string_or_number")]
    pub rating_key: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    pub index: Option<u32>,
    #[serde(rename = "Media", default)]
    pub media: Vec<Media>,
    #[serde(rename = "Field", default)]
    pub fields: Vec<Field>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Media {
    #[serde(rename = "Part", default)]
    pub parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Part {
    pub file: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Field {
    pub name: String,
    #[serde(default, deserialize_with = "bool_or_flag")]
    pub locked: bool,
}

impl Metadata {
    /// Converts to a catalog item, or `None` for record types this tool never touches.
    pub fn into_item(self) -> Option<CatalogItem> {
        let kind = ItemKind::from_type_name(&self.kind)?;
        let title_locked = self
            .fields
            .iter()
            .any(|f| f.name == "title" && f.locked);
        let backing_path = self
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .find_map(|p| p.file.filter(|f| !f.is_empty()));

        Some(CatalogItem {
            id: self.rating_key,
            kind,
            backing_path,
            title: self.title,
            title_locked,
            index: self.index,
        })
    }
}

impl From<MetadataContainer> for CatalogPage {
    fn from(container: MetadataContainer) -> Self {
        CatalogPage {
            total_size: container.total_size,
            received: container.metadata.len(),
            items: container
                .metadata
                .into_iter()
                .filter_map(Metadata::into_item)
                .collect(),
        }
    }
}

impl From<Directory> for Section {
    fn from(d: Directory) -> Self {
        Section {
            id: d.key,
            title: d.title,
            kind: d.kind,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct KeyVisitor;

    impl Visitor<'_> for KeyVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer key")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(KeyVisitor)
}

// Plex reports lock flags as `true` in JSON but `1` in some older builds.
fn bool_or_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean or 0/1 flag")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(matches!(v, "1" | "true"))
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}
