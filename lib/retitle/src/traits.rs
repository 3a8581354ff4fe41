use async_trait::async_trait;
use shared::catalog::{CatalogItem, CatalogPage, ItemKind, Section};

use crate::error::{Result, RetitleError};

/// A remote media catalog whose item titles can be rewritten.
///
/// Implementations own transport concerns (auth, retries, timeouts); callers see
/// a request either succeed or fail for good.
#[async_trait]
pub trait Catalog: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;

    async fn sections(&self) -> Result<Vec<Section>>;

    /// Fetch one page of the `kind` listing of a section.
    async fn list_page(
        &self,
        section_id: &str,
        kind: ItemKind,
        offset: usize,
        size: usize,
    ) -> Result<CatalogPage>;

    async fn children(&self, item_id: &str) -> Result<Vec<CatalogItem>>;

    /// Set the title and lock it in a single request.
    async fn set_locked_title(&self, item_id: &str, title: &str) -> Result<()>;

    async fn refresh_section(&self, section_id: &str) -> Result<()>;
}

/// Resolve a section id from its display title.
pub async fn find_section(catalog: &dyn Catalog, title: &str) -> Result<Section> {
    catalog
        .sections()
        .await?
        .into_iter()
        .find(|s| s.title == title)
        .ok_or_else(|| RetitleError::SectionNotFound(title.to_string()))
}
