use futures::{stream, Stream, TryStreamExt};
use shared::catalog::{CatalogItem, ItemKind};
use tracing::debug;

use crate::error::{Result, RetitleError};
use crate::traits::Catalog;

pub const DEFAULT_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Copy)]
struct Cursor {
    offset: usize,
    /// `totalSize` as reported by the first page; later pages may disagree
    total_hint: Option<usize>,
    done: bool,
}

/// Pages through a section listing.
///
/// Offsets advance by the number of records the server sent, not the number kept.
/// Paging stops at whichever comes first: an empty page, a short page, or the
/// offset reaching the total reported by the first page. The total is a hint
/// only, since the server may be rescanning while we read.
pub struct Enumerator<'a> {
    catalog: &'a dyn Catalog,
    page_size: usize,
}

impl<'a> Enumerator<'a> {
    pub fn new(catalog: &'a dyn Catalog, page_size: usize) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Lazily fetch pages of `kind` items, starting from offset 0 on every call.
    pub fn pages(
        &self,
        section_id: &str,
        kind: ItemKind,
    ) -> impl Stream<Item = Result<Vec<CatalogItem>>> + Send + 'a {
        let catalog = self.catalog;
        let page_size = self.page_size;
        let section_id = section_id.to_string();
        let start = Cursor {
            offset: 0,
            total_hint: None,
            done: false,
        };

        stream::try_unfold(start, move |mut cursor| {
            let section_id = section_id.clone();
            async move {
                if cursor.done {
                    return Ok::<_, RetitleError>(None);
                }

                let page = catalog
                    .list_page(&section_id, kind, cursor.offset, page_size)
                    .await
                    .map_err(|e| RetitleError::Enumeration {
                        offset: cursor.offset,
                        source: Box::new(e),
                    })?;

                if cursor.offset == 0 {
                    cursor.total_hint = page.total_size;
                }

                let received = page.received;
                debug!(
                    "Fetched {} {} records at offset {}, kept {} (total hint {:?})",
                    received,
                    kind,
                    cursor.offset,
                    page.items.len(),
                    cursor.total_hint
                );
                if received == 0 {
                    return Ok(None);
                }

                cursor.offset += received;
                cursor.done = received < page_size
                    || cursor.total_hint.is_some_and(|total| cursor.offset >= total);

                Ok(Some((page.items, cursor)))
            }
        })
    }

    /// Drain every page into one list.
    pub async fn collect_all(&self, section_id: &str, kind: ItemKind) -> Result<Vec<CatalogItem>> {
        let pages: Vec<Vec<CatalogItem>> = self.pages(section_id, kind).try_collect().await?;
        Ok(pages.into_iter().flatten().collect())
    }
}
