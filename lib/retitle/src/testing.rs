//! In-memory catalog used by the unit tests.

use async_trait::async_trait;
use shared::catalog::{CatalogItem, CatalogPage, ItemKind, Section};
use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::{Result, RetitleError};
use crate::traits::Catalog;

pub fn episode(id: &str, path: &str, title: &str, locked: bool) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        kind: ItemKind::Episode,
        backing_path: Some(path.to_string()),
        title: title.to_string(),
        title_locked: locked,
        index: None,
    }
}

pub fn show(id: &str, title: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        kind: ItemKind::Show,
        backing_path: None,
        title: title.to_string(),
        title_locked: false,
        index: None,
    }
}

pub fn season(id: &str, index: u32, title: &str, locked: bool) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        kind: ItemKind::Season,
        backing_path: None,
        title: title.to_string(),
        title_locked: locked,
        index: Some(index),
    }
}

#[derive(Default)]
struct State {
    /// (parent id, item)
    items: Vec<(Option<String>, CatalogItem)>,
    page_requests: Vec<(usize, usize)>,
    page_sizes_served: Vec<usize>,
    mutations: Vec<(String, String)>,
    refreshes: Vec<String>,
}

#[derive(Default)]
pub struct FakeCatalog {
    state: Mutex<State>,
    reported_total: Option<usize>,
    failing_page_at: Option<usize>,
    failing_updates: HashSet<String>,
    /// Listed by the server but dropped by the client, like records of an unknown type
    unreadable: HashSet<String>,
    sections: Vec<Section>,
}

impl FakeCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let catalog = Self::default();
        catalog.state.lock().unwrap().items = items.into_iter().map(|i| (None, i)).collect();
        catalog
    }

    pub fn with_children(self, parent_id: &str, children: Vec<CatalogItem>) -> Self {
        self.state
            .lock()
            .unwrap()
            .items
            .extend(children.into_iter().map(|c| (Some(parent_id.to_string()), c)));
        self
    }

    pub fn with_reported_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    pub fn failing_page_at(mut self, offset: usize) -> Self {
        self.failing_page_at = Some(offset);
        self
    }

    pub fn failing_update_for(mut self, id: &str) -> Self {
        self.failing_updates.insert(id.to_string());
        self
    }

    pub fn with_unreadable(mut self, ids: &[&str]) -> Self {
        self.unreadable.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn with_section(mut self, id: &str, title: &str) -> Self {
        self.sections.push(Section {
            id: id.to_string(),
            title: title.to_string(),
            kind: "show".to_string(),
        });
        self
    }

    pub fn page_requests(&self) -> Vec<(usize, usize)> {
        self.state.lock().unwrap().page_requests.clone()
    }

    pub fn page_sizes_served(&self) -> Vec<usize> {
        self.state.lock().unwrap().page_sizes_served.clone()
    }

    pub fn mutations(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().mutations.clone()
    }

    pub fn refreshes(&self) -> Vec<String> {
        self.state.lock().unwrap().refreshes.clone()
    }

    pub fn item(&self, id: &str) -> Option<CatalogItem> {
        self.state
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|(_, i)| i.id == id)
            .map(|(_, i)| i.clone())
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    fn id(&self) -> &'static str {
        "fake"
    }

    fn name(&self) -> &'static str {
        "Fake"
    }

    async fn sections(&self) -> Result<Vec<Section>> {
        Ok(self.sections.clone())
    }

    async fn list_page(
        &self,
        _section_id: &str,
        kind: ItemKind,
        offset: usize,
        size: usize,
    ) -> Result<CatalogPage> {
        let mut state = self.state.lock().unwrap();
        state.page_requests.push((offset, size));
        if self.failing_page_at == Some(offset) {
            return Err(RetitleError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }

        let listing: Vec<CatalogItem> = state
            .items
            .iter()
            .filter(|(parent, i)| parent.is_none() && i.kind == kind)
            .map(|(_, i)| i.clone())
            .collect();
        let total = listing.len();
        let served: Vec<CatalogItem> = listing.into_iter().skip(offset).take(size).collect();
        state.page_sizes_served.push(served.len());

        Ok(CatalogPage {
            total_size: Some(self.reported_total.unwrap_or(total)),
            received: served.len(),
            items: served
                .into_iter()
                .filter(|i| !self.unreadable.contains(&i.id))
                .collect(),
        })
    }

    async fn children(&self, item_id: &str) -> Result<Vec<CatalogItem>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|(parent, _)| parent.as_deref() == Some(item_id))
            .map(|(_, i)| i.clone())
            .collect())
    }

    async fn set_locked_title(&self, item_id: &str, title: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .mutations
            .push((item_id.to_string(), title.to_string()));
        if self.failing_updates.contains(item_id) {
            return Err(RetitleError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        if let Some((_, item)) = state.items.iter_mut().find(|(_, i)| i.id == item_id) {
            item.title = title.to_string();
            item.title_locked = true;
        }
        Ok(())
    }

    async fn refresh_section(&self, section_id: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .refreshes
            .push(section_id.to_string());
        Ok(())
    }
}
