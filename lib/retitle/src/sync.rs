use chrono::Utc;
use futures::TryStreamExt;
use shared::catalog::{CatalogItem, ItemKind};
use shared::sync::{SyncCounters, SyncReport};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::dispatch::{self, Dispatcher, DEFAULT_PACE};
use crate::enumerate::{Enumerator, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::traits::Catalog;
use crate::{path, title};

/// How long to let the server settle after asking it to rescan a section.
pub const REFRESH_SETTLE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub section_id: String,
    /// Only items whose backing file lies under this root are touched
    pub root: String,
    pub dry_run: bool,
    pub page_size: usize,
    pub pace: Duration,
    /// Maximum number of changes per run, 0 for no limit
    pub limit: usize,
    pub refresh: bool,
}

impl SyncOptions {
    pub fn new(section_id: &str, root: &str) -> Self {
        Self {
            section_id: section_id.to_string(),
            root: root.to_string(),
            dry_run: true,
            page_size: DEFAULT_PAGE_SIZE,
            pace: DEFAULT_PACE,
            limit: 0,
            refresh: false,
        }
    }
}

/// Derives episode titles from filenames and pushes them to the catalog.
pub struct SyncDriver<'a> {
    catalog: &'a dyn Catalog,
    options: SyncOptions,
}

impl<'a> SyncDriver<'a> {
    pub fn new(catalog: &'a dyn Catalog, options: SyncOptions) -> Self {
        Self { catalog, options }
    }

    /// Run one full pass over the section.
    ///
    /// Only a listing failure aborts the run; failed item updates are counted and skipped.
    pub async fn run(&self) -> Result<SyncReport> {
        let opts = &self.options;
        let started_at = Utc::now();

        if opts.refresh {
            self.catalog.refresh_section(&opts.section_id).await?;
            tokio::time::sleep(REFRESH_SETTLE).await;
        }

        info!(
            "Syncing episode titles on {} section {} under {} ({})",
            self.catalog.name(),
            opts.section_id,
            opts.root,
            if opts.dry_run { "dry run" } else { "apply" }
        );

        let enumerator = Enumerator::new(self.catalog, opts.page_size);
        let mut dispatcher = Dispatcher::new(self.catalog, opts.pace).with_limit(opts.limit);
        let mut counters = SyncCounters::default();
        let mut changes = Vec::new();

        let mut pages = Box::pin(enumerator.pages(&opts.section_id, ItemKind::Episode));
        while let Some(page) = pages.try_next().await? {
            for item in page {
                counters.scanned += 1;
                let Some(desired) = self.desired_title(&item, &mut counters) else {
                    continue;
                };

                let result = dispatcher.apply(&item, &desired, opts.dry_run).await;
                dispatch::record(&mut counters, &mut changes, &item, &desired, result);
            }
        }

        info!(
            "Sync finished: scanned={} matched={} updated={} planned={} failed={}",
            counters.scanned,
            counters.matched_root,
            counters.updated,
            changes.len(),
            counters.failed
        );

        Ok(SyncReport {
            section_id: opts.section_id.clone(),
            dry_run: opts.dry_run,
            counters,
            changes,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn desired_title(&self, item: &CatalogItem, counters: &mut SyncCounters) -> Option<String> {
        let backing_path = item.backing_path.as_deref()?;
        if !path::matches(backing_path, &self.options.root) {
            return None;
        }
        counters.matched_root += 1;

        match title::derive(backing_path) {
            Some(desired) => {
                counters.derived += 1;
                debug!("{} => {:?}", backing_path, desired);
                Some(desired)
            }
            None => {
                warn!("No usable title in filename, skipping {}: {}", item.id, backing_path);
                counters.skipped_empty_title += 1;
                None
            }
        }
    }
}
