use shared::catalog::CatalogItem;
use shared::sync::{PlannedChange, SyncCounters};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::traits::Catalog;

/// Default spacing between two mutation requests.
pub const DEFAULT_PACE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was sent and accepted
    Applied,
    /// Dry run: the mutation would have been sent
    Planned,
    /// Title already matches and is locked; nothing sent
    Skipped,
    /// The change budget for this run is spent; nothing sent
    OverLimit,
}

/// Pushes desired titles to the catalog, one request at a time.
pub struct Dispatcher<'a> {
    catalog: &'a dyn Catalog,
    pace: Duration,
    last_mutation: Option<Instant>,
    /// Maximum number of changes, 0 for no limit
    limit: usize,
    attempted: usize,
}

impl<'a> Dispatcher<'a> {
    pub fn new(catalog: &'a dyn Catalog, pace: Duration) -> Self {
        Self {
            catalog,
            pace,
            last_mutation: None,
            limit: 0,
            attempted: 0,
        }
    }

    /// Cap the number of changes this dispatcher plans or sends, failures included.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True when `item` already shows `desired` and the server will not overwrite it.
    pub fn is_current(item: &CatalogItem, desired: &str) -> bool {
        item.title == desired && item.title_locked
    }

    pub async fn apply(
        &mut self,
        item: &CatalogItem,
        desired: &str,
        dry_run: bool,
    ) -> Result<Outcome> {
        if Self::is_current(item, desired) {
            debug!("{} already titled {:?}", item.id, desired);
            return Ok(Outcome::Skipped);
        }
        if self.limit > 0 && self.attempted >= self.limit {
            debug!("{} left as {:?}, change limit reached", item.id, item.title);
            return Ok(Outcome::OverLimit);
        }
        self.attempted += 1;

        if dry_run {
            return Ok(Outcome::Planned);
        }

        self.wait_for_pace().await;
        let result = self.catalog.set_locked_title(&item.id, desired).await;
        self.last_mutation = Some(Instant::now());
        result?;

        info!("{}: {:?} => {:?}", item.id, item.title, desired);
        Ok(Outcome::Applied)
    }

    async fn wait_for_pace(&self) {
        if let Some(last) = self.last_mutation {
            let next_allowed = last + self.pace;
            if next_allowed > Instant::now() {
                tokio::time::sleep_until(next_allowed).await;
            }
        }
    }
}

/// Fold one dispatch result into the run counters and change list.
pub(crate) fn record(
    counters: &mut SyncCounters,
    changes: &mut Vec<PlannedChange>,
    item: &CatalogItem,
    desired: &str,
    result: Result<Outcome>,
) {
    match result {
        Ok(Outcome::Skipped) => counters.skipped_already_correct += 1,
        Ok(Outcome::OverLimit) => counters.skipped_over_limit += 1,
        Ok(outcome) => {
            if outcome == Outcome::Applied {
                counters.updated += 1;
            }
            changes.push(PlannedChange {
                id: item.id.clone(),
                old_title: item.title.clone(),
                new_title: desired.to_string(),
            });
        }
        Err(e) => {
            error!("Failed to update {} ({:?}): {}", item.id, item.backing_path, e);
            counters.failed += 1;
        }
    }
}
