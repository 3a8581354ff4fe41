//! Season titles taken from on-disk season folder names.
//!
//! Folders are expected to be named `Season NN - <Title>`; the title part becomes
//! the season title in the catalog, matched to seasons by number.

use itertools::Itertools;
use regex::Regex;
use shared::catalog::ItemKind;
use shared::sync::{SeasonReport, SyncCounters};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

use crate::dispatch::{self, Dispatcher, DEFAULT_PACE};
use crate::enumerate::{Enumerator, DEFAULT_PAGE_SIZE};
use crate::error::{Result, RetitleError};
use crate::traits::Catalog;

static RE_SEASON_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Season\s+(?P<n>\d{2})\s+-\s+(?P<title>.+)$").unwrap());

/// Parse a season folder name into its number and title.
pub fn parse_season_dir(name: &str) -> Option<(u32, String)> {
    let caps = RE_SEASON_DIR.captures(name)?;
    let number = caps["n"].parse().ok()?;
    let title = caps["title"].trim();
    if title.is_empty() {
        None
    } else {
        Some((number, title.to_string()))
    }
}

/// Collect the desired season titles from the folders directly under `root`.
pub fn season_titles_from_dir(root: &Path) -> Result<BTreeMap<u32, String>> {
    let mut desired = BTreeMap::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some((number, title)) = name.to_str().and_then(parse_season_dir) else {
            continue;
        };
        if let Some(previous) = desired.insert(number, title) {
            warn!("Season {:02} has more than one folder, ignoring {:?}", number, previous);
        }
    }

    if desired.is_empty() {
        return Err(RetitleError::NoSeasonFolders(root.display().to_string()));
    }
    Ok(desired)
}

#[derive(Debug, Clone)]
pub struct SeasonOptions {
    pub section_id: String,
    pub show_title: String,
    pub dry_run: bool,
    pub page_size: usize,
    pub pace: Duration,
}

impl SeasonOptions {
    pub fn new(section_id: &str, show_title: &str) -> Self {
        Self {
            section_id: section_id.to_string(),
            show_title: show_title.to_string(),
            dry_run: true,
            page_size: DEFAULT_PAGE_SIZE,
            pace: DEFAULT_PACE,
        }
    }
}

pub struct SeasonSync<'a> {
    catalog: &'a dyn Catalog,
    options: SeasonOptions,
}

impl<'a> SeasonSync<'a> {
    pub fn new(catalog: &'a dyn Catalog, options: SeasonOptions) -> Self {
        Self { catalog, options }
    }

    pub async fn run(&self, desired: &BTreeMap<u32, String>) -> Result<SeasonReport> {
        let opts = &self.options;

        let show = Enumerator::new(self.catalog, opts.page_size)
            .collect_all(&opts.section_id, ItemKind::Show)
            .await?
            .into_iter()
            .find(|s| s.title == opts.show_title)
            .ok_or_else(|| RetitleError::ShowNotFound {
                section: opts.section_id.clone(),
                title: opts.show_title.clone(),
            })?;

        info!(
            "Syncing season titles of {:?} ({}) from {} folders",
            show.title,
            show.id,
            desired.len()
        );

        let seasons: Vec<_> = self
            .catalog
            .children(&show.id)
            .await?
            .into_iter()
            .filter(|c| c.kind == ItemKind::Season)
            .collect();

        let known: Vec<u32> = seasons.iter().filter_map(|s| s.index).collect();
        let missing = desired.keys().filter(|n| !known.contains(n)).join(", ");
        if !missing.is_empty() {
            warn!("Season folders with no catalog season: {}", missing);
        }

        let mut dispatcher = Dispatcher::new(self.catalog, opts.pace);
        let mut counters = SyncCounters::default();
        let mut changes = Vec::new();

        for season in seasons {
            counters.scanned += 1;
            let Some(title) = season.index.and_then(|n| desired.get(&n)) else {
                continue;
            };
            counters.derived += 1;

            let result = dispatcher.apply(&season, title, opts.dry_run).await;
            dispatch::record(&mut counters, &mut changes, &season, title, result);
        }

        Ok(SeasonReport {
            section_id: opts.section_id.clone(),
            show_id: show.id,
            dry_run: opts.dry_run,
            counters,
            changes,
        })
    }
}
