use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running totals for a single sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCounters {
    pub scanned: usize,
    pub matched_root: usize,
    pub derived: usize,
    pub updated: usize,
    pub skipped_already_correct: usize,
    pub skipped_empty_title: usize,
    pub skipped_over_limit: usize,
    pub failed: usize,
}

/// A title change that was planned (dry run) or performed (apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedChange {
    pub id: String,
    pub old_title: String,
    pub new_title: String,
}

/// Terminal report of an episode sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub section_id: String,
    pub dry_run: bool,
    pub counters: SyncCounters,
    pub changes: Vec<PlannedChange>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    /// True when at least one item could not be updated.
    pub fn has_failures(&self) -> bool {
        self.counters.failed > 0
    }
}

/// Terminal report of a season title run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub section_id: String,
    pub show_id: String,
    pub dry_run: bool,
    pub counters: SyncCounters,
    pub changes: Vec<PlannedChange>,
}

impl SeasonReport {
    pub fn has_failures(&self) -> bool {
        self.counters.failed > 0
    }
}
