pub mod catalog;
pub mod sync;

pub use catalog::{CatalogItem, CatalogPage, ItemKind, Section};
pub use sync::{PlannedChange, SeasonReport, SyncCounters, SyncReport};
