pub mod dispatch;
pub mod enumerate;
pub mod error;
pub mod path;
pub mod plex;
pub mod seasons;
pub mod sync;
pub mod title;
pub mod traits;

#[cfg(test)]
mod testing;

pub use dispatch::{Dispatcher, Outcome};
pub use enumerate::Enumerator;
pub use error::{Result, RetitleError};
pub use seasons::{SeasonOptions, SeasonSync};
pub use sync::{SyncDriver, SyncOptions};
pub use traits::{find_section, Catalog};
