//! Cache domain - query response caching abstractions

mod clock;
mod entry;
mod key;
mod repository;

pub use clock::{Clock, SystemClock};
pub use entry::CacheEntry;
pub use key::{namespaced, normalize_query};
pub use repository::{BackingStore, ScanPage};

pub(crate) use repository::page_bounds;

#[cfg(test)]
pub use clock::mock::ManualClock;
#[cfg(test)]
pub use repository::mock::MockBackingStore;
