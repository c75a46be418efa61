//! Cache infrastructure - backing stores and the TTL cache store

mod factory;
mod file;
mod in_memory;
mod redis;
mod store;

pub use factory::{BackingStoreConfig, BackingStoreFactory, BackingStoreType};
pub use file::{FileBackingStore, FileBackingStoreConfig};
pub use in_memory::InMemoryBackingStore;
pub use self::redis::{RedisBackingStore, RedisBackingStoreConfig};
pub use store::{CacheStore, CacheStoreConfig};
