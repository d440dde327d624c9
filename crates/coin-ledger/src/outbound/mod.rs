//! Driven adapters implementing [`KeyValueStore`](crate::ports::KeyValueStore).

mod file_store;
mod memory;

pub use file_store::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
