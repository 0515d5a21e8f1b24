pub mod connection;
pub mod entities;
pub mod error;
pub mod stores;

pub use error::{StoreError, StoreResult};
pub use stores::{
    KeyValueStore, MemoryStore, RangeOrder, SetOptions, SortedSetEntry, SqlStore,
};
