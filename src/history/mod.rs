//! スキャン履歴

pub mod persistence;
pub mod store;

pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use store::{HistoryStore, HISTORY_KEY};
