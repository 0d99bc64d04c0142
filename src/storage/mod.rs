mod memory_store;
mod sqlite_store;

pub use memory_store::InMemoryKeyValueStore;
pub use sqlite_store::SqliteKeyValueStore;

use anyhow::Result;

/// Raw key/value persistence used for whole-collection snapshots.
///
/// The persisted layout is two independently keyed blobs (profiles and
/// playlists), each rewritten in full on every mutation, so the store only
/// needs get/set/delete by key.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or None if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Deletes the blob under `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}
