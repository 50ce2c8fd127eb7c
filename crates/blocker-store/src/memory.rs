use std::collections::HashMap;
use std::sync::RwLock;

use blocker_types::BlobKey;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs are held behind a `RwLock` for
/// safe concurrent access and cloned on read.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobKey, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn has(&self, key: &BlobKey) -> bool {
        self.blobs.read().expect("lock poisoned").contains_key(key)
    }

    fn read(&self, key: &BlobKey) -> StoreResult<Vec<u8>> {
        self.blobs
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or(StoreError::NotFound(*key))
    }

    fn write(&self, key: &BlobKey, data: &[u8]) -> StoreResult<()> {
        self.blobs
            .write()
            .expect("lock poisoned")
            .insert(*key, data.to_vec());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocker_crypto::ContentHasher;
    use std::sync::Arc;

    #[test]
    fn write_and_read() {
        let store = InMemoryBlobStore::new();
        let key = ContentHasher::digest(b"hello");
        store.write(&key, b"hello").unwrap();
        assert_eq!(store.read(&key).unwrap(), b"hello");
    }

    #[test]
    fn has_reflects_writes() {
        let store = InMemoryBlobStore::new();
        let key = ContentHasher::digest(b"x");
        assert!(!store.has(&key));
        store.write(&key, b"x").unwrap();
        assert!(store.has(&key));
    }

    #[test]
    fn read_missing_is_not_found() {
        let store = InMemoryBlobStore::new();
        let key = ContentHasher::digest(b"never written");
        let err = store.read(&key).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn write_replaces_existing() {
        let store = InMemoryBlobStore::new();
        let key = ContentHasher::digest(b"original");
        store.write(&key, b"original").unwrap();
        store.write(&key, b"foobar").unwrap();
        assert_eq!(store.read(&key).unwrap(), b"foobar");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn len_and_total_bytes() {
        let store = InMemoryBlobStore::new();
        assert!(store.is_empty());
        store.write(&ContentHasher::digest(b"abc"), b"abc").unwrap();
        store.write(&ContentHasher::digest(b"de"), b"de").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 5);
    }

    #[test]
    fn concurrent_writes() {
        let store = Arc::new(InMemoryBlobStore::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let data = vec![i; 64];
                    store.write(&ContentHasher::digest(&data), &data).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn debug_shows_count() {
        let store = InMemoryBlobStore::new();
        assert_eq!(format!("{store:?}"), "InMemoryBlobStore { blob_count: 0 }");
    }
}
