use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use blocker_types::BlobKey;

/// Byte-bounded cache of recently read blobs.
///
/// Entries are evicted oldest-first until a new entry fits. A blob larger than
/// the whole budget is never cached. A budget of zero disables caching.
pub struct BlobCache {
    max_bytes: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<BlobKey, Vec<u8>>,
    order: VecDeque<BlobKey>,
    bytes: usize,
}

impl CacheInner {
    fn remove(&mut self, key: &BlobKey) -> bool {
        match self.entries.remove(key) {
            Some(data) => {
                self.bytes -= data.len();
                self.order.retain(|k| k != key);
                true
            }
            None => false,
        }
    }
}

impl BlobCache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn get(&self, key: &BlobKey) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .expect("lock poisoned")
            .entries
            .get(key)
            .cloned()
    }

    pub fn contains(&self, key: &BlobKey) -> bool {
        self.inner
            .lock()
            .expect("lock poisoned")
            .entries
            .contains_key(key)
    }

    /// Cache `data` under `key`. Returns `false` if it does not fit at all.
    pub fn insert(&self, key: BlobKey, data: Vec<u8>) -> bool {
        if data.len() > self.max_bytes {
            return false;
        }
        let mut inner = self.inner.lock().expect("lock poisoned");
        inner.remove(&key);
        while inner.bytes + data.len() > self.max_bytes {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            if let Some(evicted) = inner.entries.remove(&oldest) {
                inner.bytes -= evicted.len();
            }
        }
        inner.bytes += data.len();
        inner.order.push_back(key);
        inner.entries.insert(key, data);
        true
    }

    /// Drop the entry for `key`, if any.
    pub fn invalidate(&self, key: &BlobKey) -> bool {
        self.inner.lock().expect("lock poisoned").remove(key)
    }

    /// Bytes currently held.
    pub fn size(&self) -> usize {
        self.inner.lock().expect("lock poisoned").bytes
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

impl std::fmt::Debug for BlobCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobCache")
            .field("max_bytes", &self.max_bytes)
            .field("size", &self.size())
            .finish()
    }
}
