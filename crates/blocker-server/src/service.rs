use std::sync::Arc;

use blocker_crypto::ContentHasher;
use blocker_store::{BlobStore, StoreError};
use blocker_types::{BlobKey, MAX_BLOB_SIZE};

use crate::error::{BlobError, BlobResult};

/// Whether an ingest stored new bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First time this content was seen; it was written.
    Created,
    /// The key already existed; nothing was written.
    Existing,
}

/// Result of a successful ingest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ingested {
    pub key: BlobKey,
    pub outcome: IngestOutcome,
}

/// Content-addressed ingest and verified retrieval over a [`BlobStore`].
///
/// Holds no mutable state of its own; cloning shares the store handle.
/// Concurrent ingests of identical bytes may both write, which is harmless
/// because both writes carry the same bytes under the same key.
#[derive(Clone)]
pub struct BlobService {
    store: Arc<dyn BlobStore>,
    max_blob_size: usize,
}

impl BlobService {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            max_blob_size: MAX_BLOB_SIZE,
        }
    }

    /// Override the size bound (mostly for tests and small deployments).
    pub fn with_max_blob_size(mut self, max_blob_size: usize) -> Self {
        self.max_blob_size = max_blob_size;
        self
    }

    pub fn max_blob_size(&self) -> usize {
        self.max_blob_size
    }

    /// Store `body` under its digest unless that digest is already present.
    ///
    /// A dedup hit trusts the stored copy without re-reading it; corruption
    /// is only detected on retrieval.
    pub fn ingest(&self, body: &[u8]) -> BlobResult<Ingested> {
        if body.len() > self.max_blob_size {
            tracing::debug!(size = body.len(), max = self.max_blob_size, "blob too large");
            return Err(BlobError::PayloadTooLarge {
                max: self.max_blob_size,
            });
        }
        if body.is_empty() {
            return Err(BlobError::EmptyBlob);
        }

        let key = ContentHasher::digest(body);
        if self.store.has(&key) {
            tracing::debug!(key = %key.short(), size = body.len(), "dedup hit");
            return Ok(Ingested {
                key,
                outcome: IngestOutcome::Existing,
            });
        }

        self.store.write(&key, body).map_err(BlobError::Storage)?;
        tracing::info!(key = %key.short(), size = body.len(), "stored blob");
        Ok(Ingested {
            key,
            outcome: IngestOutcome::Created,
        })
    }

    /// Fetch the bytes filed under `key` and check they hash back to it.
    ///
    /// A key that cannot be a digest is reported as not found without
    /// consulting the store. Mismatched bytes are never returned.
    pub fn retrieve(&self, key: Option<&str>) -> BlobResult<Vec<u8>> {
        let raw = match key {
            Some(k) if !k.is_empty() => k,
            _ => return Err(BlobError::MissingKey),
        };
        let key = BlobKey::parse(raw).map_err(|_| BlobError::NotFound(raw.to_string()))?;

        let data = self.store.read(&key).map_err(|e| match e {
            StoreError::NotFound(k) => BlobError::NotFound(k.to_string()),
            other => BlobError::Storage(other),
        })?;

        let computed = ContentHasher::digest(&data);
        if computed != key {
            tracing::error!(
                integrity = true,
                key = %key,
                computed = %computed,
                size = data.len(),
                "stored bytes do not match their key"
            );
            return Err(BlobError::Integrity {
                key: key.to_string(),
                computed: computed.to_string(),
            });
        }
        Ok(data)
    }
}

impl std::fmt::Debug for BlobService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobService")
            .field("max_blob_size", &self.max_blob_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocker_store::{InMemoryBlobStore, StoreResult};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> (Arc<InMemoryBlobStore>, BlobService) {
        let store = Arc::new(InMemoryBlobStore::new());
        let service = BlobService::new(store.clone());
        (store, service)
    }

    /// Counts calls and can be told to fail.
    #[derive(Default)]
    struct ProbeStore {
        inner: InMemoryBlobStore,
        fail_writes: bool,
        fail_reads: bool,
        calls: AtomicUsize,
    }

    impl BlobStore for ProbeStore {
        fn has(&self, key: &BlobKey) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.has(key)
        }

        fn read(&self, key: &BlobKey) -> StoreResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads {
                return Err(StoreError::Io(std::io::Error::other("bad sector")));
            }
            self.inner.read(key)
        }

        fn write(&self, key: &BlobKey, data: &[u8]) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.write(key, data)
        }
    }

    #[test]
    fn ingest_then_retrieve() {
        let (_, svc) = service();
        let ingested = svc.ingest(b"hello blocker").unwrap();
        assert_eq!(ingested.outcome, IngestOutcome::Created);
        assert_eq!(ingested.key, ContentHasher::digest(b"hello blocker"));
        let data = svc.retrieve(Some(&ingested.key.to_string())).unwrap();
        assert_eq!(data, b"hello blocker");
    }

    #[test]
    fn second_ingest_is_dedup_hit() {
        let (store, svc) = service();
        let first = svc.ingest(b"same bytes").unwrap();
        let second = svc.ingest(b"same bytes").unwrap();
        assert_eq!(first.key, second.key);
        assert_eq!(first.outcome, IngestOutcome::Created);
        assert_eq!(second.outcome, IngestOutcome::Existing);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn size_boundary() {
        let (_, svc) = service();
        let svc = svc.with_max_blob_size(16);
        assert!(svc.ingest(&[7u8; 16]).is_ok());
        let err = svc.ingest(&[7u8; 17]).unwrap_err();
        assert!(matches!(err, BlobError::PayloadTooLarge { max: 16 }));
    }

    #[test]
    fn oversized_blob_never_touches_store() {
        let probe = Arc::new(ProbeStore::default());
        let svc = BlobService::new(probe.clone()).with_max_blob_size(4);
        assert!(svc.ingest(b"too big").is_err());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_blob_rejected() {
        let (store, svc) = service();
        assert!(matches!(svc.ingest(b"").unwrap_err(), BlobError::EmptyBlob));
        assert!(store.is_empty());
    }

    #[test]
    fn failed_write_is_storage_error() {
        let probe = Arc::new(ProbeStore {
            fail_writes: true,
            ..Default::default()
        });
        let svc = BlobService::new(probe.clone());
        let err = svc.ingest(b"doomed").unwrap_err();
        assert!(matches!(err, BlobError::Storage(_)));
        assert!(!probe.inner.has(&ContentHasher::digest(b"doomed")));
    }

    #[test]
    fn missing_key_never_touches_store() {
        let probe = Arc::new(ProbeStore::default());
        let svc = BlobService::new(probe.clone());
        assert!(matches!(svc.retrieve(None).unwrap_err(), BlobError::MissingKey));
        assert!(matches!(svc.retrieve(Some("")).unwrap_err(), BlobError::MissingKey));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_key_is_not_found() {
        let (_, svc) = service();
        let key = ContentHasher::digest(b"never written").to_string();
        let err = svc.retrieve(Some(&key)).unwrap_err();
        assert!(matches!(err, BlobError::NotFound(k) if k == key));
    }

    #[test]
    fn malformed_key_is_not_found_without_store_access() {
        let probe = Arc::new(ProbeStore::default());
        let svc = BlobService::new(probe.clone());
        let err = svc.retrieve(Some("AAECAwQFBgc=")).unwrap_err();
        assert!(matches!(err, BlobError::NotFound(_)));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn read_failure_is_storage_error() {
        let probe = Arc::new(ProbeStore {
            fail_reads: true,
            ..Default::default()
        });
        let svc = BlobService::new(probe);
        let key = ContentHasher::digest(b"anything").to_string();
        assert!(matches!(
            svc.retrieve(Some(&key)).unwrap_err(),
            BlobError::Storage(_)
        ));
    }

    #[test]
    fn corruption_detected_on_read() {
        let (store, svc) = service();
        let key = svc.ingest(b"pristine").unwrap().key;
        store.write(&key, b"foobar").unwrap();
        let err = svc.retrieve(Some(&key.to_string())).unwrap_err();
        match err {
            BlobError::Integrity { key: k, computed } => {
                assert_eq!(k, key.to_string());
                assert_eq!(computed, ContentHasher::digest(b"foobar").to_string());
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn dedup_hit_does_not_reverify() {
        let (store, svc) = service();
        let key = svc.ingest(b"pristine").unwrap().key;
        store.write(&key, b"foobar").unwrap();
        let again = svc.ingest(b"pristine").unwrap();
        assert_eq!(again.outcome, IngestOutcome::Existing);
        assert_eq!(store.read(&key).unwrap(), b"foobar");
    }

    #[test]
    fn concurrent_identical_ingests_agree() {
        let (store, svc) = service();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let svc = svc.clone();
                std::thread::spawn(move || svc.ingest(b"contended").unwrap().key)
            })
            .collect();
        let keys: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(keys.iter().all(|k| *k == keys[0]));
        assert_eq!(store.len(), 1);
        assert_eq!(svc.retrieve(Some(&keys[0].to_string())).unwrap(), b"contended");
    }

    proptest! {
        #[test]
        fn round_trip(data in proptest::collection::vec(any::<u8>(), 1..4096)) {
            let (_, svc) = service();
            let svc = svc.with_max_blob_size(4096);
            let key = svc.ingest(&data).unwrap().key;
            prop_assert_eq!(svc.retrieve(Some(&key.to_string())).unwrap(), data);
        }
    }
}
