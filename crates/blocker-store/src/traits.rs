use blocker_types::BlobKey;

use crate::error::StoreResult;

/// Key-to-bytes mapping backing the blob service.
///
/// All implementations must satisfy these invariants:
/// - Every method is safe to call from many threads at once.
/// - Once `write` returns `Ok`, subsequent `has` and `read` calls for that
///   key observe the written bytes.
/// - A failed or interrupted `write` leaves either nothing or the complete
///   previous state under the key, never a partial blob.
/// - The store does not check that bytes hash to their key; that is the
///   caller's job on read.
pub trait BlobStore: Send + Sync {
    /// Whether anything is filed under `key`.
    ///
    /// Never fails: an error while checking is reported as `false`.
    fn has(&self, key: &BlobKey) -> bool;

    /// Read the bytes filed under `key`.
    ///
    /// Returns `Err(StoreError::NotFound)` if nothing is filed there and
    /// `Err(StoreError::Io)` on any other failure.
    fn read(&self, key: &BlobKey) -> StoreResult<Vec<u8>>;

    /// File `data` under `key`, replacing anything already there.
    fn write(&self, key: &BlobKey, data: &[u8]) -> StoreResult<()>;
}
