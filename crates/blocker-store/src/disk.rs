use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use blocker_types::{BlobKey, MAX_BLOB_SIZE};
use tempfile::NamedTempFile;

use crate::cache::BlobCache;
use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// Tuning for [`DiskBlobStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskStoreOptions {
    /// Characters of the key consumed by each directory level.
    pub shard_width: usize,
    /// Read cache budget in bytes. Zero disables caching.
    pub cache_size_max: usize,
}

impl Default for DiskStoreOptions {
    fn default() -> Self {
        Self {
            shard_width: 2,
            cache_size_max: MAX_BLOB_SIZE,
        }
    }
}

/// Filesystem-backed blob store.
///
/// A key is split into consecutive `shard_width`-character chunks, each chunk
/// becoming one directory level, and the blob is stored in a file named by the
/// full key. With the default width of 2:
///
/// ```text
/// root/qZ/k-/Nk/cG/gW/q6/Pi/Vx/eF/DC/bJ/zQ/2J/0=/qZk-NkcGgWq6PiVxeFDCbJzQ2J0=
/// ```
///
/// Writes go through a temp file in the destination directory that is
/// fsynced and then renamed into place. Reads populate a byte-bounded
/// [`BlobCache`]; writes invalidate it.
pub struct DiskBlobStore {
    root: PathBuf,
    shard_width: usize,
    cache: BlobCache,
}

impl DiskBlobStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, options: DiskStoreOptions) -> StoreResult<Self> {
        let root = root.into();
        if options.shard_width == 0 {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "shard width must be at least 1",
            )));
        }
        fs::create_dir_all(&root)?;
        tracing::debug!(
            root = %root.display(),
            shard_width = options.shard_width,
            cache_size_max = options.cache_size_max,
            "opened disk blob store"
        );
        Ok(Self {
            root,
            shard_width: options.shard_width,
            cache: BlobCache::new(options.cache_size_max),
        })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The read cache.
    pub fn cache(&self) -> &BlobCache {
        &self.cache
    }

    /// Where the blob for `key` lives on disk.
    pub fn path_for(&self, key: &BlobKey) -> PathBuf {
        let name = key.to_string();
        let mut path = self.root.clone();
        // Key text is ASCII, so byte chunks are char chunks
        for chunk in name.as_bytes().chunks_exact(self.shard_width) {
            path.push(std::str::from_utf8(chunk).unwrap_or_default());
        }
        path.push(&name);
        path
    }
}

impl BlobStore for DiskBlobStore {
    fn has(&self, key: &BlobKey) -> bool {
        self.cache.contains(key) || self.path_for(key).is_file()
    }

    fn read(&self, key: &BlobKey) -> StoreResult<Vec<u8>> {
        if let Some(data) = self.cache.get(key) {
            return Ok(data);
        }
        let data = fs::read(self.path_for(key)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(*key),
            _ => StoreError::Io(e),
        })?;
        self.cache.insert(*key, data.clone());
        Ok(data)
    }

    fn write(&self, key: &BlobKey, data: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key);
        let dir = path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        self.cache.invalidate(key);
        tracing::trace!(key = %key.short(), bytes = data.len(), "wrote blob file");
        Ok(())
    }
}

impl std::fmt::Debug for DiskBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskBlobStore")
            .field("root", &self.root)
            .field("shard_width", &self.shard_width)
            .field("cache", &self.cache)
            .finish()
    }
}
