use blocker_types::BlobKey;
use sha1::{Digest, Sha1};

/// SHA-1 content hasher producing [`BlobKey`]s.
///
/// Use [`ContentHasher::digest`] for a whole buffer, or feed chunks through
/// [`update`](ContentHasher::update) and [`finalize`](ContentHasher::finalize)
/// when the data arrives incrementally. Both forms agree.
#[derive(Clone, Default)]
pub struct ContentHasher {
    inner: Sha1,
}

impl ContentHasher {
    /// Start an incremental digest.
    pub fn new() -> Self {
        Self { inner: Sha1::new() }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finish and return the key.
    pub fn finalize(self) -> BlobKey {
        BlobKey::from_digest(self.inner.finalize().into())
    }

    /// Digest a complete blob.
    pub fn digest(data: &[u8]) -> BlobKey {
        BlobKey::from_digest(Sha1::digest(data).into())
    }
}

impl std::fmt::Debug for ContentHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHasher").finish_non_exhaustive()
    }
}
