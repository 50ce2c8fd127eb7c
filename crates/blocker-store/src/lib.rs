//! Blob storage backends for Blocker.
//!
//! This crate is the seam between the content-addressing core and whatever
//! actually persists bytes. The core sees only the three operations of
//! [`BlobStore`]: `has`, `read`, and `write`. Sharding, caching, and durability
//! are each backend's own business.
//!
//! # Storage Backends
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`DiskBlobStore`] -- directory-sharded files with a bounded read cache
//!
//! # Design Rules
//!
//! 1. A store files bytes under the key it is given; it never recomputes digests.
//! 2. `write` is atomic: after it returns, a reader sees the complete blob.
//! 3. All operations are safe to call concurrently.
//! 4. All I/O errors are propagated, never silently ignored (except by `has`,
//!    which answers "not present").

pub mod cache;
pub mod disk;
pub mod error;
pub mod memory;
pub mod traits;

pub use cache::BlobCache;
pub use disk::{DiskBlobStore, DiskStoreOptions};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
