//! Foundation types for Blocker.
//!
//! Every blob in Blocker is addressed by the digest of its own bytes. This
//! crate defines that address ([`BlobKey`]) and the size bound every ingested
//! blob must respect. Other Blocker crates depend on `blocker-types`.
//!
//! # Key Types
//!
//! - [`BlobKey`] -- 160-bit content digest rendered as padded URL-safe base64
//! - [`MAX_BLOB_SIZE`] -- upper bound on a single blob, in bytes

pub mod error;
pub mod key;

pub use error::TypeError;
pub use key::{BlobKey, KEY_BYTES, KEY_LEN};

/// Largest blob, in bytes, that the ingest path accepts (64 MiB).
pub const MAX_BLOB_SIZE: usize = 64 * 1024 * 1024;
