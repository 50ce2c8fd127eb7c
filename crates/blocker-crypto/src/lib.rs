//! Content digest for Blocker.
//!
//! Maps any byte sequence to its [`BlobKey`](blocker_types::BlobKey). The
//! same function is used on ingest and on retrieval, which is what makes
//! read-side integrity checks meaningful.
//!
//! All hashing wraps an established library; no custom cryptography.

pub mod hasher;

pub use hasher::ContentHasher;
