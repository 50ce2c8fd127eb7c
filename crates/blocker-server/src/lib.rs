//! HTTP server for Blocker.
//!
//! Clients `POST /blobs` with raw bytes and get back the content key;
//! `GET /blobs/{key}` returns the bytes after checking they still hash to
//! that key. Storage is any [`BlobStore`](blocker_store::BlobStore).

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod service;
pub mod state;

pub use config::ServerConfig;
pub use error::{BlobError, BlobResult, ServerError, ServerResult, ERROR_CODE_HEADER};
pub use handler::HealthResponse;
pub use router::build_router;
pub use server::BlockerServer;
pub use service::{BlobService, IngestOutcome, Ingested};
pub use state::AppState;
