//! Offline asset cache for Maktabati.
//!
//! Keeps the application shell usable without a network. A
//! [`CacheManifest`] names a versioned bucket and the assets that belong in
//! it. [`OfflineCache`] runs the lifecycle over a pluggable [`Network`]:
//!
//! - **install**: fetch every manifest asset and store them all, or nothing;
//! - **activate**: drop every bucket from other versions;
//! - **fetch**: cache-first, falling back to the network and caching
//!   successful same-origin `GET` responses.
//!
//! # Key Types
//!
//! - [`OfflineCache`] - The lifecycle driver
//! - [`CacheStorage`] - Named buckets of request→response pairs
//! - [`Network`] - Async trait for the real fetch
//! - [`Request`] / [`Response`] - The minimal HTTP model the policy needs

pub mod error;
pub mod http;
pub mod manifest;
pub mod network;
pub mod offline;
pub mod storage;

pub use error::{CacheError, CacheResult};
pub use http::{Request, Response, ResponseKind, APP_ORIGIN};
pub use manifest::{CacheManifest, DEFAULT_ASSETS, DEFAULT_CACHE_VERSION};
pub use network::Network;
pub use offline::OfflineCache;
pub use storage::{Bucket, CacheStorage};
