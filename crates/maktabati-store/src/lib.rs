//! Storage backends for Maktabati.
//!
//! Three flat stores sit underneath the content library:
//!
//! - [`BlobStore`] - attachment bytes keyed by caller-supplied ids. Library
//!   attachments and visitor attachments share one namespace.
//! - [`UploadLog`] - append-only log of visitor messages; the log assigns keys.
//! - [`KeyValueStore`] - synchronous string storage for the metadata document
//!   and the admin session flag.
//!
//! # Storage Backends
//!
//! - [`InMemoryBlobStore`], [`InMemoryUploadLog`], [`InMemoryKeyValueStore`]
//!   - lock-guarded maps for tests, embedding and session-scoped state
//! - [`FsBlobStore`], [`FsUploadLog`], [`FsKeyValueStore`] - directory-backed,
//!   every write lands through a temp file and an atomic rename
//!
//! # Design Rules
//!
//! 1. Write-then-link: callers store a blob before pushing its ref into the tree.
//! 2. The stores never interpret the content tree; they are pure key-value stores.
//! 3. Missing keys are `Ok(None)` / `Ok(false)`, never errors.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::{FsBlobStore, FsKeyValueStore, FsUploadLog};
pub use memory::{InMemoryBlobStore, InMemoryKeyValueStore, InMemoryUploadLog};
pub use traits::{BlobStore, KeyValueStore, UploadLog};
