//! Foundation types for Maktabati.
//!
//! This crate provides the data model shared by every other Maktabati crate:
//! the content tree, the records kept by the stores, and the single metadata
//! document that is persisted wholesale on every edit.
//!
//! # Key Types
//!
//! - [`Id`] - App-generated, time-ordered identifier (prefixed UUID v7)
//! - [`Category`] / [`Item`] - Content tree nodes
//! - [`AttachmentRef`] - Pointer from an item into the blob store
//! - [`BlobRecord`] - File bytes plus display metadata, keyed by [`Id`]
//! - [`UploadRecord`] - A visitor message with optional attachments
//! - [`MetadataDocument`] - The whole tree, password record and settings

pub mod error;
pub mod id;
pub mod meta;
pub mod record;
pub mod tree;

pub use error::TypeError;
pub use id::{Id, IdKind};
pub use meta::{MetadataDocument, PasswordRecord};
pub use record::{BlobRecord, KeyedUpload, UploadRecord, DEFAULT_VISITOR_NAME};
pub use tree::{AttachmentRef, Category, Item};
