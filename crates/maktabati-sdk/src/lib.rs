//! High-level library API for Maktabati.
//!
//! [`Library`] is the one handle an application holds. It owns the metadata
//! document, the three stores and the admin gate, and exposes every reader,
//! editor, inbox and backup command as a method returning [`SdkResult`].
//!
//! # Example
//!
//! ```rust
//! use maktabati_sdk::{Library, Submission};
//!
//! let mut lib = Library::in_memory().unwrap();
//! lib.login("").unwrap(); // no password yet: open access
//! let item = lib.add_item("t1", "Article 2", "<p>Working hours</p>").unwrap().unwrap();
//! assert_eq!(lib.search("hours")[0].item_id, item);
//!
//! lib.submit_upload(Submission::new("Sara", "A question")).unwrap();
//! assert_eq!(lib.list_uploads().unwrap().len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod library;
pub mod request;

pub use config::{LibraryConfig, CONFIG_FILE_NAME};
pub use error::{SdkError, SdkResult};
pub use library::{
    DeleteReport, Library, Stores, DEFAULT_CATEGORY_ICON, DEFAULT_CATEGORY_NAME, DEFAULT_ITEM_NAME,
};
pub use request::{ChildEntry, NewFile, NodeView, Submission};

// Re-export the types callers handle directly.
pub use maktabati_cache::CacheManifest;
pub use maktabati_gate::LoginOutcome;
pub use maktabati_index::{highlight, NodeEdit, NodeKind, OutlineEntry, SearchHit};
pub use maktabati_pack::{backup_file_name, Bundle, ImportReport, META_BACKUP_FILE_NAME};
pub use maktabati_types::{AttachmentRef, BlobRecord, Category, Id, Item, KeyedUpload, MetadataDocument};
