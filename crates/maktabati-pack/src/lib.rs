//! Backup bundles for Maktabati.
//!
//! A full backup is one JSON document:
//!
//! ```json
//! { "version": "1.0", "meta": { ... }, "files": [{"id", "name", "type", "data"}], "uploads": [...] }
//! ```
//!
//! File bytes travel as standard base64. Upload keys are exported for
//! reference but reassigned on import.
//!
//! # Key Types
//!
//! - [`Bundle`] - The full backup document
//! - [`export_bundle`] / [`import_bundle`] - Whole-library backup and restore
//! - [`export_meta`] / [`import_meta`] - Metadata-only backup and restore
//! - [`ImportReport`] - Counts of what an import restored

pub mod bundle;
pub mod entry;
pub mod error;
pub mod reader;
pub mod writer;

pub use bundle::{Bundle, BUNDLE_VERSION};
pub use entry::{BundleFile, BundleUpload};
pub use error::{PackError, PackResult};
pub use reader::{import_bundle, import_meta, ImportReport, Imported};
pub use writer::{backup_file_name, export_bundle, export_json, export_meta, META_BACKUP_FILE_NAME};
