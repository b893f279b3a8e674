//! Export side.

use chrono::NaiveDate;

use maktabati_store::{BlobStore, UploadLog};
use maktabati_types::MetadataDocument;

use crate::bundle::Bundle;
use crate::entry::{BundleFile, BundleUpload};
use crate::error::{PackError, PackResult};

/// Default file name for a metadata-only backup.
pub const META_BACKUP_FILE_NAME: &str = "meta_backup.json";

/// Default file name for a full backup taken on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("full_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Snapshot the document and both stores into a bundle.
pub fn export_bundle(
    meta: &MetadataDocument,
    blobs: &dyn BlobStore,
    uploads: &dyn UploadLog,
) -> PackResult<Bundle> {
    let mut bundle = Bundle::new(meta.clone());
    bundle.files = blobs.all()?.iter().map(BundleFile::from_record).collect();
    bundle.uploads = uploads.list()?.into_iter().map(BundleUpload::from).collect();
    tracing::info!(
        files = bundle.files.len(),
        uploads = bundle.uploads.len(),
        "bundle exported"
    );
    Ok(bundle)
}

/// [`export_bundle`] serialized to JSON.
pub fn export_json(
    meta: &MetadataDocument,
    blobs: &dyn BlobStore,
    uploads: &dyn UploadLog,
) -> PackResult<String> {
    export_bundle(meta, blobs, uploads)?.to_json()
}

/// The metadata document alone, as JSON.
pub fn export_meta(meta: &MetadataDocument) -> PackResult<String> {
    meta.to_json().map_err(|e| PackError::Serialization(e.to_string()))
}
