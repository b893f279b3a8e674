//! Import side.

use serde::Serialize;

use maktabati_store::{BlobStore, UploadLog};
use maktabati_types::MetadataDocument;

use crate::bundle::Bundle;
use crate::error::{PackError, PackResult};

/// What an import restored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub files: usize,
    pub uploads: usize,
    pub categories: usize,
}

/// Result of a full import: the document to install plus the counts.
#[derive(Debug)]
pub struct Imported {
    pub meta: MetadataDocument,
    pub report: ImportReport,
}

/// Replace both stores with the contents of a JSON bundle.
///
/// The whole bundle is parsed and validated first; a malformed bundle
/// returns an error with the stores untouched. After that both stores are
/// wiped, every file is re-inserted under its original id and every upload
/// is appended under a fresh key. A storage failure past the wipe is
/// returned as is; there is no rollback.
///
/// The returned document has not been persisted. The caller installs it.
pub fn import_bundle(json: &str, blobs: &dyn BlobStore, uploads: &dyn UploadLog) -> PackResult<Imported> {
    let bundle = Bundle::from_json(json)?;
    let records = bundle.validate()?;

    blobs.clear()?;
    uploads.clear()?;
    for record in &records {
        blobs.put(record)?;
    }
    for upload in &bundle.uploads {
        uploads.append(&upload.record)?;
    }

    let report = ImportReport {
        files: records.len(),
        uploads: bundle.uploads.len(),
        categories: bundle.meta.types.len(),
    };
    tracing::info!(
        files = report.files,
        uploads = report.uploads,
        categories = report.categories,
        "bundle imported"
    );
    Ok(Imported {
        meta: bundle.meta,
        report,
    })
}

/// Parse a metadata-only backup. The caller replaces its document with the
/// result wholesale.
pub fn import_meta(json: &str) -> PackResult<MetadataDocument> {
    MetadataDocument::from_json(json).map_err(|e| PackError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::export_json;
    use maktabati_store::{FsBlobStore, InMemoryBlobStore, InMemoryUploadLog};
    use maktabati_types::{AttachmentRef, BlobRecord, Id, Item, UploadRecord};

    fn populated() -> (MetadataDocument, InMemoryBlobStore, InMemoryUploadLog) {
        let blobs = InMemoryBlobStore::new();
        let log = InMemoryUploadLog::new();
        let mut meta = MetadataDocument::seeded();

        let record = BlobRecord::new(Id::from_static("f-law"), "law.pdf", "application/pdf", vec![7; 64]);
        blobs.put(&record).unwrap();
        meta.types[0].items[0].files.push(record.to_attachment_ref());

        let visitor = BlobRecord::new(Id::from_static("u-note"), "note.txt", "text/plain", b"note".to_vec());
        blobs.put(&visitor).unwrap();
        log.append(&UploadRecord::new("", "hello", vec![visitor.to_attachment_ref()]))
            .unwrap();
        log.append(&UploadRecord::new("Huda", "second", vec![])).unwrap();
        (meta, blobs, log)
    }

    #[test]
    fn round_trip_is_lossless() {
        let (meta, blobs, log) = populated();
        let json = export_json(&meta, &blobs, &log).unwrap();

        let blobs2 = InMemoryBlobStore::new();
        let log2 = InMemoryUploadLog::new();
        let imported = import_bundle(&json, &blobs2, &log2).unwrap();

        assert_eq!(imported.meta, meta);
        assert_eq!(imported.report, ImportReport { files: 2, uploads: 2, categories: 1 });

        let mut before = blobs.all().unwrap();
        let mut after = blobs2.all().unwrap();
        before.sort_by(|a, b| a.id.cmp(&b.id));
        after.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(before, after);

        let records = |l: &InMemoryUploadLog| -> Vec<UploadRecord> {
            l.list().unwrap().into_iter().map(|u| u.record).collect()
        };
        assert_eq!(records(&log), records(&log2));
    }

    #[test]
    fn import_replaces_existing_data() {
        let (meta, blobs, log) = populated();
        let json = export_json(&meta, &blobs, &log).unwrap();

        let target_blobs = InMemoryBlobStore::new();
        target_blobs
            .put(&BlobRecord::new(Id::from_static("f-stale"), "old", "text/plain", vec![1]))
            .unwrap();
        let target_log = InMemoryUploadLog::new();
        target_log.append(&UploadRecord::new("old", "old", vec![])).unwrap();

        import_bundle(&json, &target_blobs, &target_log).unwrap();
        assert!(target_blobs.get("f-stale").unwrap().is_none());
        assert_eq!(target_log.len().unwrap(), 2);
    }

    #[test]
    fn upload_keys_are_reassigned() {
        let json = r#"{
            "version": "1.0",
            "meta": {"password": null, "types": [], "uploads": []},
            "files": [],
            "uploads": [{"key": 3, "name": "A", "message": "m", "files": [], "date": "2024-01-01T00:00:00.000Z"}]
        }"#;
        let blobs = InMemoryBlobStore::new();
        let log = InMemoryUploadLog::new();
        import_bundle(json, &blobs, &log).unwrap();
        let listed = log.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].key.as_str().starts_with("msg-"));
        assert_eq!(listed[0].record.date, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn malformed_bundle_leaves_stores_untouched() {
        let (meta, blobs, log) = populated();
        let good = export_json(&meta, &blobs, &log).unwrap();
        let mut bundle: serde_json::Value = serde_json::from_str(&good).unwrap();
        bundle["files"][1]["data"] = serde_json::Value::String("not base64!".into());
        let bad = bundle.to_string();

        let err = import_bundle(&bad, &blobs, &log).unwrap_err();
        assert!(matches!(err, PackError::InvalidFileData { .. }));
        assert_eq!(blobs.all().unwrap().len(), 2);
        assert_eq!(log.len().unwrap(), 2);

        assert!(import_bundle("{", &blobs, &log).is_err());
        assert_eq!(blobs.all().unwrap().len(), 2);
    }

    #[test]
    fn long_file_ids_import_into_a_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = FsBlobStore::open(dir.path()).unwrap();
        blobs
            .put(&BlobRecord::new(Id::from_static("f-existing"), "old", "text/plain", vec![1]))
            .unwrap();

        let long = "f".repeat(200);
        let json = format!(
            r#"{{"version":"1.0","meta":{{"types":[]}},"files":[{{"id":"{long}","name":"a","type":"text/plain","data":"AAEC"}}]}}"#
        );
        let log = InMemoryUploadLog::new();
        let imported = import_bundle(&json, &blobs, &log).unwrap();
        assert_eq!(imported.report.files, 1);
        assert!(blobs.get("f-existing").unwrap().is_none());
        assert_eq!(blobs.get(&long).unwrap().unwrap().data, vec![0, 1, 2]);
        assert_eq!(blobs.all().unwrap().len(), 1);
    }

    #[test]
    fn blank_file_id_leaves_stores_untouched() {
        let (_, blobs, log) = populated();
        let json = r#"{"version":"1.0","meta":{"types":[]},"files":[{"id":"","name":"a","type":"text/plain","data":"AA=="}]}"#;
        assert!(matches!(import_bundle(json, &blobs, &log), Err(PackError::BlankFileId)));
        assert_eq!(blobs.all().unwrap().len(), 2);
        assert_eq!(log.len().unwrap(), 2);
    }

    #[test]
    fn import_meta_replaces_document() {
        let mut meta = MetadataDocument::seeded();
        meta.types[0].items.push(Item::with_id(Id::from_static("x"), "X", "<p>x</p>"));
        meta.types[0].items[1]
            .files
            .push(AttachmentRef::new(Id::from_static("f-x"), "x.txt", 1, "text/plain"));
        let json = meta.to_json().unwrap();
        assert_eq!(import_meta(&json).unwrap(), meta);
        assert!(matches!(import_meta("42"), Err(PackError::Malformed(_))));
    }
}
