use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use maktabati_types::{BlobRecord, MetadataDocument};

use crate::entry::{BundleFile, BundleUpload};
use crate::error::{PackError, PackResult};

/// Bundle format version written by export.
pub const BUNDLE_VERSION: &str = "1.0";

/// A full backup: the metadata document, every attachment and every visitor
/// upload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub version: String,
    pub meta: MetadataDocument,
    #[serde(default)]
    pub files: Vec<BundleFile>,
    #[serde(default)]
    pub uploads: Vec<BundleUpload>,
}

impl Bundle {
    pub fn new(meta: MetadataDocument) -> Self {
        Self {
            version: BUNDLE_VERSION.to_string(),
            meta,
            files: Vec::new(),
            uploads: Vec::new(),
        }
    }

    pub fn to_json(&self) -> PackResult<String> {
        serde_json::to_string(self).map_err(|e| PackError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> PackResult<Self> {
        serde_json::from_str(json).map_err(|e| PackError::Malformed(e.to_string()))
    }

    /// Check everything import depends on and decode the attachments.
    ///
    /// Rejects an unknown version, blank or duplicate file ids and any file
    /// whose data is not valid base64. Nothing is written anywhere.
    pub fn validate(&self) -> PackResult<Vec<BlobRecord>> {
        if self.version != BUNDLE_VERSION {
            return Err(PackError::UnsupportedVersion(self.version.clone()));
        }
        let mut seen = HashSet::with_capacity(self.files.len());
        let mut records = Vec::with_capacity(self.files.len());
        for file in &self.files {
            if file.id.as_str().trim().is_empty() {
                return Err(PackError::BlankFileId);
            }
            if !seen.insert(file.id.as_str()) {
                return Err(PackError::DuplicateFile(file.id.to_string()));
            }
            records.push(file.to_record()?);
        }
        Ok(records)
    }
}
