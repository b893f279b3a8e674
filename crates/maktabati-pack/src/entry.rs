use serde::{Deserialize, Serialize};

use maktabati_crypto::{decode_b64, encode_b64};
use maktabati_types::{BlobRecord, Id, KeyedUpload, UploadRecord};

use crate::error::{PackError, PackResult};

/// One attachment inside a bundle, bytes as standard base64.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleFile {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime: String,
    pub data: String,
}

impl BundleFile {
    pub fn from_record(record: &BlobRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            mime: record.mime.clone(),
            data: encode_b64(&record.data),
        }
    }

    /// Decode back into a storable record.
    pub fn to_record(&self) -> PackResult<BlobRecord> {
        let data = decode_b64(&self.data).map_err(|e| PackError::InvalidFileData {
            id: self.id.to_string(),
            reason: e.to_string(),
        })?;
        Ok(BlobRecord::new(self.id.clone(), self.name.clone(), self.mime.clone(), data))
    }
}

/// A visitor upload inside a bundle.
///
/// `key` is informational: import always lets the log assign a fresh one.
/// Any JSON value is accepted there because other exporters used numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BundleUpload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<serde_json::Value>,
    #[serde(flatten)]
    pub record: UploadRecord,
}

impl From<KeyedUpload> for BundleUpload {
    fn from(upload: KeyedUpload) -> Self {
        Self {
            key: Some(serde_json::Value::String(upload.key.into_string())),
            record: upload.record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_wire_shape() {
        let record = BlobRecord::new(Id::from_static("f-1"), "a.txt", "text/plain", b"hi".to_vec());
        let file = BundleFile::from_record(&record);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "f-1", "name": "a.txt", "type": "text/plain", "data": "aGk="})
        );
        assert_eq!(file.to_record().unwrap(), record);
    }

    #[test]
    fn bad_base64_names_the_file() {
        let file = BundleFile {
            id: Id::from_static("f-bad"),
            name: String::new(),
            mime: String::new(),
            data: "%%%".into(),
        };
        match file.to_record() {
            Err(PackError::InvalidFileData { id, .. }) => assert_eq!(id, "f-bad"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn upload_accepts_numeric_key() {
        let json = r#"{"key": 7, "name": "Sara", "message": "hi", "files": [], "date": "2024-05-01T10:00:00.000Z"}"#;
        let upload: BundleUpload = serde_json::from_str(json).unwrap();
        assert_eq!(upload.key, Some(serde_json::json!(7)));
        assert_eq!(upload.record.name, "Sara");
    }
}
