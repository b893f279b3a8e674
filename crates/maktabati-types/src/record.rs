use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::id::Id;
use crate::tree::AttachmentRef;

/// Display name recorded when a visitor leaves the name field blank.
pub const DEFAULT_VISITOR_NAME: &str = "زائر";

/// File bytes plus the metadata needed to serve them back, keyed by `id`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRecord {
    pub id: Id,
    pub data: Vec<u8>,
    #[serde(rename = "type")]
    pub mime: String,
    pub name: String,
}

impl BlobRecord {
    pub fn new(id: Id, name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id,
            data,
            mime: mime.into(),
            name: name.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// The tree-side pointer describing this record.
    pub fn to_attachment_ref(&self) -> AttachmentRef {
        AttachmentRef::new(self.id.clone(), self.name.clone(), self.size(), self.mime.clone())
    }
}

impl std::fmt::Debug for BlobRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.data.len())
            .finish()
    }
}

/// A visitor-submitted message with optional attachment refs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<AttachmentRef>,
    /// ISO-8601 timestamp, kept as text so imported values round-trip exactly.
    pub date: String,
}

impl UploadRecord {
    /// A record stamped with the current time. A blank name becomes
    /// [`DEFAULT_VISITOR_NAME`].
    pub fn new(name: &str, message: impl Into<String>, files: Vec<AttachmentRef>) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                DEFAULT_VISITOR_NAME.to_string()
            } else {
                name.to_string()
            },
            message: message.into(),
            files,
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// The submission time, if `date` parses as RFC 3339.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

/// An upload record together with the key the upload log assigned to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedUpload {
    pub key: Id,
    #[serde(flatten)]
    pub record: UploadRecord,
}
