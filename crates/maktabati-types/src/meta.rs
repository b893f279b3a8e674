use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::Id;
use crate::tree::{Category, Item};

/// Stored password material. Both fields are base64 text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub hash: String,
    pub salt: String,
}

/// The single document holding the whole content tree, the password record
/// and the category definitions.
///
/// It is always persisted wholesale; there is no partial or incremental save.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub password: Option<PasswordRecord>,
    /// Root categories, in display order.
    #[serde(default)]
    pub types: Vec<Category>,
    /// Reserved. Kept verbatim so older documents round-trip untouched.
    #[serde(default)]
    pub uploads: Vec<serde_json::Value>,
}

impl MetadataDocument {
    /// The first-run document: no password and one sample category holding
    /// one sample item.
    pub fn seeded() -> Self {
        let mut category = Category::with_id(Id::from_static("t1"), "قانون العمل", "⚖️");
        category.items.push(Item::with_id(
            Id::from_static("t1-i1"),
            "المادة (1): أحكام عامة",
            "<h2>نص قانوني تجريبي</h2>",
        ));
        Self {
            password: None,
            types: vec![category],
            uploads: Vec::new(),
        }
    }

    /// Replace an empty tree with the seeded document. Returns `true` if
    /// seeding happened.
    pub fn ensure_defaults(&mut self) -> bool {
        if !self.types.is_empty() {
            return false;
        }
        *self = Self::seeded();
        true
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn to_json(&self) -> Result<String, TypeError> {
        serde_json::to_string(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    pub fn from_json(s: &str) -> Result<Self, TypeError> {
        serde_json::from_str(s).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
