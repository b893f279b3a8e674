use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// What an [`Id`] names. Only affects the human-readable prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// A category or item in the content tree.
    Node,
    /// A library attachment.
    File,
    /// An attachment submitted by a visitor.
    VisitorFile,
    /// A visitor message in the upload log.
    Upload,
}

impl IdKind {
    /// The prefix placed in front of generated ids of this kind.
    pub const fn prefix(self) -> &'static str {
        match self {
            IdKind::Node => "id-",
            IdKind::File => "f-",
            IdKind::VisitorFile => "u-",
            IdKind::Upload => "msg-",
        }
    }
}

/// Identifier for tree nodes, attachments and upload records.
///
/// Generated ids are a kind prefix followed by a UUID v7, so they sort by
/// creation time and carry a random tail. Ids read back from stored documents
/// are taken verbatim: any non-blank string is a valid id (the seeded tree
/// uses short ids such as `t1`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Generate a fresh time-ordered id of the given kind.
    pub fn generate(kind: IdKind) -> Self {
        Self(format!("{}{}", kind.prefix(), uuid::Uuid::now_v7().simple()))
    }

    /// Parse a user-supplied id, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypeError::InvalidId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a string without validation. Used for fixed seed ids.
    pub fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::str::FromStr for Id {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
