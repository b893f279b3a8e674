use serde::Serialize;

use maktabati_index::{Found, NodeKind, NodeRef, Owner};
use maktabati_types::{AttachmentRef, Id};

/// File contents handed to the library for storage.
#[derive(Clone, PartialEq, Eq)]
pub struct NewFile {
    pub name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl NewFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data,
        }
    }
}

impl std::fmt::Debug for NewFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.data.len())
            .finish()
    }
}

/// A visitor message for the inbox.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub message: String,
    pub files: Vec<NewFile>,
}

impl Submission {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: NewFile) -> Self {
        self.files.push(file);
        self
    }
}

/// A direct child, as listed by [`NodeView`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChildEntry {
    pub id: Id,
    pub name: String,
}

/// Everything a reader needs to display one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub id: Id,
    pub kind: NodeKind,
    pub name: String,
    /// Id of the category or item holding this node; `None` at the root.
    pub parent: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub files: Vec<AttachmentRef>,
    pub children: Vec<ChildEntry>,
}

impl From<&Found<'_>> for NodeView {
    fn from(found: &Found<'_>) -> Self {
        let parent = match &found.owner {
            Owner::Root => None,
            Owner::CategoryItems(id) | Owner::ItemChildren(id) => Some(id.clone()),
        };
        let (icon, content, files, children) = match found.node {
            NodeRef::Category(c) => (Some(c.icon.clone()), None, Vec::new(), &c.items),
            NodeRef::Item(i) => (None, Some(i.content.clone()), i.files.clone(), &i.children),
        };
        Self {
            id: found.node.id().clone(),
            kind: found.node.kind(),
            name: found.node.name().to_string(),
            parent,
            icon,
            content,
            files,
            children: children
                .iter()
                .map(|c| ChildEntry {
                    id: c.id.clone(),
                    name: c.name.clone(),
                })
                .collect(),
        }
    }
}
