use serde::Serialize;

use maktabati_types::{Category, Id, Item};

/// Which of the two node kinds a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Category,
    Item,
}

/// A borrowed tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Category(&'a Category),
    Item(&'a Item),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a Id {
        match self {
            NodeRef::Category(c) => &c.id,
            NodeRef::Item(i) => &i.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Category(c) => &c.name,
            NodeRef::Item(i) => &i.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Category(_) => NodeKind::Category,
            NodeRef::Item(_) => NodeKind::Item,
        }
    }

    pub fn as_item(&self) -> Option<&'a Item> {
        match self {
            NodeRef::Item(i) => Some(i),
            NodeRef::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&'a Category> {
        match self {
            NodeRef::Category(c) => Some(c),
            NodeRef::Item(_) => None,
        }
    }

    /// Every attachment id in the node's subtree.
    pub fn attachment_ids(&self) -> Vec<Id> {
        match self {
            NodeRef::Category(c) => c.attachment_ids(),
            NodeRef::Item(i) => i.attachment_ids(),
        }
    }
}

/// The collection that owns a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Owner {
    /// The document's root category list.
    Root,
    /// The item list of the category with this id.
    CategoryItems(Id),
    /// The child list of the item with this id.
    ItemChildren(Id),
}

/// Index path to a node: the category position, then one position per item
/// level. An empty `items` path addresses the category itself.
///
/// Paths are only valid until the next structural edit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodePath {
    pub category: usize,
    pub items: Vec<usize>,
}

impl NodePath {
    pub fn is_category(&self) -> bool {
        self.items.is_empty()
    }

    /// Nesting depth: 0 for a category, 1 for its items, 2 for their children.
    pub fn depth(&self) -> usize {
        self.items.len()
    }
}

/// A lookup result.
#[derive(Clone, Debug)]
pub struct Found<'a> {
    pub node: NodeRef<'a>,
    pub owner: Owner,
    pub path: NodePath,
}

/// A subtree detached from the document by a delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovedNode {
    Category(Category),
    Item(Item),
}

impl RemovedNode {
    pub fn id(&self) -> &Id {
        match self {
            RemovedNode::Category(c) => &c.id,
            RemovedNode::Item(i) => &i.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RemovedNode::Category(c) => &c.name,
            RemovedNode::Item(i) => &i.name,
        }
    }

    /// Attachments whose blobs must be deleted along with this subtree.
    pub fn attachment_ids(&self) -> Vec<Id> {
        match self {
            RemovedNode::Category(c) => c.attachment_ids(),
            RemovedNode::Item(i) => i.attachment_ids(),
        }
    }
}

/// In-place field changes. `None` leaves a field alone; `icon` only applies
/// to categories and `content` only to items.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeEdit {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub content: Option<String>,
}

impl NodeEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none() && self.content.is_none()
    }

    pub(crate) fn apply_to_category(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.trim().to_string();
        }
        if let Some(icon) = &self.icon {
            category.icon = icon.trim().to_string();
        }
    }

    pub(crate) fn apply_to_item(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.trim().to_string();
        }
        if let Some(content) = &self.content {
            item.content = content.trim().to_string();
        }
    }
}
