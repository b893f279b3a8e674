//! Content tree nodes.
//!
//! The tree has two node kinds, discriminated by type rather than by which
//! fields happen to be present: a [`Category`] sits at the root and owns
//! [`Item`]s; an item owns attachments and nested child items. On the wire
//! both kinds keep the JSON shape of the stored metadata document.

use serde::{Deserialize, Serialize};

use crate::id::{Id, IdKind};

/// Pointer from an item to a file held in the blob store.
///
/// The ref does not own the bytes; the blob store record with the same id does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub id: Id,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime: String,
}

impl AttachmentRef {
    pub fn new(id: Id, name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }
}

/// A content entry. Items nest to any depth through `children`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Id,
    pub name: String,
    /// Rich text body (HTML).
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<AttachmentRef>,
    #[serde(default)]
    pub children: Vec<Item>,
}

impl Item {
    /// A new, empty item with a freshly generated id.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Id::generate(IdKind::Node), name, content)
    }

    pub fn with_id(id: Id, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
            files: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Ids of every attachment on this item and on all of its descendants,
    /// in document order.
    pub fn attachment_ids(&self) -> Vec<Id> {
        let mut out = Vec::new();
        self.collect_attachment_ids(&mut out);
        out
    }

    fn collect_attachment_ids(&self, out: &mut Vec<Id>) {
        out.extend(self.files.iter().map(|f| f.id.clone()));
        for child in &self.children {
            child.collect_attachment_ids(out);
        }
    }

    /// Number of items in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Item::subtree_len).sum::<usize>()
    }
}

/// Top-level grouping of items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    #[serde(default)]
    pub icon: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Category {
    /// A new, empty category with a freshly generated id.
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self::with_id(Id::generate(IdKind::Node), name, icon)
    }

    pub fn with_id(id: Id, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id,
            icon: icon.into(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Ids of every attachment anywhere under this category.
    pub fn attachment_ids(&self) -> Vec<Id> {
        self.items.iter().flat_map(Item::attachment_ids).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(id: &'static str) -> AttachmentRef {
        AttachmentRef::new(Id::from_static(id), format!("{id}.pdf"), 10, "application/pdf")
    }

    #[test]
    fn attachment_ids_walk_descendants() {
        let mut child = Item::with_id(Id::from_static("I1a"), "child", "");
        child.files.push(attachment("f2"));
        let mut grandchild = Item::with_id(Id::from_static("I1a1"), "grandchild", "");
        grandchild.files.push(attachment("f3"));
        child.children.push(grandchild);

        let mut item = Item::with_id(Id::from_static("I1"), "item", "");
        item.files.push(attachment("f1"));
        item.children.push(child);

        let ids: Vec<String> = item.attachment_ids().into_iter().map(Id::into_string).collect();
        assert_eq!(ids, vec!["f1", "f2", "f3"]);
        assert_eq!(item.subtree_len(), 3);
    }

    #[test]
    fn category_collects_from_all_items() {
        let mut a = Item::new("a", "");
        a.files.push(attachment("fa"));
        let mut b = Item::new("b", "");
        b.files.push(attachment("fb"));
        let mut cat = Category::new("cat", "📁");
        cat.items.push(a);
        cat.items.push(b);
        assert_eq!(cat.attachment_ids().len(), 2);
    }

    #[test]
    fn attachment_ref_uses_type_on_the_wire() {
        let json = serde_json::to_value(attachment("f1")).unwrap();
        assert_eq!(json["type"], "application/pdf");
        assert!(json.get("mime").is_none());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let item: Item = serde_json::from_str(r#"{"id":"x","name":"n"}"#).unwrap();
        assert!(item.files.is_empty());
        assert!(item.children.is_empty());
        assert!(item.content.is_empty());

        let cat: Category = serde_json::from_str(r#"{"id":"c","name":"n"}"#).unwrap();
        assert!(cat.items.is_empty());
    }
}
