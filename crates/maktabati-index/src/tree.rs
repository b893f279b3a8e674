//! Structural edits on the content tree.

use maktabati_types::{AttachmentRef, Category, Item};

use crate::lookup::{find_by_id, locate};
use crate::node::{Found, NodeEdit, NodePath, RemovedNode};

/// Mutable view over a document's category list.
///
/// Every operation resolves ids through [`find_by_id`] first. Unknown ids
/// leave the tree untouched; the return value says whether anything changed.
pub struct ContentTree<'a> {
    categories: &'a mut Vec<Category>,
}

impl<'a> ContentTree<'a> {
    pub fn new(categories: &'a mut Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        self.categories.as_slice()
    }

    pub fn find(&self, id: &str) -> Option<Found<'_>> {
        find_by_id(self.categories.as_slice(), id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    // ---------------------------------------------------------------
    // Path helpers
    // ---------------------------------------------------------------

    /// The item list reached by following `prefix` from a category.
    fn items_at_mut(&mut self, category: usize, prefix: &[usize]) -> Option<&mut Vec<Item>> {
        let mut items = &mut self.categories.get_mut(category)?.items;
        for &pos in prefix {
            items = &mut items.get_mut(pos)?.children;
        }
        Some(items)
    }

    fn item_at_mut(&mut self, path: &NodePath) -> Option<&mut Item> {
        let (&last, prefix) = path.items.split_last()?;
        self.items_at_mut(path.category, prefix)?.get_mut(last)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        let path = locate(self.categories.as_slice(), id)?;
        self.item_at_mut(&path)
    }

    pub fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        let path = locate(self.categories.as_slice(), id)?;
        if !path.is_category() {
            return None;
        }
        self.categories.get_mut(path.category)
    }

    // ---------------------------------------------------------------
    // Insert
    // ---------------------------------------------------------------

    /// Append a category to the root list.
    pub fn insert_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Append `item` to a category's items or to an item's children.
    ///
    /// Returns `false` (and drops `item`) if `parent_id` is unknown.
    pub fn insert_item(&mut self, parent_id: &str, item: Item) -> bool {
        let Some(path) = locate(self.categories.as_slice(), parent_id) else {
            tracing::debug!(parent = parent_id, "insert under unknown parent ignored");
            return false;
        };
        let target = if path.is_category() {
            self.categories.get_mut(path.category).map(|c| &mut c.items)
        } else {
            self.item_at_mut(&path).map(|i| &mut i.children)
        };
        match target {
            Some(list) => {
                list.push(item);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------
    // Edit
    // ---------------------------------------------------------------

    /// Apply field changes in place. No structural change.
    pub fn edit(&mut self, id: &str, edit: &NodeEdit) -> bool {
        let Some(path) = locate(self.categories.as_slice(), id) else {
            tracing::debug!(id, "edit of unknown node ignored");
            return false;
        };
        if path.is_category() {
            match self.categories.get_mut(path.category) {
                Some(category) => edit.apply_to_category(category),
                None => return false,
            }
        } else {
            match self.item_at_mut(&path) {
                Some(item) => edit.apply_to_item(item),
                None => return false,
            }
        }
        true
    }

    /// Rename a category and change its icon. Items are not matched.
    pub fn update_category(&mut self, id: &str, name: &str, icon: &str) -> bool {
        match self.category_mut(id) {
            Some(category) => {
                category.name = name.trim().to_string();
                category.icon = icon.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Rename an item and replace its content. Categories are not matched.
    pub fn update_item(&mut self, id: &str, name: &str, content: &str) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.name = name.trim().to_string();
                item.content = content.trim().to_string();
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------
    // Delete
    // ---------------------------------------------------------------

    /// Detach the node from its owning collection and hand it back.
    ///
    /// The caller owns the subtree afterwards and is responsible for deleting
    /// the blobs of [`RemovedNode::attachment_ids`].
    pub fn remove(&mut self, id: &str) -> Option<RemovedNode> {
        let Some(path) = locate(self.categories.as_slice(), id) else {
            tracing::debug!(id, "delete of unknown node ignored");
            return None;
        };
        match path.items.split_last() {
            None => Some(RemovedNode::Category(self.categories.remove(path.category))),
            Some((&last, prefix)) => {
                let owner = self.items_at_mut(path.category, prefix)?;
                Some(RemovedNode::Item(owner.remove(last)))
            }
        }
    }

    // ---------------------------------------------------------------
    // Attachments
    // ---------------------------------------------------------------

    /// Link an attachment to an item. Categories carry no files.
    pub fn attach(&mut self, item_id: &str, file: AttachmentRef) -> bool {
        match self.item_mut(item_id) {
            Some(item) => {
                item.files.push(file);
                true
            }
            None => {
                tracing::debug!(item = item_id, "attach to unknown item ignored");
                false
            }
        }
    }

    /// Unlink an attachment from an item, returning the removed ref.
    pub fn detach(&mut self, item_id: &str, attachment_id: &str) -> Option<AttachmentRef> {
        let item = self.item_mut(item_id)?;
        let pos = item.files.iter().position(|f| f.id == attachment_id)?;
        Some(item.files.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeRef, Owner};
    use maktabati_types::Id;

    fn item(id: &'static str) -> Item {
        Item::with_id(Id::from_static(id), id, "")
    }

    fn file(id: &'static str) -> AttachmentRef {
        AttachmentRef::new(Id::from_static(id), id, 3, "text/plain")
    }

    fn sample() -> Vec<Category> {
        let mut c1 = Category::with_id(Id::from_static("C1"), "C1", "📘");
        c1.items.push(item("I1"));
        vec![c1]
    }

    #[test]
    fn insert_category_appends_to_root() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        tree.insert_category(Category::with_id(Id::from_static("C2"), "C2", ""));
        assert_eq!(tree.categories().len(), 2);
        assert_eq!(tree.categories()[1].id, "C2");
    }

    #[test]
    fn insert_item_under_category_and_item() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        assert!(tree.insert_item("C1", item("I2")));
        assert!(tree.insert_item("I1", item("I1a")));
        assert!(tree.insert_item("I1a", item("I1a1")));

        let found = tree.find("I1a1").unwrap();
        assert_eq!(found.owner, Owner::ItemChildren(Id::from_static("I1a")));
        assert_eq!(tree.categories()[0].items[1].id, "I2");
    }

    #[test]
    fn insert_under_unknown_parent_is_noop() {
        let mut cats = sample();
        let before = cats.clone();
        let mut tree = ContentTree::new(&mut cats);
        assert!(!tree.insert_item("ghost", item("X")));
        assert_eq!(cats, before);
    }

    #[test]
    fn edit_applies_kind_specific_fields() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        let edit = NodeEdit {
            name: Some("  Renamed ".into()),
            icon: Some("📕".into()),
            content: Some("<p>body</p>".into()),
        };
        assert!(tree.edit("C1", &edit));
        assert!(tree.edit("I1", &edit));
        assert!(!tree.edit("ghost", &edit));

        let category = &tree.categories()[0];
        assert_eq!(category.name, "Renamed");
        assert_eq!(category.icon, "📕");
        let i1 = &category.items[0];
        assert_eq!(i1.name, "Renamed");
        assert_eq!(i1.content, "<p>body</p>");
    }

    #[test]
    fn update_matches_node_kind() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        assert!(tree.update_category("C1", " Labour ", "⚖️"));
        assert!(!tree.update_category("I1", "x", "y"));
        assert!(tree.update_item("I1", "Article", " <p>a</p> "));
        assert!(!tree.update_item("C1", "x", "y"));

        assert_eq!(tree.categories()[0].name, "Labour");
        assert_eq!(tree.categories()[0].items[0].content, "<p>a</p>");
    }

    #[test]
    fn remove_child_returns_subtree_with_its_files() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        tree.insert_item("I1", item("I1a"));
        tree.insert_item("I1a", item("I1a1"));
        tree.attach("I1a", file("f-a"));
        tree.attach("I1a1", file("f-b"));
        tree.attach("I1", file("f-keep"));

        let removed = tree.remove("I1a").expect("should remove");
        assert_eq!(removed.id(), "I1a");
        let swept: Vec<String> = removed.attachment_ids().into_iter().map(Id::into_string).collect();
        assert_eq!(swept, vec!["f-a", "f-b"]);

        assert!(tree.find("I1a").is_none());
        assert!(tree.find("I1a1").is_none());
        assert_eq!(tree.categories()[0].items[0].files.len(), 1);
    }

    #[test]
    fn remove_category_returns_all_nested_files() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        tree.insert_item("I1", item("I1a"));
        tree.attach("I1", file("f1"));
        tree.attach("I1a", file("f2"));
        let removed = tree.remove("C1").unwrap();
        assert!(matches!(removed, RemovedNode::Category(_)));
        assert_eq!(removed.attachment_ids().len(), 2);
        assert!(tree.categories().is_empty());
    }

    #[test]
    fn remove_unknown_is_none() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        assert!(tree.remove("ghost").is_none());
        assert_eq!(tree.categories().len(), 1);
    }

    #[test]
    fn attach_only_targets_items() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        assert!(!tree.attach("C1", file("f1")));
        assert!(tree.attach("I1", file("f1")));
        assert!(tree.category_mut("I1").is_none());
        assert!(tree.category_mut("C1").is_some());
    }

    #[test]
    fn detach_removes_only_the_named_ref() {
        let mut cats = sample();
        let mut tree = ContentTree::new(&mut cats);
        tree.attach("I1", file("f1"));
        tree.attach("I1", file("f2"));
        let gone = tree.detach("I1", "f1").unwrap();
        assert_eq!(gone.id, "f1");
        assert!(tree.detach("I1", "f1").is_none());
        assert!(tree.detach("ghost", "f2").is_none());
        match tree.find("I1").unwrap().node {
            NodeRef::Item(i) => assert_eq!(i.files.len(), 1),
            NodeRef::Category(_) => panic!("expected item"),
        }
    }
}
