use serde::Serialize;

use maktabati_types::{Category, Id, Item};

use crate::node::{Found, NodeKind, NodePath, NodeRef, Owner};

/// Depth-first search for `id` over categories, their items, and the items'
/// children, in document order.
///
/// The first match wins, so if an id was ever duplicated the earliest node in
/// DFS order is the one returned.
pub fn find_by_id<'a>(categories: &'a [Category], id: &str) -> Option<Found<'a>> {
    let mut trail = Vec::new();
    for (pos, category) in categories.iter().enumerate() {
        if category.id == id {
            return Some(Found {
                node: NodeRef::Category(category),
                owner: Owner::Root,
                path: NodePath {
                    category: pos,
                    items: Vec::new(),
                },
            });
        }
        let parent = NodeRef::Category(category);
        if let Some(found) = find_in_items(parent, &category.items, id, pos, &mut trail) {
            return Some(found);
        }
    }
    None
}

fn find_in_items<'a>(
    parent: NodeRef<'a>,
    items: &'a [Item],
    id: &str,
    category: usize,
    trail: &mut Vec<usize>,
) -> Option<Found<'a>> {
    for (pos, item) in items.iter().enumerate() {
        trail.push(pos);
        if item.id == id {
            return Some(Found {
                node: NodeRef::Item(item),
                owner: owner_of(parent),
                path: NodePath {
                    category,
                    items: trail.clone(),
                },
            });
        }
        if let Some(found) = find_in_items(NodeRef::Item(item), &item.children, id, category, trail) {
            return Some(found);
        }
        trail.pop();
    }
    None
}

fn owner_of(parent: NodeRef<'_>) -> Owner {
    match parent {
        NodeRef::Category(c) => Owner::CategoryItems(c.id.clone()),
        NodeRef::Item(i) => Owner::ItemChildren(i.id.clone()),
    }
}

/// Index path of the node with `id`, if present.
pub fn locate(categories: &[Category], id: &str) -> Option<NodePath> {
    find_by_id(categories, id).map(|found| found.path)
}

/// The node a path points at, if the path is still valid.
pub fn node_at<'a>(categories: &'a [Category], path: &NodePath) -> Option<NodeRef<'a>> {
    let category = categories.get(path.category)?;
    let Some((&first, rest)) = path.items.split_first() else {
        return Some(NodeRef::Category(category));
    };
    let mut item = category.items.get(first)?;
    for &pos in rest {
        item = item.children.get(pos)?;
    }
    Some(NodeRef::Item(item))
}

/// One line of a flattened tree listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub id: Id,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub icon: Option<String>,
    pub attachments: usize,
}

/// The whole tree flattened in display (pre-order) order.
pub fn outline(categories: &[Category]) -> Vec<OutlineEntry> {
    let mut out = Vec::new();
    for category in categories {
        out.push(OutlineEntry {
            id: category.id.clone(),
            name: category.name.clone(),
            kind: NodeKind::Category,
            depth: 0,
            icon: Some(category.icon.clone()),
            attachments: 0,
        });
        outline_items(&category.items, 1, &mut out);
    }
    out
}

fn outline_items(items: &[Item], depth: usize, out: &mut Vec<OutlineEntry>) {
    for item in items {
        out.push(OutlineEntry {
            id: item.id.clone(),
            name: item.name.clone(),
            kind: NodeKind::Item,
            depth,
            icon: None,
            attachments: item.files.len(),
        });
        outline_items(&item.children, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &'static str) -> Item {
        Item::with_id(Id::from_static(id), id, "")
    }

    /// C1 -> I1 -> I1a, C1 -> I2, C2 -> I3
    fn sample() -> Vec<Category> {
        let mut i1 = item("I1");
        i1.children.push(item("I1a"));
        let mut c1 = Category::with_id(Id::from_static("C1"), "C1", "📘");
        c1.items.push(i1);
        c1.items.push(item("I2"));
        let mut c2 = Category::with_id(Id::from_static("C2"), "C2", "📗");
        c2.items.push(item("I3"));
        vec![c1, c2]
    }

    #[test]
    fn child_reports_item_children_as_owner() {
        let tree = sample();
        let found = find_by_id(&tree, "I1a").expect("should find");
        assert_eq!(found.node.id(), "I1a");
        assert_eq!(found.owner, Owner::ItemChildren(Id::from_static("I1")));
        assert_ne!(found.owner, Owner::CategoryItems(Id::from_static("C1")));
        assert_eq!(found.path, NodePath { category: 0, items: vec![0, 0] });
    }

    #[test]
    fn item_reports_category_items_as_owner() {
        let tree = sample();
        let found = find_by_id(&tree, "I3").unwrap();
        assert_eq!(found.owner, Owner::CategoryItems(Id::from_static("C2")));
        assert_eq!(found.path.depth(), 1);
    }

    #[test]
    fn category_reports_root_as_owner() {
        let tree = sample();
        let found = find_by_id(&tree, "C2").unwrap();
        assert_eq!(found.owner, Owner::Root);
        assert!(found.path.is_category());
        assert_eq!(found.node.kind(), NodeKind::Category);
    }

    #[test]
    fn missing_id_is_none() {
        assert!(find_by_id(&sample(), "nope").is_none());
        assert!(locate(&sample(), "").is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_in_dfs_order() {
        let mut tree = sample();
        // Same id deeper in the first category and again in the second.
        tree[0].items[0].children.push(item("dup"));
        tree[1].items.push(item("dup"));
        let found = find_by_id(&tree, "dup").unwrap();
        assert_eq!(found.owner, Owner::ItemChildren(Id::from_static("I1")));
    }

    #[test]
    fn pre_order_wins_over_later_siblings() {
        let mut tree = sample();
        tree[0].items[0].children.push(item("I2"));
        // The child of I1 precedes the sibling I2 in DFS order.
        let found = find_by_id(&tree, "I2").unwrap();
        assert_eq!(found.path.items, vec![0, 1]);
    }

    #[test]
    fn node_at_follows_paths() {
        let tree = sample();
        let path = locate(&tree, "I1a").unwrap();
        assert_eq!(node_at(&tree, &path).unwrap().id(), "I1a");
        let stale = NodePath { category: 5, items: vec![] };
        assert!(node_at(&tree, &stale).is_none());
    }

    #[test]
    fn outline_is_display_order() {
        let lines = outline(&sample());
        let ids: Vec<&str> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "I1", "I1a", "I2", "C2", "I3"]);
        let depths: Vec<usize> = lines.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0, 1]);
    }
}
