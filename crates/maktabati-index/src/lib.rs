//! Content tree index for Maktabati.
//!
//! Operates directly on the category list of a
//! [`MetadataDocument`](maktabati_types::MetadataDocument). Lookups walk the
//! tree depth-first in document order and report both the node and the
//! collection that owns it, because insertion and deletion need the owner,
//! not just the node.
//!
//! # Key Types
//!
//! - [`ContentTree`] - mutable view used for structural edits
//! - [`Found`] - a lookup result: node, owner and stable [`NodePath`]
//! - [`NodeRef`] - tagged reference to a category or an item
//! - [`Owner`] - names the collection a node lives in
//! - [`RemovedNode`] - a detached subtree, carrying the attachments to sweep
//!
//! Operations on unknown ids are silent no-ops: they return `false` or `None`
//! and change nothing.

pub mod lookup;
pub mod node;
pub mod search;
pub mod tree;

pub use lookup::{find_by_id, locate, node_at, outline, OutlineEntry};
pub use node::{Found, NodeEdit, NodeKind, NodePath, NodeRef, Owner, RemovedNode};
pub use search::{highlight, search, SearchHit};
pub use tree::ContentTree;
