//! Category node as delivered by the server

use serde::{Deserialize, Serialize};

/// Server-assigned category identifier
pub type CategoryId = i64;

/// A node in the category forest
///
/// `children` is owned by the node and kept in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Immutable identifier
    pub id: CategoryId,
    /// Display label
    pub name: String,
    /// URL-safe lookup key
    pub slug: String,
    /// Parent id, `None` for root-level nodes
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Child nodes in display order
    #[serde(default)]
    pub children: Vec<Category>,
}

impl Category {
    /// Create a root-level leaf
    pub fn new(id: CategoryId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            parent_id: None,
            children: Vec::new(),
        }
    }

    /// Append a child, stamping its `parent_id` with this node's id
    pub fn with_child(mut self, mut child: Category) -> Self {
        child.parent_id = Some(self.id);
        self.children.push(child);
        self
    }

    /// True when the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when the node sits at the top level
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
