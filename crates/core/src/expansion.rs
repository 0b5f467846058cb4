//! Storefront selection and accordion expansion state
//!
//! Neither type stores a path. Whether a branch is open, or lies on the
//! way to the selected category, is recomputed from the current snapshot
//! by containment so a replaced snapshot never leaves stale path state.

use crate::category::{Category, CategoryId};
use crate::tree::{contains_descendant, CategoryTree};

/// Single open branch of the category accordion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expansion {
    expanded: Option<CategoryId>,
}

impl Expansion {
    /// Nothing expanded
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently expanded node
    pub fn expanded(&self) -> Option<CategoryId> {
        self.expanded
    }

    /// Make `id` the expansion target
    pub fn expand(&mut self, id: CategoryId) {
        self.expanded = Some(id);
    }

    /// Close every branch
    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Open `id`, or close it if it is currently open
    ///
    /// A branch is open when the target sits anywhere in its subtree.
    /// Closing hands the target to the parent of `id` so the branches above
    /// stay open.
    pub fn toggle(&mut self, tree: &CategoryTree, id: CategoryId) {
        if self.is_open(tree, id) {
            self.expanded = tree
                .get(id)
                .and_then(|node| node.parent_id)
                .filter(|pid| tree.contains(*pid));
        } else {
            self.expanded = Some(id);
        }
    }

    /// A branch renders open when the expansion target sits in its subtree
    pub fn is_open(&self, tree: &CategoryTree, id: CategoryId) -> bool {
        match (self.expanded, tree.get(id)) {
            (Some(target), Some(node)) => contains_descendant(node, target),
            _ => false,
        }
    }

    /// Ids of every open branch, root first
    pub fn open_path(&self, tree: &CategoryTree) -> Vec<CategoryId> {
        match self.expanded {
            Some(target) => tree.ancestor_chain(target).iter().map(|c| c.id).collect(),
            None => Vec::new(),
        }
    }
}

/// Category the storefront is filtering by, keyed by slug
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    slug: Option<String>,
}

impl Selection {
    /// No filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection for an optional slug, empty strings mean no filter
    pub fn from_slug(slug: Option<&str>) -> Self {
        let mut selection = Self::new();
        if let Some(slug) = slug {
            selection.select(slug);
        }
        selection
    }

    /// Select by slug
    pub fn select(&mut self, slug: impl Into<String>) {
        let slug = slug.into();
        self.slug = if slug.is_empty() { None } else { Some(slug) };
    }

    /// Drop the filter
    pub fn clear(&mut self) {
        self.slug = None;
    }

    /// Selected slug
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Resolve the selection against a snapshot
    pub fn selected<'a>(&self, tree: &'a CategoryTree) -> Option<&'a Category> {
        self.slug.as_deref().and_then(|slug| tree.by_slug(slug))
    }

    /// Names from the root down to the selected category
    pub fn breadcrumb<'a>(&self, tree: &'a CategoryTree) -> Vec<&'a str> {
        match self.slug.as_deref() {
            Some(slug) => tree.breadcrumb_for_slug(slug),
            None => Vec::new(),
        }
    }

    /// True when the selected category is `id` or lies below it
    pub fn is_on_selected_path(&self, tree: &CategoryTree, id: CategoryId) -> bool {
        match (self.selected(tree), tree.get(id)) {
            (Some(selected), Some(node)) => contains_descendant(node, selected.id),
            _ => false,
        }
    }

    /// Expansion that opens the accordion down to the selection
    pub fn expansion_for(&self, tree: &CategoryTree) -> Expansion {
        Expansion {
            expanded: self.selected(tree).map(|c| c.id),
        }
    }
}
