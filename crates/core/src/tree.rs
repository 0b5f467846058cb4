//! Category forest index and structural queries
//!
//! All traversal is iterative. The free functions operate on a flattened
//! slice exactly as the views consume it; `CategoryTree` builds an id/slug
//! index once per server snapshot and answers the same questions without
//! linear scans.

use crate::category::{Category, CategoryId};
use ahash::{AHashMap, AHashSet};
use smallvec::{smallvec, SmallVec};

/// Child positions leading from a root to a node
type NodePath = SmallVec<[u32; 8]>;

/// Pre-order traversal of every node in the forest
///
/// Roots first, children in their given order, depth-first.
pub fn flatten(roots: &[Category]) -> Vec<&Category> {
    let mut out = Vec::new();
    let mut stack: Vec<&Category> = roots.iter().rev().collect();

    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children.iter().rev());
    }

    out
}

/// First node in flatten order carrying `slug`
pub fn find_by_slug<'a>(flat: &[&'a Category], slug: &str) -> Option<&'a Category> {
    flat.iter().copied().find(|c| c.slug == slug)
}

/// Root-first chain of ancestors ending with the node itself
///
/// Follows `parent_id` through the flat list. A parent that cannot be found
/// is treated as the root. A repeated id stops the walk and the partial
/// chain is returned. Unknown `id` yields an empty chain.
pub fn ancestor_chain<'a>(flat: &[&'a Category], id: CategoryId) -> Vec<&'a Category> {
    let lookup = |target: CategoryId| flat.iter().copied().find(|c| c.id == target);

    match lookup(id) {
        Some(start) => walk_ancestors(start, lookup),
        None => Vec::new(),
    }
}

/// True if `node` is `target_id` or has it anywhere below
pub fn contains_descendant(node: &Category, target_id: CategoryId) -> bool {
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if current.id == target_id {
            return true;
        }
        stack.extend(current.children.iter());
    }

    false
}

fn walk_ancestors<'a, F>(start: &'a Category, lookup: F) -> Vec<&'a Category>
where
    F: Fn(CategoryId) -> Option<&'a Category>,
{
    let mut chain = vec![start];
    let mut visited = AHashSet::new();
    visited.insert(start.id);

    let mut current = start;
    while let Some(parent_id) = current.parent_id {
        // Cycle in parent links: fail closed
        if !visited.insert(parent_id) {
            break;
        }
        match lookup(parent_id) {
            Some(parent) => {
                chain.push(parent);
                current = parent;
            }
            None => break,
        }
    }

    chain.reverse();
    chain
}

/// Indexed snapshot of the category forest
///
/// Owns the roots as received and maps each id to its position in the
/// forest. When ids or slugs repeat, the first occurrence in flatten
/// order wins.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    roots: Vec<Category>,
    paths: AHashMap<CategoryId, NodePath>,
    slugs: AHashMap<String, NodePath>,
    len: usize,
}

impl CategoryTree {
    /// Index a forest
    pub fn from_roots(roots: Vec<Category>) -> Self {
        let mut paths = AHashMap::new();
        let mut slugs = AHashMap::new();
        let mut len = 0;

        let mut stack: Vec<(NodePath, &Category)> = roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, c)| (smallvec![i as u32], c))
            .collect();

        while let Some((path, node)) = stack.pop() {
            len += 1;
            slugs
                .entry(node.slug.clone())
                .or_insert_with(|| path.clone());

            for (i, child) in node.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i as u32);
                stack.push((child_path, child));
            }

            paths.entry(node.id).or_insert(path);
        }

        Self {
            roots,
            paths,
            slugs,
            len,
        }
    }

    /// Top-level categories in display order
    pub fn roots(&self) -> &[Category] {
        &self.roots
    }

    /// Give back the owned forest
    pub fn into_roots(self) -> Vec<Category> {
        self.roots
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the forest has no nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pre-order traversal of the whole forest
    pub fn flatten(&self) -> Vec<&Category> {
        flatten(&self.roots)
    }

    /// Look up a node by id
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.resolve(self.paths.get(&id)?)
    }

    fn resolve(&self, path: &NodePath) -> Option<&Category> {
        let (first, rest) = path.split_first()?;

        let mut node = self.roots.get(*first as usize)?;
        for &i in rest {
            node = node.children.get(i as usize)?;
        }
        Some(node)
    }

    /// True if a node with this id is in the snapshot
    pub fn contains(&self, id: CategoryId) -> bool {
        self.paths.contains_key(&id)
    }

    /// Look up a node by slug
    pub fn by_slug(&self, slug: &str) -> Option<&Category> {
        self.resolve(self.slugs.get(slug)?)
    }

    /// Children of a node, empty for unknown ids
    pub fn children(&self, id: CategoryId) -> &[Category] {
        self.get(id).map(|c| c.children.as_slice()).unwrap_or(&[])
    }

    /// Parent node, following `parent_id`
    pub fn parent_of(&self, id: CategoryId) -> Option<&Category> {
        self.get(id)?.parent_id.and_then(|pid| self.get(pid))
    }

    /// Root-first chain ending with `id`, see [`ancestor_chain`]
    pub fn ancestor_chain(&self, id: CategoryId) -> Vec<&Category> {
        match self.get(id) {
            Some(start) => walk_ancestors(start, |pid| self.get(pid)),
            None => Vec::new(),
        }
    }

    /// Names along the ancestor chain, root first
    pub fn breadcrumb(&self, id: CategoryId) -> Vec<&str> {
        self.ancestor_chain(id)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Breadcrumb for the node carrying `slug`
    pub fn breadcrumb_for_slug(&self, slug: &str) -> Vec<&str> {
        match self.by_slug(slug) {
            Some(node) => walk_ancestors(node, |pid| self.get(pid))
                .into_iter()
                .map(|c| c.name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// True if `ancestor` is a proper ancestor of `id`
    pub fn is_ancestor(&self, ancestor: CategoryId, id: CategoryId) -> bool {
        ancestor != id && self.ancestor_chain(id).iter().any(|c| c.id == ancestor)
    }

    /// Root whose subtree holds `id`
    pub fn root_of(&self, id: CategoryId) -> Option<&Category> {
        let path = self.paths.get(&id)?;
        self.roots.get(*path.first()? as usize)
    }

    /// Every id strictly below `id`, in pre-order
    pub fn descendant_ids(&self, id: CategoryId) -> Vec<CategoryId> {
        match self.get(id) {
            Some(node) => flatten(&node.children).into_iter().map(|c| c.id).collect(),
            None => Vec::new(),
        }
    }

    /// Number of ancestors above `id`
    pub fn depth(&self, id: CategoryId) -> Option<usize> {
        let chain = self.ancestor_chain(id);
        chain.len().checked_sub(1)
    }

    /// Only leaves may be deleted
    pub fn can_delete(&self, id: CategoryId) -> bool {
        self.get(id).is_some_and(Category::is_leaf)
    }

    /// Whether `source` may be reparented under `target`
    ///
    /// Rejects self, the current parent and anything inside the source's
    /// own subtree.
    pub fn is_valid_move_target(&self, source: CategoryId, target: CategoryId) -> bool {
        if source == target || !self.contains(target) {
            return false;
        }
        match self.get(source) {
            Some(node) => node.parent_id != Some(target) && !contains_descendant(node, target),
            None => false,
        }
    }
}

impl From<Vec<Category>> for CategoryTree {
    fn from(roots: Vec<Category>) -> Self {
        Self::from_roots(roots)
    }
}
