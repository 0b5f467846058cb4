//! Shared category snapshot for every view on a page

use canopy_core::{Category, CategoryTree};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Handle to the authoritative forest
///
/// Cloning is cheap and every clone sees the same snapshot. Readers take an
/// `Arc` of the current tree; a refreshed forest replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct TreeContext {
    current: Arc<RwLock<Arc<CategoryTree>>>,
    /// Bumped on every replace
    generation: Arc<AtomicU64>,
}

impl TreeContext {
    /// Context seeded with the page-load forest
    pub fn new(roots: Vec<Category>) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(CategoryTree::from_roots(roots)))),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<CategoryTree> {
        self.current.read().clone()
    }

    /// Swap in a server-confirmed forest and return the new snapshot
    pub fn replace(&self, roots: Vec<Category>) -> Arc<CategoryTree> {
        let tree = Arc::new(CategoryTree::from_roots(roots));
        *self.current.write() = tree.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Category snapshot replaced (generation {}, {} nodes)", generation, tree.len());
        tree
    }

    /// Number of replacements since creation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_is_visible_to_clones() {
        let context = TreeContext::new(vec![Category::new(1, "A", "a")]);
        let view = context.clone();
        let before = view.snapshot();

        context.replace(vec![Category::new(1, "A", "a"), Category::new(2, "B", "b")]);

        assert_eq!(before.len(), 1);
        assert_eq!(view.snapshot().len(), 2);
        assert_eq!(view.generation(), 1);
    }
}
