//! Multi-select list of variants attached to a discount

use crate::search::VariantSummary;

/// Variants picked from search results, in pick order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachList {
    items: Vec<VariantSummary>,
}

impl AttachList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from variants already attached server-side
    pub fn from_attached(items: Vec<VariantSummary>) -> Self {
        let mut list = Self::new();
        for item in items {
            list.attach(item);
        }
        list
    }

    pub fn contains(&self, id: i64) -> bool {
        self.items.iter().any(|v| v.id == id)
    }

    /// Add a variant; false if it was already attached
    pub fn attach(&mut self, variant: VariantSummary) -> bool {
        if self.contains(variant.id) {
            return false;
        }
        self.items.push(variant);
        true
    }

    /// Remove a variant; false if it was not attached
    pub fn detach(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|v| v.id != id);
        self.items.len() != before
    }

    /// Flip membership; returns whether the variant is now attached
    pub fn toggle(&mut self, variant: VariantSummary) -> bool {
        if self.detach(variant.id) {
            false
        } else {
            self.items.push(variant);
            true
        }
    }

    /// Ids to submit with the discount form
    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|v| v.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariantSummary> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
