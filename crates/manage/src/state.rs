//! Pending structural operation
//!
//! One value instead of four independent ids: arming an operation always
//! replaces whatever was armed before.

use canopy_core::CategoryId;

/// The operation the admin is currently composing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pending {
    /// Nothing armed
    #[default]
    Idle,
    /// Composing a new child, `None` for the top level
    Adding { parent: Option<CategoryId> },
    /// Renaming
    Editing(CategoryId),
    /// Source of a two-step reparent
    Moving(CategoryId),
    /// Awaiting delete confirmation
    Deleting(CategoryId),
}

impl Pending {
    pub fn is_idle(&self) -> bool {
        matches!(self, Pending::Idle)
    }

    /// Parent being added to, if adding
    pub fn add_target(&self) -> Option<Option<CategoryId>> {
        match self {
            Pending::Adding { parent } => Some(*parent),
            _ => None,
        }
    }

    pub fn edit_target(&self) -> Option<CategoryId> {
        match self {
            Pending::Editing(id) => Some(*id),
            _ => None,
        }
    }

    pub fn move_source(&self) -> Option<CategoryId> {
        match self {
            Pending::Moving(id) => Some(*id),
            _ => None,
        }
    }

    pub fn delete_target(&self) -> Option<CategoryId> {
        match self {
            Pending::Deleting(id) => Some(*id),
            _ => None,
        }
    }

    /// True when `id` is the node this operation acts on
    pub fn involves(&self, id: CategoryId) -> bool {
        match self {
            Pending::Idle => false,
            Pending::Adding { parent } => *parent == Some(id),
            Pending::Editing(x) | Pending::Moving(x) | Pending::Deleting(x) => *x == id,
        }
    }

    /// Short name for logs and status lines
    pub fn label(&self) -> &'static str {
        match self {
            Pending::Idle => "idle",
            Pending::Adding { .. } => "adding",
            Pending::Editing(_) => "editing",
            Pending::Moving(_) => "moving",
            Pending::Deleting(_) => "deleting",
        }
    }
}
