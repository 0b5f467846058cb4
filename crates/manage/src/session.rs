//! Admin category management session
//!
//! Arms at most one structural mutation at a time and dispatches it to the
//! server. While a request is in flight every further intent is refused.
//! On failure the armed operation stays in place together with the error so
//! the admin can retry or cancel; on success the refreshed forest replaces
//! the shared snapshot and the operation is disarmed.

use crate::api::{ApiError, CategoryApi, MoveCategory, NewCategory, RenameCategory};
use crate::context::TreeContext;
use crate::error::ManageError;
use crate::state::Pending;
use crate::Result;
use canopy_core::{Category, CategoryId, CategoryTree};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Observable state of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Armed operation
    pub pending: Pending,
    /// A request is in flight
    pub loading: bool,
    /// Outcome of the last failed request
    pub error: Option<ManageError>,
}

/// Management session over a category server
pub struct ManagementSession<A> {
    api: A,
    context: TreeContext,
    state: Mutex<SessionState>,
}

/// Clears `loading` however the request future ends, including drop
struct LoadingGuard<'a>(&'a Mutex<SessionState>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().loading = false;
    }
}

impl<A: CategoryApi> ManagementSession<A> {
    /// Session over an existing snapshot
    pub fn new(api: A, context: TreeContext) -> Self {
        Self {
            api,
            context,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Fetch the forest and start a session over it
    pub async fn load(api: A) -> Result<Self> {
        let roots = api.fetch_tree().await?;
        info!("Loaded category forest ({} roots)", roots.len());
        Ok(Self::new(api, TreeContext::new(roots)))
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Shared snapshot handle
    pub fn context(&self) -> &TreeContext {
        &self.context
    }

    pub fn snapshot(&self) -> Arc<CategoryTree> {
        self.context.snapshot()
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn pending(&self) -> Pending {
        self.state.lock().pending
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<ManageError> {
        self.state.lock().error.clone()
    }

    /// Start composing a child of `parent` (`None` for the top level)
    pub fn begin_add(&self, parent: Option<CategoryId>) -> Result<()> {
        if let Some(parent) = parent {
            self.require_known(parent)?;
        }
        self.arm(Pending::Adding { parent })
    }

    /// Start renaming `id`
    pub fn begin_edit(&self, id: CategoryId) -> Result<()> {
        self.require_known(id)?;
        self.arm(Pending::Editing(id))
    }

    /// Arm `id` as the source of a move
    pub fn begin_move(&self, id: CategoryId) -> Result<()> {
        self.require_known(id)?;
        self.arm(Pending::Moving(id))
    }

    /// Ask for delete confirmation; only leaves qualify
    pub fn begin_delete(&self, id: CategoryId) -> Result<()> {
        let tree = self.snapshot();
        if !tree.contains(id) {
            return Err(ManageError::UnknownCategory(id));
        }
        if !tree.can_delete(id) {
            return Err(ManageError::HasChildren(id));
        }
        self.arm(Pending::Deleting(id))
    }

    /// Disarm whatever is pending and clear the error
    pub fn cancel(&self) -> Result<()> {
        self.arm(Pending::Idle)
    }

    /// Disarm a move
    pub fn cancel_move(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.loading {
            return Err(ManageError::Busy);
        }
        match state.pending {
            Pending::Moving(_) => {
                state.pending = Pending::Idle;
                Ok(())
            }
            _ => Err(ManageError::NothingPending),
        }
    }

    /// Submit the new category being composed
    pub async fn create(&self, name: &str) -> Result<Arc<CategoryTree>> {
        let pending = self.pending();
        let parent = pending.add_target().ok_or(ManageError::NothingPending)?;
        let name = non_empty(name)?;

        let request = NewCategory {
            name: name.to_string(),
            parent_id: parent,
        };
        info!("Creating category '{}' under {:?}", name, parent);
        self.dispatch(Some(pending), self.api.create(&request)).await
    }

    /// Submit the rename being composed
    pub async fn update(&self, name: &str) -> Result<Arc<CategoryTree>> {
        let pending = self.pending();
        let id = pending.edit_target().ok_or(ManageError::NothingPending)?;
        let name = non_empty(name)?;

        let request = RenameCategory {
            name: name.to_string(),
        };
        info!("Renaming category {} to '{}'", id, name);
        self.dispatch(Some(pending), self.api.rename(id, &request)).await
    }

    /// Complete an armed move by dropping the source onto `target`
    pub async fn drop_on(&self, target: CategoryId) -> Result<Arc<CategoryTree>> {
        let pending = self.pending();
        let source = pending.move_source().ok_or(ManageError::NothingPending)?;

        let tree = self.snapshot();
        if source != target && !tree.contains(target) {
            return Err(ManageError::UnknownCategory(target));
        }
        if !tree.is_valid_move_target(source, target) {
            return Err(ManageError::InvalidMoveTarget {
                category: source,
                target,
            });
        }

        let request = MoveCategory {
            parent_id: Some(target),
        };
        info!("Moving category {} under {}", source, target);
        self.dispatch(Some(pending), self.api.reparent(source, &request))
            .await
    }

    /// Reparent `id` to the top level
    ///
    /// On success disarms the pending operation only if it involves `id`.
    pub async fn move_to_top(&self, id: CategoryId) -> Result<Arc<CategoryTree>> {
        let pending = self.pending();
        let expected = pending.involves(id).then_some(pending);

        let tree = self.snapshot();
        let node = tree.get(id).ok_or(ManageError::UnknownCategory(id))?;
        if node.parent_id.is_none() {
            return Err(ManageError::AlreadyTopLevel(id));
        }

        let request = MoveCategory { parent_id: None };
        info!("Moving category {} to the top level", id);
        self.dispatch(expected, self.api.reparent(id, &request))
            .await
    }

    /// Delete the category awaiting confirmation
    pub async fn confirm_delete(&self) -> Result<Arc<CategoryTree>> {
        let pending = self.pending();
        let id = pending.delete_target().ok_or(ManageError::NothingPending)?;

        // Snapshot may have been refreshed since the delete was armed
        if self.snapshot().get(id).is_some_and(|node| !node.is_leaf()) {
            return Err(ManageError::HasChildren(id));
        }

        info!("Deleting category {}", id);
        self.dispatch(Some(pending), self.api.delete(id)).await
    }

    /// Refetch the forest without touching the armed operation
    pub async fn refresh(&self) -> Result<Arc<CategoryTree>> {
        self.dispatch(None, self.api.fetch_tree()).await
    }

    fn arm(&self, pending: Pending) -> Result<()> {
        let mut state = self.state.lock();
        if state.loading {
            return Err(ManageError::Busy);
        }
        debug!("Pending {} -> {}", state.pending.label(), pending.label());
        state.pending = pending;
        state.error = None;
        Ok(())
    }

    fn require_known(&self, id: CategoryId) -> Result<()> {
        if self.snapshot().contains(id) {
            Ok(())
        } else {
            Err(ManageError::UnknownCategory(id))
        }
    }

    /// Run one request under the loading flag and reconcile its outcome
    ///
    /// `request` is lazy; nothing is sent unless the session is free.
    async fn dispatch<F>(&self, expected: Option<Pending>, request: F) -> Result<Arc<CategoryTree>>
    where
        F: Future<Output = std::result::Result<Vec<Category>, ApiError>>,
    {
        {
            let mut state = self.state.lock();
            if state.loading {
                return Err(ManageError::Busy);
            }
            state.loading = true;
            state.error = None;
        }
        let _loading = LoadingGuard(&self.state);

        let outcome = request.await;

        let mut state = self.state.lock();
        match outcome {
            Ok(roots) => {
                let tree = self.context.replace(roots);
                if expected == Some(state.pending) {
                    state.pending = Pending::Idle;
                }
                Ok(tree)
            }
            Err(err) => {
                warn!("Category request failed: {}", err);
                let err = ManageError::from(err);
                state.error = Some(err.clone());
                Err(err)
            }
        }
    }
}

fn non_empty(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(ManageError::EmptyName)
    } else {
        Ok(name)
    }
}
