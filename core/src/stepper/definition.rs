// stepper/src/stepper/definition.rs

//! Contains the `Stepper<P, Err>` struct definition and methods for its
//! construction, inspection and structural modification.

use crate::chain::{sequence, Chain};
use crate::core::action::{ignore_rejection, RejectHandler, StepAction};
use crate::core::id::{IdGenerator, StepId};
use crate::error::{StepperError, StepperResult};
use crate::stepper::builder::StepperBuilder;
use crate::stepper::handle::StepHandle;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// One entry of the step list. Owned exclusively by the stepper state.
pub(crate) struct StepRecord<P, Err> {
  pub(crate) id: StepId,
  pub(crate) action: StepAction<P, Err>,
}

/// Everything a stepper mutates. Guarded by a single lock that is never held
/// while user code (a step action or the rejection handler) runs.
pub(crate) struct StepperState<P, Err> {
  /// Insertion order is execution order.
  pub(crate) steps: Vec<StepRecord<P, Err>>,
  /// Identity of the most recently dispatched step, `None` while unstarted.
  pub(crate) cursor: Option<StepId>,
  pub(crate) reject: RejectHandler<P, Err>,
  pub(crate) ids: IdGenerator,
}

impl<P, Err> StepperState<P, Err> {
  pub(crate) fn index_of(&self, id: StepId) -> StepperResult<usize> {
    self
      .steps
      .iter()
      .position(|record| record.id == id)
      .ok_or(StepperError::HandleNotFound { id })
  }

  /// Current position, recomputed from the cursor identity.
  pub(crate) fn position(&self) -> Option<usize> {
    self.cursor.and_then(|id| self.index_of(id).ok())
  }

  fn insert(&mut self, index: usize, action: StepAction<P, Err>) -> StepId {
    let id = self.ids.next_id();
    self.steps.insert(index, StepRecord { id, action });
    id
  }
}

/// The step-execution controller.
///
/// `P` is the payload handed from one step to the next. `Err` is the error type
/// returned by step actions and the rejection handler; it must be constructible
/// `From<StepperError>` so navigation failures can travel through it.
///
/// Cloning a `Stepper` yields another handle to the same step list and cursor.
pub struct Stepper<P, Err = StepperError>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  pub(crate) state: Arc<Mutex<StepperState<P, Err>>>,
}

impl<P, Err> Clone for Stepper<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
    }
  }
}

impl<P, Err> fmt::Debug for Stepper<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.lock();
    f.debug_struct("Stepper")
      .field("len", &state.steps.len())
      .field("cursor", &state.cursor)
      .finish()
  }
}

impl<P, Err> Stepper<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  /// Creates an unstarted stepper over `actions` with a no-op rejection handler.
  pub fn new(actions: impl IntoIterator<Item = StepAction<P, Err>>) -> Self {
    Self::from_parts(actions.into_iter().collect(), ignore_rejection(), IdGenerator::new())
  }

  /// Creates an unstarted stepper over `actions` that reports rejections to `reject`.
  pub fn with_rejection(actions: impl IntoIterator<Item = StepAction<P, Err>>, reject: RejectHandler<P, Err>) -> Self {
    Self::from_parts(actions.into_iter().collect(), reject, IdGenerator::new())
  }

  /// Starts a fluent builder for a stepper.
  pub fn builder() -> StepperBuilder<P, Err> {
    StepperBuilder::new()
  }

  pub(crate) fn from_parts(actions: Vec<StepAction<P, Err>>, reject: RejectHandler<P, Err>, ids: IdGenerator) -> Self {
    let steps: Vec<_> = actions
      .into_iter()
      .map(|action| StepRecord {
        id: ids.next_id(),
        action,
      })
      .collect();
    event!(Level::DEBUG, num_steps = steps.len(), "Stepper created.");
    Self {
      state: Arc::new(Mutex::new(StepperState {
        steps,
        cursor: None,
        reject,
        ids,
      })),
    }
  }

  pub(crate) fn handle_for(&self, id: StepId) -> StepHandle<P, Err> {
    StepHandle::new(id, Arc::downgrade(&self.state))
  }

  /// Resolves a handle to its current position, refusing handles minted by another stepper.
  pub(crate) fn resolve(&self, state: &StepperState<P, Err>, handle: &StepHandle<P, Err>) -> StepperResult<usize> {
    if !handle.is_owned_by(&self.state) {
      event!(Level::WARN, step_id = %handle.id(), "Handle belongs to a different stepper.");
      return Err(StepperError::HandleNotFound { id: handle.id() });
    }
    state.index_of(handle.id()).map_err(|err| {
      event!(Level::WARN, step_id = %handle.id(), "Handle is no longer part of the stepper.");
      err
    })
  }

  // --- Inspection ---

  pub fn len(&self) -> usize {
    self.state.lock().steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.state.lock().steps.is_empty()
  }

  /// Position of the most recently dispatched step, or `None` if unstarted.
  pub fn position(&self) -> Option<usize> {
    self.state.lock().position()
  }

  /// Handle of the most recently dispatched step.
  pub fn current(&self) -> Option<StepHandle<P, Err>> {
    let cursor = self.state.lock().cursor;
    cursor.map(|id| self.handle_for(id))
  }

  /// Handles for every step, in execution order.
  pub fn handles(&self) -> Vec<StepHandle<P, Err>> {
    let ids: Vec<StepId> = self.state.lock().steps.iter().map(|record| record.id).collect();
    ids.into_iter().map(|id| self.handle_for(id)).collect()
  }

  /// The id source of this stepper. Hand a clone to another builder to keep ids disjoint.
  pub fn id_generator(&self) -> IdGenerator {
    self.state.lock().ids.clone()
  }

  /// Position of `handle`, found by identity.
  pub fn lookup_index(&self, handle: &StepHandle<P, Err>) -> StepperResult<usize> {
    let state = self.state.lock();
    let index = self.resolve(&state, handle)?;
    event!(Level::TRACE, step_id = %handle.id(), index, "Handle resolved.");
    Ok(index)
  }

  pub fn get_at(&self, index: usize) -> Option<StepHandle<P, Err>> {
    let id = self.state.lock().steps.get(index).map(|record| record.id);
    id.map(|id| self.handle_for(id))
  }

  // --- Structural edits ---

  /// Appends `action` as a new step.
  pub fn add(&self, action: StepAction<P, Err>) -> StepHandle<P, Err> {
    let id = {
      let mut state = self.state.lock();
      let index = state.steps.len();
      let id = state.insert(index, action);
      event!(Level::DEBUG, step_id = %id, index, "Step appended.");
      id
    };
    self.handle_for(id)
  }

  /// Inserts `action` as a new step at `index`, anywhere in `0..=len`.
  pub fn add_at(&self, action: StepAction<P, Err>, index: usize) -> StepperResult<StepHandle<P, Err>> {
    let id = {
      let mut state = self.state.lock();
      let len = state.steps.len();
      if index > len {
        event!(Level::WARN, index, len, "Insert index out of range.");
        return Err(StepperError::IndexOutOfRange { index, len });
      }
      let id = state.insert(index, action);
      event!(Level::DEBUG, step_id = %id, index, "Step inserted.");
      id
    };
    Ok(self.handle_for(id))
  }

  pub fn insert_before(&self, handle: &StepHandle<P, Err>, action: StepAction<P, Err>) -> StepperResult<StepHandle<P, Err>> {
    self.insert_relative(handle, action, 0)
  }

  pub fn insert_after(&self, handle: &StepHandle<P, Err>, action: StepAction<P, Err>) -> StepperResult<StepHandle<P, Err>> {
    self.insert_relative(handle, action, 1)
  }

  fn insert_relative(
    &self,
    handle: &StepHandle<P, Err>,
    action: StepAction<P, Err>,
    offset: usize,
  ) -> StepperResult<StepHandle<P, Err>> {
    let id = {
      let mut state = self.state.lock();
      let index = self.resolve(&state, handle)? + offset;
      let id = state.insert(index, action);
      event!(Level::DEBUG, step_id = %id, anchor = %handle.id(), index, "Step inserted next to anchor.");
      id
    };
    Ok(self.handle_for(id))
  }

  /// Removes the step behind `handle`.
  ///
  /// If it was the active step, the cursor falls back to the step now preceding
  /// it, or to unstarted when it was the first one.
  pub fn remove(&self, handle: &StepHandle<P, Err>) -> StepperResult<()> {
    let removed = {
      let mut state = self.state.lock();
      let index = self.resolve(&state, handle)?;
      let removed = state.steps.remove(index);
      if state.cursor == Some(removed.id) {
        let fallback = index.checked_sub(1).map(|prev| state.steps[prev].id);
        state.cursor = fallback;
        event!(Level::DEBUG, step_id = %removed.id, index, cursor = ?fallback, "Active step removed, cursor moved back.");
      } else {
        event!(Level::DEBUG, step_id = %removed.id, index, "Step removed.");
      }
      removed
    };
    // The action may own captures with their own drop logic; release it outside the lock.
    drop(removed);
    Ok(())
  }

  /// Exchanges the positions of two steps. The cursor keeps following the step it pointed at.
  pub fn swap(&self, a: &StepHandle<P, Err>, b: &StepHandle<P, Err>) -> StepperResult<()> {
    let mut state = self.state.lock();
    let first = self.resolve(&state, a)?;
    let second = self.resolve(&state, b)?;
    state.steps.swap(first, second);
    event!(Level::DEBUG, a = %a.id(), b = %b.id(), first, second, "Steps swapped.");
    Ok(())
  }

  // --- Freezing ---

  /// Freezes the current step list and rejection handler into a standalone `Chain`.
  ///
  /// Later edits to this stepper do not affect the returned chain.
  pub fn compile(&self) -> Chain<P, Err> {
    let (actions, reject) = {
      let state = self.state.lock();
      let actions: Vec<StepAction<P, Err>> = state.steps.iter().map(|record| Arc::clone(&record.action)).collect();
      (actions, Arc::clone(&state.reject))
    };
    event!(Level::DEBUG, num_steps = actions.len(), "Compiling stepper snapshot.");
    sequence(actions, reject)
  }
}
