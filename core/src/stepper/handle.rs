// stepper/src/stepper/handle.rs

//! Defines `StepHandle`, the identity token external callers and step actions
//! use to address one step of a `Stepper`.

use crate::core::action::StepAction;
use crate::core::id::StepId;
use crate::error::{StepperError, StepperResult};
use crate::stepper::definition::{Stepper, StepperState};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// A lightweight token for one step.
///
/// The handle only remembers the step's id and a weak back-reference to the
/// stepper that owns the step record. Every operation re-resolves the id
/// against the stepper, so a handle whose step was removed (or whose stepper
/// was dropped) fails with `HandleNotFound` instead of acting on a stale slot.
pub struct StepHandle<P, Err = StepperError> {
  id: StepId,
  owner: Weak<Mutex<StepperState<P, Err>>>,
}

impl<P, Err> StepHandle<P, Err> {
  pub(crate) fn new(id: StepId, owner: Weak<Mutex<StepperState<P, Err>>>) -> Self {
    Self { id, owner }
  }

  pub fn id(&self) -> StepId {
    self.id
  }

  pub(crate) fn is_owned_by(&self, state: &Arc<Mutex<StepperState<P, Err>>>) -> bool {
    std::ptr::eq(self.owner.as_ptr(), Arc::as_ptr(state))
  }
}

impl<P, Err> Clone for StepHandle<P, Err> {
  fn clone(&self) -> Self {
    Self {
      id: self.id,
      owner: Weak::clone(&self.owner),
    }
  }
}

// Same id and same owning stepper. Ids from unrelated generators may coincide,
// the owner check keeps such handles apart.
impl<P, Err> PartialEq for StepHandle<P, Err> {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id && Weak::ptr_eq(&self.owner, &other.owner)
  }
}

impl<P, Err> Eq for StepHandle<P, Err> {}

impl<P, Err> fmt::Debug for StepHandle<P, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StepHandle")
      .field("id", &self.id)
      .field("owner_alive", &(self.owner.strong_count() > 0))
      .finish()
  }
}

impl<P, Err> StepHandle<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  fn stepper(&self) -> StepperResult<Stepper<P, Err>> {
    self
      .owner
      .upgrade()
      .map(|state| Stepper { state })
      .ok_or(StepperError::HandleNotFound { id: self.id })
  }

  /// Current position of this step.
  pub fn index(&self) -> StepperResult<usize> {
    self.stepper()?.lookup_index(self)
  }

  /// Whether the step is still part of a live stepper.
  pub fn is_attached(&self) -> bool {
    self.index().is_ok()
  }

  /// Dispatches the step after this one.
  pub fn advance(&self, payload: P) -> Result<(), Err> {
    self.stepper()?.next_from(self, payload)
  }

  /// Moves the cursor `distance` steps back from this step, without re-running anything.
  pub fn rewind(&self, distance: usize) -> StepperResult<StepHandle<P, Err>> {
    self.stepper()?.prev_from(self, distance)
  }

  /// Removes this step from its stepper. Every later call on this handle fails.
  pub fn detach(&self) -> StepperResult<()> {
    self.stepper()?.remove(self)
  }

  /// Hands `payload` to the stepper's rejection handler.
  pub fn reject(&self, payload: P) -> Result<(), Err> {
    let stepper = self.stepper()?;
    stepper.lookup_index(self)?;
    stepper.reject(payload)
  }

  pub fn insert_after(&self, action: StepAction<P, Err>) -> StepperResult<StepHandle<P, Err>> {
    self.stepper()?.insert_after(self, action)
  }

  pub fn insert_before(&self, action: StepAction<P, Err>) -> StepperResult<StepHandle<P, Err>> {
    self.stepper()?.insert_before(self, action)
  }
}
