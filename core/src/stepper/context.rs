// stepper/src/stepper/context.rs

//! Defines `StepContext`, the navigation context handed to every step action.
//!
//! The same context type serves both execution paths so that one action can
//! run inside a `Stepper` or inside a compiled `Chain`. Inside a chain only
//! `next` and `reject` are available; the editing and rewinding calls fail
//! with `StepperError::ChainFrozen`.

use crate::chain::ChainLink;
use crate::core::action::StepAction;
use crate::error::{StepperError, StepperResult};
use crate::stepper::handle::StepHandle;

enum Link<P, Err> {
  Stepper(StepHandle<P, Err>),
  Chain(ChainLink<P, Err>),
}

impl<P, Err> Clone for Link<P, Err> {
  fn clone(&self) -> Self {
    match self {
      Link::Stepper(handle) => Link::Stepper(handle.clone()),
      Link::Chain(link) => Link::Chain(link.clone()),
    }
  }
}

/// Navigation capabilities scoped to the step that received them.
pub struct StepContext<P, Err = StepperError> {
  link: Link<P, Err>,
  is_last: bool,
}

impl<P, Err> Clone for StepContext<P, Err> {
  fn clone(&self) -> Self {
    Self {
      link: self.link.clone(),
      is_last: self.is_last,
    }
  }
}

impl<P, Err> std::fmt::Debug for StepContext<P, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut debug = f.debug_struct("StepContext");
    match &self.link {
      Link::Stepper(handle) => debug.field("step", &handle.id()),
      Link::Chain(_) => debug.field("step", &"<compiled>"),
    };
    debug.field("is_last", &self.is_last).finish()
  }
}

impl<P, Err> StepContext<P, Err> {
  pub(crate) fn for_stepper(handle: StepHandle<P, Err>, is_last: bool) -> Self {
    Self {
      link: Link::Stepper(handle),
      is_last,
    }
  }

  pub(crate) fn for_chain(link: ChainLink<P, Err>, is_last: bool) -> Self {
    Self {
      link: Link::Chain(link),
      is_last,
    }
  }

  /// Whether this step was the last one when it was dispatched.
  pub fn is_last(&self) -> bool {
    self.is_last
  }

  /// Handle of this step, or `None` inside a compiled chain.
  pub fn handle(&self) -> Option<&StepHandle<P, Err>> {
    match &self.link {
      Link::Stepper(handle) => Some(handle),
      Link::Chain(_) => None,
    }
  }
}

impl<P, Err> StepContext<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  fn editable(&self, operation: &'static str) -> StepperResult<&StepHandle<P, Err>> {
    match &self.link {
      Link::Stepper(handle) => Ok(handle),
      Link::Chain(_) => Err(StepperError::ChainFrozen { operation }),
    }
  }

  /// Runs the step after this one with `payload`.
  pub fn next(&self, payload: P) -> Result<(), Err> {
    match &self.link {
      Link::Stepper(handle) => handle.advance(payload),
      Link::Chain(link) => link.advance(payload),
    }
  }

  /// Hands `payload` to the rejection handler.
  pub fn reject(&self, payload: P) -> Result<(), Err> {
    match &self.link {
      Link::Stepper(handle) => handle.reject(payload),
      Link::Chain(link) => link.reject(payload),
    }
  }

  /// Moves the cursor `distance` steps back from this step.
  pub fn prev(&self, distance: usize) -> StepperResult<StepHandle<P, Err>> {
    self.editable("prev")?.rewind(distance)
  }

  /// Removes this step.
  pub fn remove(&self) -> StepperResult<()> {
    self.editable("remove")?.detach()
  }

  pub fn insert_after(&self, action: StepAction<P, Err>) -> StepperResult<StepHandle<P, Err>> {
    self.editable("insert_after")?.insert_after(action)
  }

  pub fn insert_before(&self, action: StepAction<P, Err>) -> StepperResult<StepHandle<P, Err>> {
    self.editable("insert_before")?.insert_before(action)
  }
}
