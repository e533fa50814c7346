// stepper/src/stepper/builder.rs

//! Implements the fluent `StepperBuilder` API for assembling a `Stepper<P, Err>`.

use crate::core::action::{ignore_rejection, RejectHandler, StepAction};
use crate::core::id::IdGenerator;
use crate::error::StepperError;
use crate::stepper::context::StepContext;
use crate::stepper::definition::Stepper;
use std::sync::Arc;

/// Builder for a `Stepper<P, Err>`.
///
/// Steps are appended in call order. Without `on_reject` the stepper ignores
/// rejections; without `id_generator` it gets a fresh id source of its own.
pub struct StepperBuilder<P, Err = StepperError>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  actions: Vec<StepAction<P, Err>>,
  reject: Option<RejectHandler<P, Err>>,
  ids: Option<IdGenerator>,
}

impl<P, Err> Default for StepperBuilder<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<P, Err> StepperBuilder<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      actions: Vec::new(),
      reject: None,
      ids: None,
    }
  }

  /// Appends a step given as a closure.
  pub fn step<F>(mut self, f: F) -> Self
  where
    F: Fn(StepContext<P, Err>, P, bool) -> Result<(), Err> + Send + Sync + 'static,
  {
    self.actions.push(Arc::new(f));
    self
  }

  /// Appends an already wrapped step action.
  pub fn action(mut self, action: StepAction<P, Err>) -> Self {
    self.actions.push(action);
    self
  }

  pub fn steps(mut self, actions: impl IntoIterator<Item = StepAction<P, Err>>) -> Self {
    self.actions.extend(actions);
    self
  }

  pub fn on_reject<F>(mut self, f: F) -> Self
  where
    F: Fn(P) -> Result<(), Err> + Send + Sync + 'static,
  {
    self.reject = Some(Arc::new(f));
    self
  }

  /// Draws step ids from `ids`, typically shared with other steppers.
  pub fn id_generator(mut self, ids: IdGenerator) -> Self {
    self.ids = Some(ids);
    self
  }

  pub fn build(self) -> Stepper<P, Err> {
    Stepper::from_parts(
      self.actions,
      self.reject.unwrap_or_else(ignore_rejection),
      self.ids.unwrap_or_default(),
    )
  }
}
