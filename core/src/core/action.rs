// stepper/src/core/action.rs

//! Defines the `StepAction<P, Err>` and `RejectHandler<P, Err>` callable types,
//! and helpers that wrap closures into them.

use crate::error::StepperError;
use crate::stepper::context::StepContext;
use std::sync::Arc;

/// Type alias for one stage of a stepper or compiled chain.
///
/// An action is called with:
/// 1. a `StepContext` scoped to its own position, through which it decides what
///    happens next (`next`, `prev`, `reject`, or editing the remaining steps);
/// 2. the payload handed to whoever advanced into it;
/// 3. `is_last`, true iff the action is the final step at dispatch time.
///
/// The action may keep the context and call `next` much later, e.g. from a
/// spawned task. Errors returned by context calls should be propagated with `?`
/// so they reach the caller that drove the step.
pub type StepAction<P, Err = StepperError> =
  Arc<dyn Fn(StepContext<P, Err>, P, bool) -> Result<(), Err> + Send + Sync + 'static>;

/// Type alias for the callable that receives rejection payloads.
pub type RejectHandler<P, Err = StepperError> = Arc<dyn Fn(P) -> Result<(), Err> + Send + Sync + 'static>;

/// Wraps a closure into a `StepAction`, letting the compiler infer its argument types.
pub fn step<P, Err, F>(f: F) -> StepAction<P, Err>
where
  F: Fn(StepContext<P, Err>, P, bool) -> Result<(), Err> + Send + Sync + 'static,
{
  Arc::new(f)
}

/// Wraps a closure into a `RejectHandler`.
pub fn on_reject<P, Err, F>(f: F) -> RejectHandler<P, Err>
where
  F: Fn(P) -> Result<(), Err> + Send + Sync + 'static,
{
  Arc::new(f)
}

/// The default rejection handler: accepts the payload and does nothing.
pub(crate) fn ignore_rejection<P, Err>() -> RejectHandler<P, Err>
where
  P: 'static,
  Err: 'static,
{
  Arc::new(|_payload: P| Ok(()))
}
