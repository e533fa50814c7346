// stepper/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::core::id::StepId;

/// Failures raised by the stepper and the chain compiler.
///
/// Every variant is a programmer-visible failure surfaced synchronously at the
/// call that triggered it. Rejection is deliberately absent: it is a signal
/// delivered to the rejection handler, not an error.
#[derive(Debug, Error)]
pub enum StepperError {
  #[error("Execution already ended: no step after the last of {len} step(s)")]
  SequenceExhausted { len: usize },

  #[error("Cannot rewind {distance} step(s) from position {position:?}")]
  NavigationOutOfRange { position: Option<usize>, distance: usize },

  #[error("Step not found: {id}")]
  HandleNotFound { id: StepId },

  #[error("Insert index {index} is out of range for {len} step(s)")]
  IndexOutOfRange { index: usize, len: usize },

  #[error("'{operation}' is not available inside a compiled chain")]
  ChainFrozen { operation: &'static str },

  #[error("Step failed. Source: {source}")]
  StepFailed {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for StepperError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a StepperError that was boxed into anyhow on its way out of a step,
    // so callers can still match on the original variant.
    match err.downcast::<StepperError>() {
      Ok(inner) => inner,
      Err(source) => StepperError::StepFailed { source },
    }
  }
}

pub type StepperResult<T, E = StepperError> = std::result::Result<T, E>;
