// stepper/src/chain/compiler.rs

//! Compiles an ordered list of step actions into one frozen continuation.
//!
//! Links are folded right-to-left: the last action is wrapped first around a
//! terminal continuation, then each earlier action is wrapped around the link
//! built for its successor. Running the chain only calls the outermost link.

use crate::core::action::{RejectHandler, StepAction};
use crate::core::control::{ChainStatus, RunState};
use crate::error::StepperError;
use crate::stepper::context::StepContext;
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// A continuation: runs the rest of the chain starting at some link.
pub(crate) type Continuation<P, Err> = Arc<dyn Fn(P, Arc<RunState>) -> Result<(), Err> + Send + Sync + 'static>;

/// What a step inside a compiled chain can reach: its successor and the rejection handler.
pub(crate) struct ChainLink<P, Err> {
  next: Continuation<P, Err>,
  reject: RejectHandler<P, Err>,
  run: Arc<RunState>,
}

impl<P, Err> Clone for ChainLink<P, Err> {
  fn clone(&self) -> Self {
    Self {
      next: Arc::clone(&self.next),
      reject: Arc::clone(&self.reject),
      run: Arc::clone(&self.run),
    }
  }
}

impl<P, Err> ChainLink<P, Err> {
  pub(crate) fn advance(&self, payload: P) -> Result<(), Err> {
    (self.next)(payload, Arc::clone(&self.run))
  }

  pub(crate) fn reject(&self, payload: P) -> Result<(), Err> {
    self.run.mark(ChainStatus::Rejected);
    event!(Level::DEBUG, "Compiled chain rejected.");
    (self.reject)(payload)
  }
}

/// A frozen, non-editable chain of steps produced by `sequence` or `Stepper::compile`.
pub struct Chain<P, Err = StepperError> {
  entry: Continuation<P, Err>,
  len: usize,
}

impl<P, Err> Clone for Chain<P, Err> {
  fn clone(&self) -> Self {
    Self {
      entry: Arc::clone(&self.entry),
      len: self.len,
    }
  }
}

impl<P, Err> fmt::Debug for Chain<P, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Chain").field("len", &self.len).finish()
  }
}

impl<P, Err> Chain<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Runs the chain from its first step.
  ///
  /// The returned status is read once the first step returns. A step that
  /// keeps its context to call `next` later leaves the run `Pending`.
  #[instrument(name = "Chain::run", skip_all, fields(num_steps = self.len))]
  pub fn run(&self, payload: P) -> Result<ChainStatus, Err> {
    let run = Arc::new(RunState::default());
    (self.entry)(payload, Arc::clone(&run))?;
    let status = run.status();
    event!(Level::DEBUG, ?status, "Compiled chain returned.");
    Ok(status)
  }
}

/// Builds a `Chain` from `actions`, reporting rejections to `reject`.
///
/// An empty list compiles to a chain that completes immediately. The step at
/// position `k` is called with `is_last == (k + 1 == len)`; calling `next` from
/// the last step ends the run.
pub fn sequence<P, Err>(actions: impl IntoIterator<Item = StepAction<P, Err>>, reject: RejectHandler<P, Err>) -> Chain<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  let actions: Vec<StepAction<P, Err>> = actions.into_iter().collect();
  let len = actions.len();

  let terminal: Continuation<P, Err> = Arc::new(|_payload: P, run: Arc<RunState>| {
    run.mark(ChainStatus::Completed);
    event!(Level::DEBUG, "Compiled chain completed.");
    Ok(())
  });

  let entry = actions
    .into_iter()
    .enumerate()
    .rev()
    .fold(terminal, |next, (index, action)| {
      let is_last = index + 1 == len;
      let reject = Arc::clone(&reject);
      let link: Continuation<P, Err> = Arc::new(move |payload: P, run: Arc<RunState>| {
        event!(Level::TRACE, step_index = index, is_last, "Entering compiled step.");
        let context = StepContext::for_chain(
          ChainLink {
            next: Arc::clone(&next),
            reject: Arc::clone(&reject),
            run,
          },
          is_last,
        );
        action(context, payload, is_last)
      });
      link
    });

  event!(Level::DEBUG, num_steps = len, "Chain compiled.");
  Chain { entry, len }
}
