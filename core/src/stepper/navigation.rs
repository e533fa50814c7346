// stepper/src/stepper/navigation.rs

//! Contains the driving half of `Stepper<P, Err>`: forward dispatch (`start`,
//! `next`), passive rewinding (`prev`) and rejection.
//!
//! Every method takes the state lock only long enough to move the cursor and
//! clone the callable it is about to run. The callable itself always runs with
//! the lock released, which is what lets a step call back into its stepper.

use crate::error::{StepperError, StepperResult};
use crate::stepper::context::StepContext;
use crate::stepper::definition::Stepper;
use crate::stepper::handle::StepHandle;
use std::sync::Arc;
use tracing::{event, instrument, Level};

impl<P, Err> Stepper<P, Err>
where
  P: Send + 'static,
  Err: std::error::Error + From<StepperError> + Send + Sync + 'static,
{
  /// Restarts from the first step, whatever the previous progress was.
  #[instrument(name = "Stepper::start", skip_all)]
  pub fn start(&self, payload: P) -> Result<(), Err> {
    self.state.lock().cursor = None;
    event!(Level::DEBUG, "Cursor reset, starting from the first step.");
    self.dispatch(None, payload)
  }

  /// Dispatches the step after the cursor (or the first step if unstarted).
  ///
  /// Fails with `SequenceExhausted` when the cursor already sits on the last step.
  #[instrument(name = "Stepper::next", skip_all)]
  pub fn next(&self, payload: P) -> Result<(), Err> {
    self.dispatch(None, payload)
  }

  /// Moves the cursor onto `from`, then dispatches the step after it.
  #[instrument(name = "Stepper::next_from", skip_all, fields(from = %from.id()))]
  pub fn next_from(&self, from: &StepHandle<P, Err>, payload: P) -> Result<(), Err> {
    self.dispatch(Some(from), payload)
  }

  fn dispatch(&self, from: Option<&StepHandle<P, Err>>, payload: P) -> Result<(), Err> {
    let (id, action, index, is_last) = {
      let mut state = self.state.lock();
      let base = match from {
        Some(handle) => {
          let index = self.resolve(&state, handle)?;
          state.cursor = Some(handle.id());
          Some(index)
        }
        None => state.position(),
      };

      let len = state.steps.len();
      let target = base.map_or(0, |index| index + 1);
      if target >= len {
        event!(Level::WARN, len, cursor = ?base, "No step left to dispatch.");
        return Err(Err::from(StepperError::SequenceExhausted { len }));
      }

      let record = &state.steps[target];
      let (id, action) = (record.id, Arc::clone(&record.action));
      state.cursor = Some(id);
      (id, action, target, target + 1 == len)
    };

    event!(Level::DEBUG, step_id = %id, step_index = index, is_last, "Dispatching step.");
    let context = StepContext::for_stepper(self.handle_for(id), is_last);
    action(context, payload, is_last)
  }

  /// Moves the cursor `distance` steps back from its current position and
  /// returns the step it lands on. The step is not re-run.
  #[instrument(name = "Stepper::prev", skip_all, fields(distance = distance))]
  pub fn prev(&self, distance: usize) -> StepperResult<StepHandle<P, Err>> {
    self.rewind(None, distance)
  }

  /// Like `prev`, measuring `distance` from `from` instead of the cursor.
  #[instrument(name = "Stepper::prev_from", skip_all, fields(from = %from.id(), distance = distance))]
  pub fn prev_from(&self, from: &StepHandle<P, Err>, distance: usize) -> StepperResult<StepHandle<P, Err>> {
    self.rewind(Some(from), distance)
  }

  fn rewind(&self, from: Option<&StepHandle<P, Err>>, distance: usize) -> StepperResult<StepHandle<P, Err>> {
    let id = {
      let mut state = self.state.lock();
      let origin = match from {
        Some(handle) => Some(self.resolve(&state, handle)?),
        None => state.position(),
      };
      let target = match origin.and_then(|index| index.checked_sub(distance)) {
        Some(target) => target,
        None => {
          event!(Level::WARN, position = ?origin, distance, "Rewind below the first step.");
          return Err(StepperError::NavigationOutOfRange {
            position: origin,
            distance,
          });
        }
      };
      let id = state.steps[target].id;
      state.cursor = Some(id);
      event!(Level::DEBUG, step_id = %id, step_index = target, "Cursor rewound.");
      id
    };
    Ok(self.handle_for(id))
  }

  /// Hands `payload` to the rejection handler. Cursor and steps are left untouched.
  pub fn reject(&self, payload: P) -> Result<(), Err> {
    let handler = Arc::clone(&self.state.lock().reject);
    event!(Level::DEBUG, "Rejection raised.");
    handler(payload)
  }
}
