// src/lib.rs

//! Stepper: an editable, inspectable step-execution controller for Rust.
//!
//! A `Stepper` drives an ordered list of step actions one at a time. Each step
//! receives a navigation context and a payload and decides what happens next:
//!  - advance to the following step (now, or later from another task),
//!  - rewind the cursor without re-running anything,
//!  - reject, handing a payload to a single rejection handler,
//!  - edit the remaining steps (insert before/after itself, remove itself).
//!
//! When no further edits are needed, `Stepper::compile` (or `sequence`) freezes
//! the steps into a `Chain`, a single composed continuation with no cursor.

pub mod chain;
pub mod core;
pub mod error;
pub mod stepper;

// --- Re-exports for the Public API ---

pub use crate::core::action::{on_reject, step, RejectHandler, StepAction};
pub use crate::core::control::ChainStatus;
pub use crate::core::id::{IdGenerator, StepId};

pub use crate::stepper::{StepContext, StepHandle, Stepper, StepperBuilder};

pub use crate::chain::{sequence, Chain};

pub use crate::error::{StepperError, StepperResult};

/*
    Typical use:
    1. Pick a payload type `P` and an error type `Err: From<StepperError>` (or just `StepperError`).
    2. Build a stepper with `Stepper::<P, Err>::builder().step(..).step(..).on_reject(..).build()`.
    3. Inside each step, call `ctx.next(payload)?` to move on, `ctx.reject(payload)?` to bail out,
       or `ctx.insert_after(step(..))?` / `ctx.remove()?` to reshape what is left.
    4. Drive it with `stepper.start(payload)?`. Steps may keep `ctx` and advance later.
    5. Once the list is settled, `stepper.compile().run(payload)?` runs a frozen copy.
*/
