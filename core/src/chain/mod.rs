// stepper/src/chain/mod.rs

//! Freezes a list of step actions into a single composed continuation.
//!
//! A compiled `Chain` has no cursor, no handles and no editable list. It is
//! the cheap path when the steps are settled and only need to be run.

pub mod compiler;

pub(crate) use compiler::ChainLink;
pub use compiler::{sequence, Chain};
