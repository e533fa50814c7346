pub mod action;
pub mod control;
pub mod id;

// Re-export key types for easier access from other stepper modules (and lib.rs)
pub use action::{on_reject, step, RejectHandler, StepAction};
pub use control::ChainStatus;
pub use id::{IdGenerator, StepId};
