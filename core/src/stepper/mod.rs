// stepper/src/stepper/mod.rs

//! Defines the `Stepper<P, Err>` controller, its handles, navigation context and builder.

pub mod builder;
pub mod context;
pub mod definition;
pub mod handle;
pub mod navigation;

pub use builder::StepperBuilder;
pub use context::StepContext;
pub use definition::Stepper;
pub use handle::StepHandle;
