// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use parking_lot::Mutex;
use std::sync::Arc;
use stepper::{step, StepAction, StepContext, StepperError};
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error)]
pub enum TestError {
  #[error("Stepper error: {0}")]
  Stepper(#[from] StepperError),

  #[error("Test step failed: {0}")]
  Step(String),

  #[error("Test rejection handler failed: {0}")]
  Rejection(String),
}

impl TestError {
  /// The wrapped stepper error, if this is one.
  pub fn stepper(&self) -> Option<&StepperError> {
    match self {
      TestError::Stepper(inner) => Some(inner),
      _ => None,
    }
  }
}

pub type TestStep = StepAction<u32, TestError>;

// --- Recording of step invocations ---

/// Shared log of what ran, in order. Entries look like `name(payload,is_last)`.
#[derive(Clone, Debug, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&self, entry: impl Into<String>) {
    self.0.lock().push(entry.into());
  }

  pub fn entries(&self) -> Vec<String> {
    self.0.lock().clone()
  }

  pub fn len(&self) -> usize {
    self.0.lock().len()
  }
}

// --- Common Step Creators ---

/// Records its invocation and returns without advancing.
pub fn passive_step(trace: &Trace, name: &'static str) -> TestStep {
  let trace = trace.clone();
  step(move |_ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("{name}({payload},{is_last})"));
    Ok(())
  })
}

/// Records its invocation, then advances with `payload + 1` unless it is the last step.
pub fn forward_step(trace: &Trace, name: &'static str) -> TestStep {
  let trace = trace.clone();
  step(move |ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("{name}({payload},{is_last})"));
    if is_last {
      return Ok(());
    }
    ctx.next(payload + 1)
  })
}

/// Records its invocation and always advances, even from the last step.
pub fn eager_step(trace: &Trace, name: &'static str) -> TestStep {
  let trace = trace.clone();
  step(move |ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("{name}({payload},{is_last})"));
    ctx.next(payload)
  })
}

/// Records its invocation and rejects with the payload it received.
pub fn rejecting_step(trace: &Trace, name: &'static str) -> TestStep {
  let trace = trace.clone();
  step(move |ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("{name}({payload},{is_last})"));
    ctx.reject(payload)
  })
}

pub fn failing_step(trace: &Trace, name: &'static str, message: &'static str) -> TestStep {
  let trace = trace.clone();
  step(move |_ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("{name}({payload},{is_last})"));
    Err(TestError::Step(message.to_string()))
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::TRACE)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
