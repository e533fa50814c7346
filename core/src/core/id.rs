// stepper/src/core/id.rs

//! Step identities and the generator that hands them out.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of one step record. Assigned once, never reused by the generator
/// that produced it, never derived from a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(u64);

impl StepId {
  pub fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for StepId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Monotonic source of `StepId`s.
///
/// Each stepper owns one by default. Clones share the same counter, so passing
/// a clone to several steppers keeps their ids disjoint.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator(Arc<AtomicU64>);

impl IdGenerator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn next_id(&self) -> StepId {
    StepId(self.0.fetch_add(1, Ordering::Relaxed))
  }

  /// Number of ids handed out so far.
  pub fn issued(&self) -> u64 {
    self.0.load(Ordering::Relaxed)
  }
}
