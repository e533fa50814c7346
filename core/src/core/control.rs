// stepper/src/core/control.rs

//! Outcome of a compiled chain run.

use std::sync::atomic::{AtomicU8, Ordering};

/// Where a compiled chain run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStatus {
  /// No step has completed the chain or rejected it yet. Either a step is
  /// holding its context to call `next` later, or nobody is driving anymore.
  Pending,
  /// The last step called `next`, or the chain had no steps at all.
  Completed,
  /// A step called `reject`.
  Rejected,
}

impl ChainStatus {
  fn from_u8(raw: u8) -> Self {
    match raw {
      1 => ChainStatus::Completed,
      2 => ChainStatus::Rejected,
      _ => ChainStatus::Pending,
    }
  }

  fn as_u8(self) -> u8 {
    match self {
      ChainStatus::Pending => 0,
      ChainStatus::Completed => 1,
      ChainStatus::Rejected => 2,
    }
  }
}

/// Per-run status cell shared by every link context of one `Chain::run` call.
#[derive(Debug, Default)]
pub(crate) struct RunState(AtomicU8);

impl RunState {
  pub(crate) fn status(&self) -> ChainStatus {
    ChainStatus::from_u8(self.0.load(Ordering::Acquire))
  }

  pub(crate) fn mark(&self, status: ChainStatus) {
    self.0.store(status.as_u8(), Ordering::Release);
  }
}
