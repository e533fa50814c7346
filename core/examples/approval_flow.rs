// stepper/examples/approval_flow.rs

use std::time::Duration;
use stepper::{step, StepContext, Stepper, StepperError};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Clone, Debug)]
struct Expense {
  id: u32,
  amount: u32,
  approvals: Vec<&'static str>,
}

#[derive(Debug)]
enum Outcome {
  Paid(Expense),
  Rejected(Expense),
}

#[derive(Debug, thiserror::Error)]
enum AppError {
  #[error("Stepper error: {0}")]
  Stepper(#[from] StepperError),
  #[error("Outcome channel closed")]
  ChannelClosed,
}

fn build_flow(outcomes: mpsc::UnboundedSender<Outcome>) -> Stepper<Expense, AppError> {
  let rejected_tx = outcomes.clone();
  Stepper::<Expense, AppError>::builder()
    // Large expenses get an extra reviewer spliced in right after triage.
    .step(|ctx: StepContext<Expense, AppError>, expense: Expense, _is_last: bool| {
      if expense.amount > 1_000 {
        info!(expense = expense.id, "Large expense, adding finance review.");
        ctx.insert_after(step(|ctx: StepContext<Expense, AppError>, mut expense: Expense, _is_last: bool| {
          expense.approvals.push("finance");
          ctx.next(expense)
        }))?;
      }
      ctx.next(expense)
    })
    // The manager answers asynchronously.
    .step(|ctx: StepContext<Expense, AppError>, mut expense: Expense, _is_last: bool| {
      tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if expense.amount > 5_000 {
          warn!(expense = expense.id, "Manager declined.");
          return ctx.reject(expense);
        }
        expense.approvals.push("manager");
        ctx.next(expense)
      });
      Ok(())
    })
    .step(move |_ctx: StepContext<Expense, AppError>, expense: Expense, is_last: bool| {
      info!(expense = expense.id, is_last, approvals = ?expense.approvals, "Paying out.");
      outcomes.send(Outcome::Paid(expense)).ok();
      Ok(())
    })
    .on_reject(move |expense: Expense| {
      rejected_tx.send(Outcome::Rejected(expense)).ok();
      Ok(())
    })
    .build()
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Approval Flow Example ---");

  for (id, amount) in [(1, 120), (2, 2_400), (3, 9_000)] {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let flow = build_flow(tx);
    flow.start(Expense {
      id,
      amount,
      approvals: Vec::new(),
    })?;

    match rx.recv().await.ok_or(AppError::ChannelClosed)? {
      Outcome::Paid(expense) => info!(expense = expense.id, steps = flow.len(), approvals = ?expense.approvals, "Paid."),
      Outcome::Rejected(expense) => warn!(expense = expense.id, position = ?flow.position(), "Rejected."),
    }
  }

  Ok(())
}
