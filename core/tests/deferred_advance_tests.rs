// tests/deferred_advance_tests.rs
mod common;

use common::*;
use std::time::Duration;
use stepper::{on_reject, sequence, step, ChainStatus, StepContext, Stepper};
use tokio::sync::mpsc;

/// A step that hands its context to a spawned task, which advances after a short delay.
fn deferred_step(trace: &Trace, name: &'static str) -> TestStep {
  let trace = trace.clone();
  step(move |ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("{name}({payload},{is_last})"));
    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(5)).await;
      ctx.next(payload + 1)
    });
    Ok(())
  })
}

/// Last step: reports the payload it received back to the test.
fn reporting_step(trace: &Trace, done: mpsc::UnboundedSender<u32>) -> TestStep {
  let trace = trace.clone();
  step(move |_ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("report({payload},{is_last})"));
    done.send(payload).ok();
    Ok(())
  })
}

#[tokio::test]
async fn test_stepper_advances_from_spawned_tasks() {
  setup_tracing();
  let trace = Trace::new();
  let (done_tx, mut done_rx) = mpsc::unbounded_channel();

  let stepper = Stepper::new(vec![
    deferred_step(&trace, "fetch"),
    deferred_step(&trace, "validate"),
    reporting_step(&trace, done_tx),
  ]);

  stepper.start(0).unwrap();
  // Only the first step has run synchronously.
  assert_eq!(stepper.position(), Some(0));

  let final_payload = tokio::time::timeout(Duration::from_secs(5), done_rx.recv())
    .await
    .expect("pipeline did not finish in time")
    .expect("reporting step dropped the sender");

  assert_eq!(final_payload, 2);
  assert_eq!(stepper.position(), Some(2));
  assert_eq!(
    trace.entries(),
    vec!["fetch(0,false)", "validate(1,false)", "report(2,true)"]
  );
}

#[tokio::test]
async fn test_deferred_step_sees_edits_made_while_waiting() {
  setup_tracing();
  let trace = Trace::new();
  let (done_tx, mut done_rx) = mpsc::unbounded_channel();

  let stepper = Stepper::new(vec![deferred_step(&trace, "wait"), reporting_step(&trace, done_tx)]);
  stepper.start(10).unwrap();

  // While "wait" is parked, splice a step in behind it.
  let waiting = stepper.current().unwrap();
  waiting.insert_after(passive_forward(&trace)).unwrap();

  let final_payload = tokio::time::timeout(Duration::from_secs(5), done_rx.recv())
    .await
    .expect("pipeline did not finish in time")
    .expect("reporting step dropped the sender");

  assert_eq!(final_payload, 11);
  assert_eq!(trace.entries(), vec!["wait(10,false)", "spliced(11,false)", "report(11,true)"]);
}

fn passive_forward(trace: &Trace) -> TestStep {
  let trace = trace.clone();
  step(move |ctx: StepContext<u32, TestError>, payload: u32, is_last: bool| {
    trace.record(format!("spliced({payload},{is_last})"));
    ctx.next(payload)
  })
}

#[tokio::test]
async fn test_compiled_chain_is_pending_until_deferred_step_advances() {
  setup_tracing();
  let trace = Trace::new();
  let (done_tx, mut done_rx) = mpsc::unbounded_channel();

  let chain = sequence(
    vec![deferred_step(&trace, "wait"), reporting_step(&trace, done_tx)],
    on_reject(|_payload: u32| Ok::<(), TestError>(())),
  );

  assert_eq!(chain.run(1).unwrap(), ChainStatus::Pending);

  let final_payload = tokio::time::timeout(Duration::from_secs(5), done_rx.recv())
    .await
    .expect("chain did not finish in time")
    .expect("reporting step dropped the sender");
  assert_eq!(final_payload, 2);
}
