// stepper/examples/compiled_chain.rs

use stepper::{on_reject, sequence, step, ChainStatus, StepContext, StepperError};
use tracing::info;

fn main() -> Result<(), StepperError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
  info!("--- Compiled Chain Example ---");

  // Parse, validate, store: the list never changes, so freeze it.
  let chain = sequence(
    vec![
      step(|ctx: StepContext<String>, raw: String, _is_last: bool| ctx.next(raw.trim().to_string())),
      step(|ctx: StepContext<String>, value: String, _is_last: bool| {
        if value.parse::<u64>().is_err() {
          return ctx.reject(value);
        }
        ctx.next(value)
      }),
      step(|ctx: StepContext<String>, value: String, is_last: bool| {
        info!(%value, is_last, "Stored.");
        ctx.next(value)
      }),
    ],
    on_reject(|value: String| {
      info!(%value, "Not a number, rejected.");
      Ok(())
    }),
  );

  for input in ["  42 ", "forty-two"] {
    let status = chain.run(input.to_string())?;
    info!(input, ?status, "Run finished.");
  }

  assert_eq!(chain.run("7".to_string())?, ChainStatus::Completed);
  Ok(())
}
