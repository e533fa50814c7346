// stepper/examples/signup_wizard.rs

use stepper::{StepContext, Stepper, StepperError};
use tracing::info;

// 1. Define the payload handed from screen to screen
#[derive(Clone, Debug, Default)]
struct Signup {
  email: String,
  password: String,
  newsletter: bool,
}

// 2. The error type is StepperError itself; a real app would wrap it:
//    #[derive(Debug, thiserror::Error)]
//    enum MyError { #[error("Stepper: {0}")] Stepper(#[from] StepperError), /* ... */ }

fn main() -> Result<(), StepperError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Signup Wizard Example ---");

  // 3. Each screen fills in its part, then hands the payload to the next screen
  let wizard = Stepper::<Signup, StepperError>::builder()
    .step(|ctx: StepContext<Signup>, mut form: Signup, _is_last: bool| {
      form.email = "ada@example.com".to_string();
      info!(email = %form.email, "Email screen done.");
      ctx.next(form)
    })
    .step(|_ctx: StepContext<Signup>, form: Signup, _is_last: bool| {
      // Wait for the user to press "continue"; the driver calls next later.
      info!(email = %form.email, has_password = !form.password.is_empty(), "Password screen shown, waiting for the user.");
      Ok(())
    })
    .step(|_ctx: StepContext<Signup>, form: Signup, is_last: bool| {
      info!(?form, is_last, "Summary screen.");
      Ok(())
    })
    .build();

  // 4. Drive the wizard
  wizard.start(Signup::default())?;
  info!(position = ?wizard.position(), "Wizard paused.");

  // 5. The user goes back one screen; nothing is re-run until they continue
  let email_screen = wizard.prev(1)?;
  info!(step = %email_screen.id(), position = ?wizard.position(), "User went back.");

  // 6. An optional screen is added after the password screen
  let password_screen = wizard.get_at(1).expect("password screen exists");
  wizard.insert_after(
    &password_screen,
    stepper::step(|ctx: StepContext<Signup>, mut form: Signup, _is_last: bool| {
      form.newsletter = true;
      info!("Newsletter screen opted in.");
      ctx.next(form)
    }),
  )?;

  // 7. Continue from the email screen, then from the password screen
  wizard.next(Signup {
    email: "ada@example.com".to_string(),
    ..Default::default()
  })?;
  password_screen.advance(Signup {
    email: "ada@example.com".to_string(),
    password: "hunter2".to_string(),
    newsletter: false,
  })?;

  info!(len = wizard.len(), position = ?wizard.position(), "Wizard finished.");
  assert_eq!(wizard.position(), Some(3));

  // 8. One more "continue" is a programming error
  if let Err(err) = wizard.next(Signup::default()) {
    info!(%err, "Advancing past the summary fails as expected.");
  }

  Ok(())
}
