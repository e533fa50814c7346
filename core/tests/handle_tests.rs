// tests/handle_tests.rs
mod common;

use common::*;
use std::collections::HashSet;
use stepper::{on_reject, IdGenerator, Stepper, StepperError};

#[test]
fn test_detached_handle_fails_every_operation() {
  setup_tracing();
  let trace = Trace::new();
  let rejected = Trace::new();
  let stepper: Stepper<u32, TestError> = Stepper::builder()
    .action(passive_step(&trace, "s0"))
    .action(passive_step(&trace, "s1"))
    .on_reject({
      let rejected = rejected.clone();
      move |payload: u32| {
        rejected.record(format!("rejected({payload})"));
        Ok(())
      }
    })
    .build();

  let handle = stepper.get_at(0).unwrap();
  handle.detach().unwrap();
  assert!(!handle.is_attached());

  let not_found = |err: &StepperError| matches!(err, StepperError::HandleNotFound { id } if *id == handle.id());

  assert!(not_found(&handle.detach().unwrap_err()));
  assert!(not_found(&handle.index().unwrap_err()));
  assert!(not_found(&handle.rewind(0).unwrap_err()));
  assert!(not_found(&handle.insert_after(passive_step(&trace, "x")).unwrap_err()));
  assert!(not_found(&handle.insert_before(passive_step(&trace, "y")).unwrap_err()));
  assert!(not_found(handle.advance(1).unwrap_err().stepper().unwrap()));
  assert!(not_found(handle.reject(1).unwrap_err().stepper().unwrap()));

  assert_eq!(stepper.len(), 1);
  assert_eq!(trace.len(), 0);
  assert_eq!(rejected.len(), 0);
}

#[test]
fn test_handle_advance_and_rewind_delegate_to_stepper() {
  setup_tracing();
  let trace = Trace::new();
  let stepper = Stepper::new(vec![
    passive_step(&trace, "s0"),
    passive_step(&trace, "s1"),
    passive_step(&trace, "s2"),
  ]);

  let s0 = stepper.get_at(0).unwrap();
  s0.advance(1).unwrap();
  assert_eq!(stepper.position(), Some(1));

  let s2 = stepper.get_at(2).unwrap();
  let landed = s2.rewind(2).unwrap();
  assert_eq!(landed, s0);
  assert_eq!(stepper.position(), Some(0));

  assert!(matches!(
    s0.rewind(1).unwrap_err(),
    StepperError::NavigationOutOfRange {
      position: Some(0),
      distance: 1
    }
  ));
  assert_eq!(trace.entries(), vec!["s1(1,false)"]);
}

#[test]
fn test_handle_reject_leaves_cursor_and_steps_alone() {
  setup_tracing();
  let trace = Trace::new();
  let rejected = Trace::new();
  let stepper = Stepper::with_rejection(
    vec![passive_step(&trace, "s0"), passive_step(&trace, "s1")],
    on_reject({
      let rejected = rejected.clone();
      move |payload: u32| -> Result<(), TestError> {
        rejected.record(format!("rejected({payload})"));
        Ok(())
      }
    }),
  );

  stepper.start(0).unwrap();
  stepper.get_at(1).unwrap().reject(42).unwrap();

  assert_eq!(rejected.entries(), vec!["rejected(42)"]);
  assert_eq!(stepper.position(), Some(0));
  assert_eq!(stepper.len(), 2);
}

#[test]
fn test_handles_from_different_steppers_never_compare_equal() {
  setup_tracing();
  let trace = Trace::new();
  let action = passive_step(&trace, "shared");
  let left = Stepper::new(vec![action.clone()]);
  let right = Stepper::new(vec![action]);

  let l = left.get_at(0).unwrap();
  let r = right.get_at(0).unwrap();

  // Independent generators both start at the same id; ownership still tells them apart.
  assert_eq!(l.id(), r.id());
  assert_ne!(l, r);
  assert!(matches!(left.lookup_index(&r), Err(StepperError::HandleNotFound { .. })));
  assert!(matches!(right.remove(&l), Err(StepperError::HandleNotFound { .. })));
  assert_eq!(right.len(), 1);
}

#[test]
fn test_shared_id_generator_keeps_ids_disjoint() {
  setup_tracing();
  let trace = Trace::new();
  let ids = IdGenerator::new();

  let first: Stepper<u32, TestError> = Stepper::builder()
    .id_generator(ids.clone())
    .action(passive_step(&trace, "a"))
    .action(passive_step(&trace, "b"))
    .build();
  let second: Stepper<u32, TestError> = Stepper::builder()
    .id_generator(first.id_generator())
    .action(passive_step(&trace, "a"))
    .build();
  second.add(passive_step(&trace, "c"));
  first.add(passive_step(&trace, "d"));

  let all: Vec<_> = first.handles().into_iter().chain(second.handles()).map(|h| h.id()).collect();
  let unique: HashSet<_> = all.iter().copied().collect();
  assert_eq!(all.len(), 5);
  assert_eq!(unique.len(), 5);
  assert_eq!(ids.issued(), 5);
}

#[test]
fn test_ids_are_never_reused_after_removal() {
  setup_tracing();
  let trace = Trace::new();
  let stepper = Stepper::new(vec![passive_step(&trace, "s0")]);
  let old = stepper.get_at(0).unwrap();
  stepper.remove(&old).unwrap();

  let fresh = stepper.add(passive_step(&trace, "s0 again"));
  assert_ne!(fresh.id(), old.id());
  assert!(fresh.id() > old.id());
}

#[test]
fn test_handle_outliving_stepper_reports_not_found() {
  setup_tracing();
  let trace = Trace::new();
  let stepper = Stepper::new(vec![passive_step(&trace, "s0")]);
  let handle = stepper.get_at(0).unwrap();
  drop(stepper);

  assert!(!handle.is_attached());
  assert!(matches!(handle.index(), Err(StepperError::HandleNotFound { .. })));
  assert!(matches!(
    handle.advance(0).unwrap_err().stepper(),
    Some(StepperError::HandleNotFound { .. })
  ));
}

#[test]
fn test_handle_display_and_debug() {
  setup_tracing();
  let trace = Trace::new();
  let stepper = Stepper::new(vec![passive_step(&trace, "s0")]);
  let handle = stepper.get_at(0).unwrap();

  assert_eq!(handle.id().to_string(), "#0");
  let debug = format!("{:?}", handle);
  assert!(debug.contains("StepHandle"));
  assert!(debug.contains("owner_alive: true"));
}
