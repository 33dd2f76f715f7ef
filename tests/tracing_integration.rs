//! Log output of the interpreters, checked with `tracing-test`

#![cfg(feature = "tracing")]

use kleisli::prelude::*;
use kleisli::{ops, testing::catch_fault};
use tracing_test::traced_test;

type K = Resume<i32, i32, String>;
type A = Arrow<i32, i32, String>;

#[traced_test]
#[test]
fn prompt_logs_control_capture() {
    let arrow = prompt(
        lift_pure(|x: i32| x + 1)
            .and_then(control(|k: K| -> A { k.with(id()) }))
            .and_then(lift_pure(|x: i32| x + 1)),
    );
    assert_eq!(arrow.run(0), Ok(2));
    assert!(logs_contain("capturing control effect"));
    assert!(logs_contain("index=1"));
    assert!(logs_contain("depth=3"));
}

#[traced_test]
#[test]
fn steps_are_traced_with_their_kind() {
    let arrow: A = lift_pure(|x: i32| x + 1).and_then(arr(|x: i32| Ok(x)));
    let _ = arrow.to_steppable(1).run_to_completion();
    assert!(logs_contain("step"));
    assert!(logs_contain("kind=AndThen"));
}

#[traced_test]
#[test]
fn fiber_lifecycle_is_logged() {
    let fiber = lift_pure::<i32, i32, String, _>(|x| x * 2).to_fiber();
    let finished = fiber.start(2).run();
    assert_eq!(finished.into_result(), Ok(4));
    assert!(logs_contain("fiber started"));
    assert!(logs_contain("fiber finished"));
}

#[traced_test]
#[test]
fn runtime_logs_fork_and_completion() {
    let mut runtime = Runtime::new();
    let id = runtime.spawn(&lift_pure::<i32, i32, String, _>(|x| x), 1);
    runtime.run_all();
    assert!(logs_contain("fiber forked"));
    assert!(logs_contain("fiber completed"));
    assert!(logs_contain(&id.to_string()));
}

#[traced_test]
#[test]
fn faults_are_logged_as_errors() {
    let arrow: A = control(|k: K| -> A { k.with(id()) });
    assert_eq!(catch_fault(|| arrow.run(1)), Some(Fault::UnpromptedControl));
    assert!(logs_contain("interpreter fault"));
    assert!(logs_contain("control effect evaluated outside of a prompt"));
}

#[traced_test]
#[test]
fn bracket_logs_cleanup_failure() {
    let arrow = ops::bracket(
        lift_pure::<i32, i32, String, _>(|x| x),
        lift_pure(|x: i32| x + 1),
        arr(|_: i32| Err::<(), _>("disk gone".to_string())),
    );
    let (during, release) = arrow.run(1).unwrap();
    assert_eq!(during, Ok(2));
    assert!(release.is_err());
    assert!(logs_contain("Resource cleanup failed"));
    assert!(logs_contain("disk gone"));
}

#[traced_test]
#[test]
fn captured_panics_are_logged() {
    let arrow: A = lift_impure(|_: i32| -> i32 { panic!("impure") });
    assert_eq!(arrow.run(0), Err("panicked: impure".to_string()));
    assert!(logs_contain("captured panic at an impure boundary"));
}

#[test]
fn runtime_runs_under_a_fmt_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut runtime = Runtime::<i32, String>::new();
        let id = runtime.spawn(&lift_pure(|x: i32| x + 1).and_then(lift_pure(|x: i32| x * 3)), 1);
        assert_eq!(runtime.run_all(), vec![(id, Ok(6))]);
    });
}
