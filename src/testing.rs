//! Testing utilities for arrows, stepping and fibers.
//!
//! # Examples
//!
//! ## Counting calls
//!
//! ```rust
//! use kleisli::prelude::*;
//! use kleisli::testing::CallProbe;
//!
//! let probe = CallProbe::new();
//! let counted = probe.clone();
//! let arrow = arr(|_: i32| Err::<i32, _>("stop"))
//!     .and_then(lift_pure(move |x: i32| {
//!         counted.hit();
//!         x
//!     }));
//!
//! assert_eq!(arrow.run(1), Err("stop"));
//! assert_eq!(probe.count(), 0);
//! ```
//!
//! ## Assertion macros
//!
//! ```rust
//! use kleisli::prelude::*;
//! use kleisli::{assert_fault, assert_ok, Fault};
//!
//! assert_ok!(lift_pure::<_, _, (), _>(|x: i32| x * 2).run(2), 4);
//!
//! let stray: Arrow<i32, i32, ()> = control(|k: Resume<i32, i32, ()>| -> Arrow<i32, i32, ()> {
//!     k.with(id())
//! });
//! assert_fault!(stray.run(1), Fault::UnpromptedControl);
//! ```

use std::fmt;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::fault::Fault;

/// A shared invocation counter.
///
/// Clones share the same count, so one clone can be moved into an arrow
/// while the test keeps another.
#[derive(Clone, Default)]
pub struct CallProbe {
    calls: Arc<AtomicUsize>,
}

impl CallProbe {
    /// Create a probe with a count of zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call.
    pub fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of calls recorded so far, across all clones.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether no call has been recorded.
    pub fn never_called(&self) -> bool {
        self.count() == 0
    }
}

impl fmt::Debug for CallProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallProbe")
            .field("calls", &self.count())
            .finish()
    }
}

/// Run `f` and return the interpreter fault it raised, if any.
///
/// Panics that do not carry a [`Fault`] keep unwinding.
pub fn catch_fault<T>(f: impl FnOnce() -> T) -> Option<Fault> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => None,
        Err(payload) => match payload.downcast::<Fault>() {
            Ok(fault) => Some(*fault),
            Err(other) => resume_unwind(other),
        },
    }
}

/// Assert that a result is `Ok`, optionally with a specific value.
///
/// # Example
///
/// ```rust
/// use kleisli::assert_ok;
///
/// let result: Result<i32, String> = Ok(42);
/// assert_ok!(result);
/// assert_ok!(result, 42);
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(_) => {}
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $expected:expr) => {
        match $result {
            Ok(value) => assert_eq!(value, $expected),
            Err(e) => panic!("Expected Ok({:?}), got Err: {:?}", $expected, e),
        }
    };
}

/// Assert that a result is `Err`, optionally with a specific error.
///
/// # Example
///
/// ```rust
/// use kleisli::assert_err;
///
/// let result: Result<i32, String> = Err("boom".to_string());
/// assert_err!(result);
/// assert_err!(result, "boom".to_string());
/// ```
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Err(_) => {}
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
        }
    };
    ($result:expr, $expected:expr) => {
        match $result {
            Err(error) => assert_eq!(error, $expected),
            Ok(v) => panic!("Expected Err({:?}), got Ok: {:?}", $expected, v),
        }
    };
}

/// Assert that evaluating an expression raises a specific interpreter fault.
///
/// # Example
///
/// ```rust
/// use kleisli::{assert_fault, Arrow, Fault, OperationKind};
///
/// let stub: Arrow<(), i32, ()> = Arrow::lift_pure(|x: i32| x).stub_input(1);
/// assert_fault!(
///     stub.to_steppable(()).run_step(),
///     Fault::Unsteppable { kind: OperationKind::StubInput }
/// );
/// ```
#[macro_export]
macro_rules! assert_fault {
    ($expr:expr, $expected:expr) => {
        match $crate::testing::catch_fault(|| $expr) {
            Some(fault) => assert_eq!(fault, $expected),
            None => panic!("Expected fault {:?}, but evaluation completed", $expected),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_starts_at_zero() {
        let probe = CallProbe::new();
        assert_eq!(probe.count(), 0);
        assert!(probe.never_called());
    }

    #[test]
    fn probe_clones_share_count() {
        let probe = CallProbe::new();
        let other = probe.clone();
        other.hit();
        other.hit();
        assert_eq!(probe.count(), 2);
        assert!(!probe.never_called());
    }

    #[test]
    fn probe_debug_shows_count() {
        let probe = CallProbe::new();
        probe.hit();
        assert_eq!(format!("{:?}", probe), "CallProbe { calls: 1 }");
    }

    #[test]
    fn catch_fault_returns_none_on_success() {
        assert_eq!(catch_fault(|| 1 + 1), None);
    }

    #[test]
    fn catch_fault_returns_raised_fault() {
        let fault = catch_fault(|| -> i32 { std::panic::panic_any(Fault::UnpromptedControl) });
        assert_eq!(fault, Some(Fault::UnpromptedControl));
    }

    #[test]
    #[should_panic(expected = "ordinary panic")]
    fn catch_fault_lets_other_panics_through() {
        catch_fault(|| -> i32 { panic!("ordinary panic") });
    }

    #[test]
    fn assert_ok_macro() {
        let result: Result<i32, String> = Ok(3);
        assert_ok!(result);
        assert_ok!(result, 3);
    }

    #[test]
    fn assert_err_macro() {
        let result: Result<i32, &str> = Err("no");
        assert_err!(result);
        assert_err!(result, "no");
    }

    #[test]
    #[should_panic(expected = "Expected Ok, got Err")]
    fn assert_ok_panics_on_err() {
        let result: Result<i32, &str> = Err("no");
        assert_ok!(result);
    }

    #[test]
    #[should_panic(expected = "Expected Err, got Ok")]
    fn assert_err_panics_on_ok() {
        let result: Result<i32, &str> = Ok(1);
        assert_err!(result);
    }

    #[test]
    fn assert_fault_macro() {
        assert_fault!(
            std::panic::panic_any::<Fault>(Fault::UnpromptedControl),
            Fault::UnpromptedControl
        );
    }

    #[test]
    #[should_panic(expected = "but evaluation completed")]
    fn assert_fault_panics_without_fault() {
        assert_fault!(1 + 1, Fault::UnpromptedControl);
    }
}
