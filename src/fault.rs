//! Interpreter faults and captured panics.
//!
//! The engine has two error channels. Domain failures are ordinary `Err(E)`
//! values that short-circuit a composition and are handed back to the caller.
//! Interpreter faults are programming errors: they abort execution by
//! panicking with a [`Fault`] payload, so they can never be mistaken for a
//! domain failure.
//!
//! # Examples
//!
//! ```
//! use kleisli::prelude::*;
//! use kleisli::testing::catch_fault;
//!
//! // A control effect evaluated outside of any prompt
//! let stray = control(|k: Resume<i32, i32, String>| -> Arrow<i32, i32, String> {
//!     k.with(id())
//! });
//!
//! assert_eq!(catch_fault(|| stray.run(1)), Some(Fault::UnpromptedControl));
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use crate::arrow::OperationKind;

/// A defect detected by the interpreter.
///
/// Faults are raised as panics whose payload is the `Fault` itself. Use
/// [`catch_fault`](crate::testing::catch_fault) or downcast the payload of
/// [`std::panic::catch_unwind`] to inspect one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// A `Control` node was evaluated without an enclosing `Prompt`.
    UnpromptedControl,
    /// The single-step interpreter reached an operation it cannot advance.
    Unsteppable {
        /// The operation that was reached.
        kind: OperationKind,
    },
    /// An erased value did not have the type the caller asked for.
    ///
    /// Only reachable across a captured continuation, whose scope types are
    /// not known when the control effect is built.
    TypeMismatch {
        /// The type that was requested.
        expected: &'static str,
        /// The type that was actually produced.
        found: &'static str,
    },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::UnpromptedControl => {
                write!(f, "control effect evaluated outside of a prompt")
            }
            Fault::Unsteppable { kind } => {
                write!(f, "single-step interpreter cannot advance {:?}", kind)
            }
            Fault::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl StdError for Fault {}

/// Abort execution with an interpreter fault.
pub(crate) fn raise(fault: Fault) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(%fault, "interpreter fault");
    std::panic::panic_any(fault)
}

/// The payload of a panic caught at a `lift_impure` boundary.
///
/// Holds the exact object the function panicked with.
///
/// # Examples
///
/// ```
/// use kleisli::{Arrow, Panic};
///
/// #[derive(Debug, PartialEq)]
/// struct Overflow(u32);
///
/// let arrow = Arrow::<u32, u32, Panic>::lift_impure(|x| {
///     if x > 10 {
///         std::panic::panic_any(Overflow(x));
///     }
///     x
/// });
///
/// let err = arrow.run(11).unwrap_err();
/// assert_eq!(err.downcast_ref::<Overflow>(), Some(&Overflow(11)));
/// ```
pub struct Panic {
    payload: Box<dyn Any + Send>,
}

impl Panic {
    pub(crate) fn new(payload: Box<dyn Any + Send>) -> Self {
        Panic { payload }
    }

    /// Borrow the payload as `T`, if that is what was raised.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// The panic message, when the payload is a `&str` or `String`.
    pub fn message(&self) -> Option<&str> {
        self.payload
            .downcast_ref::<&'static str>()
            .copied()
            .or_else(|| self.payload.downcast_ref::<String>().map(String::as_str))
    }

    /// Take ownership of the raw payload.
    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload
    }
}

impl fmt::Debug for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panic")
            .field("message", &self.message().unwrap_or("<non-string payload>"))
            .finish()
    }
}

impl fmt::Display for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "panicked: {}", message),
            None => write!(f, "panicked with a non-string payload"),
        }
    }
}

impl StdError for Panic {}

impl From<Panic> for String {
    fn from(panic: Panic) -> Self {
        panic.to_string()
    }
}

/// Run `f`, turning a panic into a [`Panic`] value.
///
/// Interpreter faults keep unwinding: a defect must not turn into a domain
/// failure just because it happened under a `lift_impure`.
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, Panic> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(|payload| {
        if payload.is::<Fault>() {
            std::panic::resume_unwind(payload)
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("captured panic at an impure boundary");
        Panic::new(payload)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::catch_fault;

    #[test]
    fn fault_display_names_the_operation() {
        let fault = Fault::Unsteppable {
            kind: OperationKind::StubInput,
        };
        assert_eq!(
            fault.to_string(),
            "single-step interpreter cannot advance StubInput"
        );
    }

    #[test]
    fn catch_panic_passes_values_through() {
        assert_eq!(catch_panic(|| 5).ok(), Some(5));
    }

    #[test]
    fn catch_panic_captures_str_message() {
        let panic = catch_panic(|| -> i32 { panic!("boom") }).unwrap_err();
        assert_eq!(panic.message(), Some("boom"));
        assert_eq!(panic.to_string(), "panicked: boom");
    }

    #[test]
    fn catch_panic_captures_formatted_message() {
        let panic = catch_panic(|| -> i32 { panic!("code {}", 7) }).unwrap_err();
        assert_eq!(panic.message(), Some("code 7"));
    }

    #[test]
    fn catch_panic_keeps_exact_payload() {
        let panic = catch_panic(|| -> i32 { std::panic::panic_any(404_u16) }).unwrap_err();
        assert_eq!(panic.downcast_ref::<u16>(), Some(&404));
        assert_eq!(panic.message(), None);
    }

    #[test]
    fn catch_panic_does_not_swallow_faults() {
        let fault = catch_fault(|| catch_panic(|| -> i32 { raise(Fault::UnpromptedControl) }));
        assert_eq!(fault, Some(Fault::UnpromptedControl));
    }

    #[test]
    fn panic_converts_into_string() {
        let panic = catch_panic(|| -> i32 { panic!("oops") }).unwrap_err();
        let message: String = panic.into();
        assert_eq!(message, "panicked: oops");
    }
}
