//! Fibers: restartable, suspendable runs of an arrow.
//!
//! A [`Fiber`] is a template that can be started any number of times. Each
//! start yields an independent [`StartedFiber`], which is either suspended
//! (work remains) or finished (a result is available). Resuming a suspended
//! fiber advances it by one step.
//!
//! # Example
//!
//! ```
//! use kleisli::{Arrow, StartedFiber};
//!
//! let fiber = Arrow::<i32, i32, String>::lift_pure(|x| x + 1)
//!     .and_then(Arrow::lift_pure(|x: i32| x * 2))
//!     .to_fiber();
//!
//! let started = fiber.start(4);
//! assert!(started.is_suspended());
//!
//! let started = started.resume();
//! assert!(started.is_suspended());
//! assert_eq!(started.result(), None);
//!
//! let finished = started.run();
//! assert_eq!(finished.result(), &Ok(10));
//! ```

mod future;

pub use future::FiberFuture;

use std::fmt;

use crate::arrow::Arrow;
use crate::stage::{StagedComputation, SteppableComputation};
use crate::value::Data;

/// A restartable fiber template over an arrow.
pub struct Fiber<I, O, E> {
    arrow: Arrow<I, O, E>,
}

impl<I, O, E> Clone for Fiber<I, O, E> {
    fn clone(&self) -> Self {
        Fiber {
            arrow: self.arrow.clone(),
        }
    }
}

impl<I, O, E> fmt::Debug for Fiber<I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fiber").field("arrow", &self.arrow).finish()
    }
}

impl<I, O, E> Fiber<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
{
    /// Wrap `arrow` as a fiber template.
    pub fn new(arrow: Arrow<I, O, E>) -> Self {
        Fiber { arrow }
    }

    /// The arrow this fiber runs.
    pub fn arrow(&self) -> &Arrow<I, O, E> {
        &self.arrow
    }

    /// Stage the arrow against `input`. No step is taken yet.
    pub fn start(&self, input: I) -> StartedFiber<O, E> {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = ?self.arrow.kind(), "fiber started");

        StartedFiber::from_steppable(
            StagedComputation::with_arrow(Ok(input), self.arrow.clone()).into_steppable(),
        )
    }
}

/// A started fiber: either suspended with work left, or finished.
pub enum StartedFiber<O, E> {
    /// Work remains; [`resume`](StartedFiber::resume) takes the next step.
    Suspended(SteppableComputation<O, E>),
    /// No work remains.
    Finished(Result<O, E>),
}

impl<O, E> fmt::Debug for StartedFiber<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartedFiber::Suspended(steppable) => {
                f.debug_tuple("Suspended").field(steppable).finish()
            }
            StartedFiber::Finished(result) => f
                .debug_tuple("Finished")
                .field(&if result.is_ok() { "Ok" } else { "Err" })
                .finish(),
        }
    }
}

impl<O, E> StartedFiber<O, E>
where
    O: Data,
    E: Send + 'static,
{
    /// Suspended if `steppable` has steps left, finished otherwise.
    pub fn from_steppable(steppable: SteppableComputation<O, E>) -> Self {
        match steppable.into_result() {
            Ok(result) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(ok = result.is_ok(), "fiber finished");
                StartedFiber::Finished(result)
            }
            Err(steppable) => StartedFiber::Suspended(steppable),
        }
    }

    /// A fiber that is already finished with `result`.
    pub fn from_result(result: Result<O, E>) -> Self {
        StartedFiber::Finished(result)
    }

    /// Take one step. A finished fiber is returned unchanged.
    pub fn resume(self) -> Self {
        match self {
            StartedFiber::Suspended(steppable) => StartedFiber::from_steppable(steppable.run_step()),
            finished => finished,
        }
    }

    /// Take one step with `input` in place of the pending result.
    ///
    /// A finished fiber is returned unchanged.
    pub fn resume_with<X: Data>(self, input: Result<X, E>) -> Self {
        match self {
            StartedFiber::Suspended(steppable) => {
                StartedFiber::from_steppable(steppable.run_step_with(input))
            }
            finished => finished,
        }
    }

    /// Whether work remains.
    pub fn is_suspended(&self) -> bool {
        matches!(self, StartedFiber::Suspended(_))
    }

    /// The result, once finished.
    pub fn result(&self) -> Option<&Result<O, E>> {
        match self {
            StartedFiber::Finished(result) => Some(result),
            StartedFiber::Suspended(_) => None,
        }
    }

    /// Resume until finished.
    pub fn run(self) -> FinishedFiber<O, E> {
        let mut fiber = self;
        loop {
            match fiber {
                StartedFiber::Finished(result) => return FinishedFiber { result },
                suspended => fiber = suspended.resume(),
            }
        }
    }

    /// Drive this fiber from an async executor, one step per poll.
    pub fn into_future(self) -> FiberFuture<O, E> {
        FiberFuture::new(self)
    }
}

/// A fiber that has run to completion.
pub struct FinishedFiber<O, E> {
    result: Result<O, E>,
}

impl<O, E> fmt::Debug for FinishedFiber<O, E>
where
    O: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinishedFiber")
            .field("result", &self.result)
            .finish()
    }
}

impl<O, E> FinishedFiber<O, E> {
    /// Borrow the final result.
    pub fn result(&self) -> &Result<O, E> {
        &self.result
    }

    /// Take the final result.
    pub fn into_result(self) -> Result<O, E> {
        self.result
    }
}
