//! Async bridge for fibers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::FusedFuture;

use super::StartedFiber;
use crate::value::Data;

/// A future that drives a [`StartedFiber`] one step per poll.
///
/// Between steps the future wakes itself and returns `Pending`, so several
/// fibers awaited on one executor interleave at step boundaries.
///
/// ```
/// use kleisli::Arrow;
///
/// let arrow = Arrow::<i32, i32, String>::lift_pure(|x| x + 1).and_then(Arrow::lift_pure(|x: i32| x * 3));
/// let future = arrow.to_fiber().start(1).into_future();
///
/// assert_eq!(futures::executor::block_on(future), Ok(6));
/// ```
#[must_use = "futures do nothing unless polled"]
pub struct FiberFuture<O, E> {
    fiber: Option<StartedFiber<O, E>>,
    polls: usize,
}

// `poll` moves the fiber in and out by value and never pins it, so this holds
// whether or not `O` and `E` are `Unpin`.
impl<O, E> Unpin for FiberFuture<O, E> {}

impl<O, E> FiberFuture<O, E> {
    pub(crate) fn new(fiber: StartedFiber<O, E>) -> Self {
        FiberFuture {
            fiber: Some(fiber),
            polls: 0,
        }
    }

    /// Number of times this future has been polled.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl<O, E> fmt::Debug for FiberFuture<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiberFuture")
            .field("fiber", &self.fiber)
            .field("polls", &self.polls)
            .finish()
    }
}

impl<O, E> Future for FiberFuture<O, E>
where
    O: Data,
    E: Send + 'static,
{
    type Output = Result<O, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.polls += 1;
        let fiber = match self.fiber.take() {
            Some(StartedFiber::Finished(result)) => return Poll::Ready(result),
            Some(suspended) => suspended.resume(),
            None => panic!("FiberFuture polled after completion"),
        };

        match fiber {
            StartedFiber::Finished(result) => Poll::Ready(result),
            suspended => {
                self.fiber = Some(suspended);
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}

impl<O, E> FusedFuture for FiberFuture<O, E>
where
    O: Data,
    E: Send + 'static,
{
    fn is_terminated(&self) -> bool {
        self.fiber.is_none()
    }
}
