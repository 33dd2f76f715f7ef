//! Staged computations and the single-step interpreter.
//!
//! A staged computation is a continuation point: the result we already have
//! plus the arrow that remains to be run. [`SteppableComputation::run_step`]
//! advances it by exactly one primitive operation, or by one link of an
//! `AndThen`/`FlatMap`, so the boundaries between links are the only
//! observable suspension points.
//!
//! # Example
//!
//! ```
//! use kleisli::Arrow;
//!
//! let arrow = Arrow::<i32, i32, String>::lift_pure(|x| x + 1)
//!     .and_then(Arrow::lift_pure(|x: i32| x * 2));
//!
//! let mut steppable = arrow.to_steppable(4);
//! let mut steps = 0;
//! while steppable.has_more_steps() {
//!     steppable = steppable.run_step();
//!     steps += 1;
//! }
//!
//! assert_eq!(steps, 2);
//! assert_eq!(steppable.get_result(), Some(Ok(10)));
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::arrow::operation::{Node, Operation};
use crate::arrow::Arrow;
use crate::fault::{catch_panic, raise, Fault};
use crate::handlers::{AndThenHandler, FlatMapHandler};
use crate::prompt;
use crate::value::{Data, Value};

/// Erased continuation point: pending result plus the arrow still to run.
pub(crate) struct Stage<E> {
    pub(crate) pending: Result<Value, E>,
    pub(crate) next: Option<Node<E>>,
}

impl<E> Stage<E> {
    pub(crate) fn staged(pending: Result<Value, E>, next: Node<E>) -> Self {
        Stage {
            pending,
            next: Some(next),
        }
    }

    pub(crate) fn done(pending: Result<Value, E>) -> Self {
        Stage {
            pending,
            next: None,
        }
    }

    /// Advance by one step, optionally replacing the pending result.
    pub(crate) fn step(self, injected: Option<Result<Value, E>>) -> Self {
        let next = match self.next {
            Some(next) => next,
            None => return Stage::done(self.pending),
        };
        let input = injected.unwrap_or(self.pending);

        #[cfg(feature = "tracing")]
        tracing::trace!(kind = ?next.kind(), "step");

        match &*next {
            Operation::Id => Stage::done(input),
            Operation::Arr(f) => Stage::done(input.and_then(|value| f(value))),
            Operation::LiftPure(f) => Stage::done(input.map(|value| f(value))),
            Operation::LiftImpure { f, recover } => Stage::done(
                input.and_then(|value| catch_panic(|| f(value)).map_err(*recover)),
            ),
            Operation::FlatMap {
                first,
                continuations,
            } => FlatMapHandler::new(first, continuations).step(input),
            Operation::AndThen(links) => AndThenHandler::new(links).step(input),
            Operation::Prompt(body) => Stage::staged(input, prompt::create_node(body)),
            Operation::Control(_) => raise(Fault::UnpromptedControl),
            Operation::StubInput { .. } => raise(Fault::Unsteppable {
                kind: next.kind(),
            }),
        }
    }
}

impl<E> fmt::Debug for Stage<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field(
                "pending",
                &match &self.pending {
                    Ok(value) => Ok(value),
                    Err(_) => Err("<error>"),
                },
            )
            .field("next", &self.next)
            .finish()
    }
}

/// A continuation point whose remaining work produces `Result<O, E>`.
///
/// Holds what we already have (a pending result) and what remains (an
/// optional arrow).
pub struct StagedComputation<O, E> {
    stage: Stage<E>,
    _output: PhantomData<fn() -> O>,
}

impl<O, E> fmt::Debug for StagedComputation<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedComputation")
            .field("stage", &self.stage)
            .finish()
    }
}

impl<O, E> StagedComputation<O, E>
where
    O: Data,
    E: Send + 'static,
{
    pub(crate) fn from_stage(stage: Stage<E>) -> Self {
        StagedComputation {
            stage,
            _output: PhantomData,
        }
    }

    /// Stage `arrow` to run against `input`.
    pub fn with_arrow<I: Data>(input: Result<I, E>, arrow: Arrow<I, O, E>) -> Self {
        StagedComputation::from_stage(Stage::staged(input.map(Value::new), arrow.node))
    }

    /// A finished continuation point holding `result`.
    pub fn without_arrow(result: Result<O, E>) -> Self {
        StagedComputation::from_stage(Stage::done(result.map(Value::new)))
    }

    /// Whether an arrow remains to be run.
    pub fn has_arrow(&self) -> bool {
        self.stage.next.is_some()
    }

    /// Run whatever remains through the direct evaluator.
    ///
    /// A failed pending result is returned as is.
    pub fn run(self) -> Result<O, E> {
        let pending = self.stage.pending;
        let result = match self.stage.next {
            Some(next) => pending.and_then(|value| crate::arrow::eval::eval(&next, value)),
            None => pending,
        };
        result.map(Value::take::<O>)
    }

    /// Wrap for single-step execution.
    pub fn into_steppable(self) -> SteppableComputation<O, E> {
        SteppableComputation { staged: self }
    }
}

/// A staged computation that can be advanced one step at a time.
pub struct SteppableComputation<O, E> {
    staged: StagedComputation<O, E>,
}

impl<O, E> fmt::Debug for SteppableComputation<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteppableComputation")
            .field("staged", &self.staged)
            .finish()
    }
}

impl<O, E> SteppableComputation<O, E>
where
    O: Data,
    E: Send + 'static,
{
    /// Advance by one step using the pending result as input.
    ///
    /// Returns `self` unchanged when no steps remain.
    ///
    /// # Panics
    ///
    /// Raises a [`Fault`] when the next operation is a bare control effect or
    /// a stubbed input, neither of which the single-step interpreter handles.
    pub fn run_step(self) -> Self {
        self.advance(None)
    }

    /// Advance by one step, replacing the pending result with `input`.
    ///
    /// ```
    /// use kleisli::Arrow;
    ///
    /// let steppable = Arrow::<i32, i32, String>::lift_pure(|x| x + 10).to_steppable(10);
    /// let step = steppable.run_step_with(Ok::<i32, String>(20));
    /// assert_eq!(step.get_result(), Some(Ok(30)));
    /// ```
    pub fn run_step_with<X: Data>(self, input: Result<X, E>) -> Self {
        self.advance(Some(input.map(Value::new)))
    }

    fn advance(self, injected: Option<Result<Value, E>>) -> Self {
        let stage = self.staged.stage.step(injected);
        SteppableComputation {
            staged: StagedComputation::from_stage(stage),
        }
    }

    /// Whether an arrow remains to be run.
    pub fn has_more_steps(&self) -> bool {
        self.staged.has_arrow()
    }

    /// The final result, available only once no steps remain.
    pub fn get_result(&self) -> Option<Result<O, E>>
    where
        E: Clone,
    {
        if self.has_more_steps() {
            return None;
        }
        Some(match &self.staged.stage.pending {
            Ok(value) => Ok(value.clone().take::<O>()),
            Err(error) => Err(error.clone()),
        })
    }

    /// Take the final result, or get `self` back if steps remain.
    pub fn into_result(self) -> Result<Result<O, E>, Self> {
        if self.has_more_steps() {
            return Err(self);
        }
        Ok(self.staged.stage.pending.map(Value::take::<O>))
    }

    /// Run every remaining step.
    pub fn run_to_completion(self) -> Result<O, E> {
        let mut steppable = self;
        loop {
            match steppable.into_result() {
                Ok(result) => return result,
                Err(pending) => steppable = pending.run_step(),
            }
        }
    }
}
