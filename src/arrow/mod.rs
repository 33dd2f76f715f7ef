//! The arrow algebra and its direct evaluator.
//!
//! An [`Arrow<I, O, E>`] is an immutable description of an effectful
//! transformation from `I` to `Result<O, E>`. Building one performs no work;
//! evaluation happens only through [`Arrow::run`], through stepping
//! ([`Arrow::to_steppable`]) or through a fiber ([`Arrow::to_fiber`]).
//!
//! # Composition
//!
//! ```
//! use kleisli::Arrow;
//!
//! let arrow = Arrow::<i32, i32, String>::lift_pure(|x| x + 10)
//!     .and_then(Arrow::arr(|x: i32| if x > 0 { Ok(x * 2) } else { Err("negative".to_string()) }))
//!     .and_then(Arrow::lift_pure(|x: i32| x.to_string()));
//!
//! assert_eq!(arrow.run(1), Ok("22".to_string()));
//! assert_eq!(arrow.run(-20), Err("negative".to_string()));
//! ```
//!
//! # Kleisli bind
//!
//! `flat_map` follows `f x >>= \a -> runKleisli (k a) x`: the arrow produced
//! by a continuation runs against the *original* input, not against the
//! value that was just produced.
//!
//! ```
//! use kleisli::Arrow;
//!
//! let arrow = Arrow::<i32, i32, String>::lift_pure(|x| x + 5)
//!     .flat_map(|a| if a < 10 {
//!         Arrow::lift_pure(|x: i32| x + 10)
//!     } else {
//!         Arrow::lift_pure(move |_: i32| a + 20)
//!     });
//!
//! assert_eq!(arrow.run(2), Ok(12));
//! assert_eq!(arrow.run(7), Ok(32));
//! ```

mod constructors;
pub(crate) mod eval;
pub(crate) mod operation;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::fault::Panic;
use crate::fiber::Fiber;
use crate::prompt::Resume;
use crate::stage::{StagedComputation, SteppableComputation};
use crate::value::{Data, Value};

pub use constructors::{arr, control, id, lift_impure, lift_pure, prompt};
pub use operation::OperationKind;

use operation::{into_links, Chain, Node, Operation};

/// A composable, lazily executed computation from `I` to `Result<O, E>`.
///
/// Arrows are cheap to clone: every clone shares the same operation tree.
pub struct Arrow<I, O, E> {
    pub(crate) node: Node<E>,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O, E> Clone for Arrow<I, O, E> {
    fn clone(&self) -> Self {
        Arrow::from_node(self.node.clone())
    }
}

impl<I, O, E> fmt::Debug for Arrow<I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arrow")
            .field("operation", &self.node)
            .finish()
    }
}

impl<I, O, E> Arrow<I, O, E> {
    pub(crate) fn from_node(node: Node<E>) -> Self {
        Arrow {
            node,
            _types: PhantomData,
        }
    }

    pub(crate) fn from_operation(operation: Operation<E>) -> Self {
        Arrow::from_node(Arc::new(operation))
    }

    /// The tag of this arrow's outermost operation.
    ///
    /// ```
    /// use kleisli::{Arrow, OperationKind};
    ///
    /// let chain = Arrow::<i32, i32, ()>::id().and_then(Arrow::id());
    /// assert_eq!(chain.kind(), OperationKind::AndThen);
    /// ```
    pub fn kind(&self) -> OperationKind {
        self.node.kind()
    }

    /// Number of links in the outermost composition.
    ///
    /// An `AndThen` reports its flattened list length, a `FlatMap` reports
    /// its seed plus its continuations, anything else counts as one link.
    /// Never zero, so there is no `is_empty`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match &*self.node {
            Operation::AndThen(links) => links.len(),
            Operation::FlatMap { continuations, .. } => continuations.len() + 1,
            _ => 1,
        }
    }
}

impl<I, E> Arrow<I, I, E>
where
    I: Data,
    E: Send + 'static,
{
    /// The identity arrow: output equals input.
    pub fn id() -> Self {
        Arrow::from_operation(Operation::Id)
    }
}

impl<I, O, E> Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
{
    /// Lift an effectful function.
    pub fn arr<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
    {
        Arrow::from_operation(Operation::Arr(Arc::new(move |value: Value| {
            f(value.take::<I>()).map(Value::new)
        })))
    }

    /// Lift a total function. The resulting arrow always succeeds.
    pub fn lift_pure<F>(f: F) -> Self
    where
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        Arrow::from_operation(Operation::LiftPure(Arc::new(move |value: Value| {
            Value::new(f(value.take::<I>()))
        })))
    }

    /// Lift a function that may panic.
    ///
    /// A panic raised by `f` becomes a failure carrying the panic payload,
    /// converted through `E: From<Panic>`; it never unwinds past this arrow.
    ///
    /// ```
    /// use kleisli::Arrow;
    ///
    /// let parse = Arrow::<&'static str, i32, String>::lift_impure(|s| s.parse::<i32>().unwrap());
    ///
    /// assert_eq!(parse.run("12"), Ok(12));
    /// assert!(parse.run("twelve").is_err());
    /// ```
    pub fn lift_impure<F>(f: F) -> Self
    where
        F: Fn(I) -> O + Send + Sync + 'static,
        E: From<Panic>,
    {
        Arrow::from_operation(Operation::LiftImpure {
            f: Arc::new(move |value: Value| Value::new(f(value.take::<I>()))),
            recover: <E as From<Panic>>::from,
        })
    }

    /// Reify a control effect.
    ///
    /// When an enclosing [`prompt`](Arrow::prompt) scope is evaluated, `f`
    /// receives a [`Resume`] holding the rest of that scope, and the arrow it
    /// returns becomes the scope's new body. `A` and `B` are the input and
    /// output types of that scope.
    ///
    /// Evaluating a control effect outside of any prompt is an interpreter
    /// fault ([`Fault::UnpromptedControl`](crate::Fault::UnpromptedControl)).
    pub fn control<A, B, F>(f: F) -> Self
    where
        A: 'static,
        B: 'static,
        F: Fn(Resume<I, O, E>) -> Arrow<A, B, E> + Send + Sync + 'static,
    {
        Arrow::from_operation(Operation::Control(Arc::new(move |splice| {
            f(Resume::from_splice(splice)).node
        })))
    }

    /// Delimit the nearest control effect inside `body`.
    ///
    /// ```
    /// use kleisli::prelude::*;
    ///
    /// let body = lift_pure(|x: i32| x + 10).and_then(control(
    ///     |k: Resume<i32, i32, String>| -> Arrow<i32, i32, String> { k.with(id()) },
    /// ));
    ///
    /// assert_eq!(Arrow::prompt(body).run(10), Ok(20));
    /// ```
    pub fn prompt(body: Self) -> Self {
        Arrow::from_operation(Operation::Prompt(body.node))
    }

    /// Sequential composition (`>>>`).
    ///
    /// Compositions never nest: chaining onto an `AndThen`, or chaining an
    /// `AndThen`, splices its links into a single flat list.
    pub fn and_then<P>(self, next: Arrow<O, P, E>) -> Arrow<I, P, E>
    where
        P: Data,
    {
        let mut links = into_links(self.node);
        links.extend(into_links(next.node));
        Arrow::from_operation(Operation::AndThen(Chain::new(links)))
    }

    /// Shorthand for `and_then(Arrow::arr(f))`.
    pub fn and_then_k<P, F>(self, f: F) -> Arrow<I, P, E>
    where
        P: Data,
        F: Fn(O) -> Result<P, E> + Send + Sync + 'static,
    {
        self.and_then(Arrow::arr(f))
    }

    /// Shorthand for `and_then(Arrow::lift_pure(f))`.
    pub fn map<P, F>(self, f: F) -> Arrow<I, P, E>
    where
        P: Data,
        F: Fn(O) -> P + Send + Sync + 'static,
    {
        self.and_then(Arrow::lift_pure(f))
    }

    /// Monadic chaining.
    ///
    /// The arrow returned by `f` is run against the original input of this
    /// arrow. Chaining onto a `FlatMap` appends to its continuation list.
    pub fn flat_map<P, F>(self, f: F) -> Arrow<I, P, E>
    where
        P: Data,
        F: Fn(O) -> Arrow<I, P, E> + Send + Sync + 'static,
    {
        let continuation: operation::Continuation<E> =
            Arc::new(move |value: Value| f(value.take::<O>()).node);

        let (first, mut continuations) = match Arc::try_unwrap(self.node) {
            Ok(Operation::FlatMap {
                first,
                continuations,
            }) => (first, continuations.into_vec()),
            Ok(other) => (Arc::new(other), Vec::new()),
            Err(shared) => match &*shared {
                Operation::FlatMap {
                    first,
                    continuations,
                } => (first.clone(), continuations.to_vec()),
                _ => (shared, Vec::new()),
            },
        };
        continuations.push(continuation);

        Arrow::from_operation(Operation::FlatMap {
            first,
            continuations: Chain::new(continuations),
        })
    }

    /// Ignore the upstream value and always feed `input` to this arrow.
    ///
    /// ```
    /// use kleisli::Arrow;
    ///
    /// let thunk: Arrow<(), i32, ()> = Arrow::lift_pure(|x: i32| x * 3).stub_input(7);
    /// assert_eq!(thunk.run(()), Ok(21));
    /// ```
    pub fn stub_input<J>(self, input: I) -> Arrow<J, O, E> {
        Arrow::from_operation(Operation::StubInput {
            inner: self.node,
            input: Value::new(input),
        })
    }

    /// Evaluate directly to a final result.
    ///
    /// Long `and_then`/`flat_map` chains run in constant stack depth.
    ///
    /// # Panics
    ///
    /// Raises a [`Fault`](crate::Fault) when evaluation reaches a control
    /// effect that no prompt delimits.
    pub fn run(&self, input: I) -> Result<O, E> {
        eval::eval(&self.node, Value::new(input)).map(Value::take::<O>)
    }

    /// Stage this arrow against `input` without running anything.
    pub fn stage(&self, input: I) -> StagedComputation<O, E> {
        StagedComputation::with_arrow(Ok(input), self.clone())
    }

    /// Stage this arrow against `input` for single-step execution.
    pub fn to_steppable(&self, input: I) -> SteppableComputation<O, E> {
        self.stage(input).into_steppable()
    }

    /// Turn this arrow into a restartable fiber template.
    pub fn to_fiber(&self) -> Fiber<I, O, E> {
        Fiber::new(self.clone())
    }
}
