//! Delimited continuations: the `Prompt`/`Control` transform.
//!
//! A prompt scope is a flat list of effects (the links of an `AndThen`, or
//! the single body arrow). When the scope is evaluated, the first `Control`
//! effect in that list is captured: its function receives a [`Resume`]
//! holding the effects before and after it, and the arrow it returns
//! replaces the whole scope.
//!
//! Only control effects at the top level of the scope are considered.
//! Effects nested inside another prompt, a `FlatMap` or a stubbed input are
//! left for their own scope to resolve.
//!
//! # Examples
//!
//! Resuming with an arrow puts that arrow in the hole:
//!
//! ```
//! use kleisli::prelude::*;
//!
//! let body = lift_pure(|x: i32| x + 100).and_then(control(
//!     |k: Resume<i32, i32, String>| -> Arrow<i32, i32, String> {
//!         k.with(lift_pure(|x: i32| x + 10))
//!     },
//! ));
//!
//! assert_eq!(prompt(body).run(10), Ok(120));
//! ```
//!
//! Ignoring the continuation discards the rest of the scope:
//!
//! ```
//! use kleisli::prelude::*;
//!
//! let body = lift_pure(|x: i32| x + 100)
//!     .and_then(control(|_k: Resume<i32, i32, String>| -> Arrow<i32, i32, String> {
//!         lift_pure(|x: i32| x + 10)
//!     }))
//!     .and_then(lift_pure(|x: i32| x * 1000));
//!
//! assert_eq!(prompt(body).run(10), Ok(20));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::slice;
use std::sync::Arc;

use crate::arrow::operation::{Chain, Node, Operation};
use crate::arrow::Arrow;
use crate::value::{Data, Value};

/// The effects of a prompt scope on either side of a captured control.
pub(crate) struct Splice<E> {
    before: Arc<[Node<E>]>,
    after: Arc<[Node<E>]>,
}

impl<E> Clone for Splice<E> {
    fn clone(&self) -> Self {
        Splice {
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}

impl<E> Splice<E> {
    /// `before ++ [hole] ++ after`, as a single node.
    fn fill(&self, hole: Node<E>) -> Node<E> {
        if self.before.is_empty() && self.after.is_empty() {
            return hole;
        }
        let mut links = Vec::with_capacity(self.before.len() + self.after.len() + 1);
        links.extend(self.before.iter().cloned());
        links.push(hole);
        links.extend(self.after.iter().cloned());
        Arc::new(Operation::AndThen(Chain::new(links)))
    }
}

/// The top-level effects of a prompt scope.
fn effects<E>(body: &Node<E>) -> &[Node<E>] {
    match &**body {
        Operation::AndThen(links) => &links[..],
        _ => slice::from_ref(body),
    }
}

/// Capture the first top-level control effect of `body`.
///
/// Returns the arrow the control function produced, which becomes the new
/// body of the scope, or `None` when the scope holds no control effect.
pub(crate) fn unfold<E>(body: &Node<E>) -> Option<Node<E>> {
    let effects = effects(body);
    let (index, f) = effects
        .iter()
        .enumerate()
        .find_map(|(index, effect)| match &**effect {
            Operation::Control(f) => Some((index, f)),
            _ => None,
        })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(index, depth = effects.len(), "capturing control effect");

    Some(f(Splice {
        before: effects[..index].into(),
        after: effects[index + 1..].into(),
    }))
}

/// Rewrite `body` once: a scope holding a control effect becomes a prompt
/// over whatever the control function returned; any other body is returned
/// unchanged.
pub(crate) fn create_node<E>(body: &Node<E>) -> Node<E> {
    match unfold(body) {
        Some(rescoped) => Arc::new(Operation::Prompt(rescoped)),
        None => body.clone(),
    }
}

/// Apply the prompt transform to `body` once.
///
/// This is the rewrite performed whenever a prompt is evaluated. It is exposed
/// so a scope can be inspected after its first control effect is resolved.
///
/// ```
/// use kleisli::prelude::*;
/// use kleisli::{prompt, OperationKind};
///
/// let plain = lift_pure::<i32, i32, String, _>(|x| x + 1);
/// assert_eq!(prompt::create(&plain).kind(), OperationKind::LiftPure);
///
/// let body = plain.and_then(control(|k: Resume<i32, i32, String>| -> Arrow<i32, i32, String> {
///     k.with(id())
/// }));
/// let rescoped = prompt::create(&body);
/// assert_eq!(rescoped.kind(), OperationKind::Prompt);
/// assert_eq!(rescoped.run(1), Ok(2));
/// ```
pub fn create<I, O, E>(body: &Arrow<I, O, E>) -> Arrow<I, O, E> {
    Arrow::from_node(create_node(&body.node))
}

/// The captured rest of a prompt scope.
///
/// `I` and `O` are the types of the hole left by the control effect. The
/// scope's own types are chosen when resuming, and a scope whose types
/// disagree with them raises [`Fault::TypeMismatch`](crate::Fault::TypeMismatch)
/// when evaluated.
pub struct Resume<I, O, E> {
    splice: Splice<E>,
    _hole: PhantomData<fn(I) -> O>,
}

impl<I, O, E> Clone for Resume<I, O, E> {
    fn clone(&self) -> Self {
        Resume {
            splice: self.splice.clone(),
            _hole: PhantomData,
        }
    }
}

impl<I, O, E> fmt::Debug for Resume<I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resume")
            .field("before", &self.splice.before.len())
            .field("after", &self.splice.after.len())
            .finish()
    }
}

impl<I, O, E> Resume<I, O, E> {
    pub(crate) fn from_splice(splice: Splice<E>) -> Self {
        Resume {
            splice,
            _hole: PhantomData,
        }
    }

    /// Fill the hole with `hole`, run inside a prompt of its own.
    ///
    /// The result is the scope `before >>> prompt(hole) >>> after`.
    pub fn with<A, B>(&self, hole: Arrow<I, O, E>) -> Arrow<A, B, E> {
        let delimited = Arc::new(Operation::Prompt(hole.node));
        Arrow::from_node(self.splice.fill(delimited))
    }

    /// Re-run the scope from its start with `input` as its input.
    ///
    /// The hole becomes the identity and the scope `before >>> id >>> after`
    /// is fed `input` in place of whatever reaches it from upstream.
    ///
    /// ```
    /// use kleisli::prelude::*;
    ///
    /// let body = lift_pure(|x: i32| x + 10).and_then(control(
    ///     |k: Resume<i32, i32, String>| -> Arrow<i32, i32, String> { k.with_value(5) },
    /// ));
    ///
    /// assert_eq!(prompt(body).run(1000), Ok(15));
    /// ```
    pub fn with_value<A, X, B>(&self, input: A) -> Arrow<X, B, E>
    where
        A: Data,
    {
        let scope = self.splice.fill(Arc::new(Operation::Id));
        Arrow::from_operation(Operation::StubInput {
            inner: scope,
            input: Value::new(input),
        })
    }
}
