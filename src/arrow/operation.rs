//! The tagged representation shared by every arrow.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::fault::Panic;
use crate::prompt::Splice;
use crate::value::Value;

/// A shared operation node.
pub(crate) type Node<E> = Arc<Operation<E>>;

pub(crate) type KleisliFn<E> = Arc<dyn Fn(Value) -> Result<Value, E> + Send + Sync>;
pub(crate) type PureFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
pub(crate) type Continuation<E> = Arc<dyn Fn(Value) -> Node<E> + Send + Sync>;
pub(crate) type ControlFn<E> = Arc<dyn Fn(Splice<E>) -> Node<E> + Send + Sync>;

/// The operation tag of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Output equals input.
    Id,
    /// An effectful function returning a `Result`.
    Arr,
    /// A total function; always succeeds.
    LiftPure,
    /// A function that may panic; panics become failures.
    LiftImpure,
    /// Flat sequential composition.
    AndThen,
    /// Monadic chaining.
    FlatMap,
    /// A reified control effect.
    Control,
    /// A delimiter for the nearest control effect.
    Prompt,
    /// An arrow run with a fixed input.
    StubInput,
}

/// One operation per tag, each with the fields its interpreter needs.
pub(crate) enum Operation<E> {
    Id,
    Arr(KleisliFn<E>),
    LiftPure(PureFn),
    LiftImpure {
        f: PureFn,
        recover: fn(Panic) -> E,
    },
    /// Never empty and never directly contains another `AndThen`.
    AndThen(Chain<Node<E>>),
    /// `continuations` is never empty.
    FlatMap {
        first: Node<E>,
        continuations: Chain<Continuation<E>>,
    },
    Control(ControlFn<E>),
    Prompt(Node<E>),
    StubInput {
        inner: Node<E>,
        input: Value,
    },
}

impl<E> Operation<E> {
    pub(crate) fn kind(&self) -> OperationKind {
        match self {
            Operation::Id => OperationKind::Id,
            Operation::Arr(_) => OperationKind::Arr,
            Operation::LiftPure(_) => OperationKind::LiftPure,
            Operation::LiftImpure { .. } => OperationKind::LiftImpure,
            Operation::AndThen(_) => OperationKind::AndThen,
            Operation::FlatMap { .. } => OperationKind::FlatMap,
            Operation::Control(_) => OperationKind::Control,
            Operation::Prompt(_) => OperationKind::Prompt,
            Operation::StubInput { .. } => OperationKind::StubInput,
        }
    }
}

/// A shared list seen from some offset onward.
///
/// Dropping the head with [`split_first`](Chain::split_first) shares the
/// storage, so walking a list one element at a time never copies it.
pub(crate) struct Chain<T> {
    items: Arc<Vec<T>>,
    start: usize,
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Self {
        Chain {
            items: self.items.clone(),
            start: self.start,
        }
    }
}

impl<T> Chain<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        Chain {
            items: Arc::new(items),
            start: 0,
        }
    }

    /// The head and a view of everything after it.
    pub(crate) fn split_first(&self) -> Option<(&T, Chain<T>)> {
        let head = self.items.get(self.start)?;
        let tail = Chain {
            items: self.items.clone(),
            start: self.start + 1,
        };
        Some((head, tail))
    }

    /// The visible items as an owned list, reusing the storage when this is
    /// its only handle.
    pub(crate) fn into_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        match Arc::try_unwrap(self.items) {
            Ok(mut items) => {
                items.drain(..self.start);
                items
            }
            Err(shared) => shared[self.start..].to_vec(),
        }
    }

    #[cfg(test)]
    pub(crate) fn shares_storage_with(&self, other: &Chain<T>) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl<T> Deref for Chain<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items[self.start..]
    }
}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// The links of a node, as a composition would splice them.
///
/// Reuses the list in place when this is the only handle to an `AndThen`.
pub(crate) fn into_links<E>(node: Node<E>) -> Vec<Node<E>> {
    match Arc::try_unwrap(node) {
        Ok(Operation::AndThen(links)) => links.into_vec(),
        Ok(other) => vec![Arc::new(other)],
        Err(shared) => match &*shared {
            Operation::AndThen(links) => links.to_vec(),
            _ => vec![shared],
        },
    }
}

impl<E> fmt::Debug for Operation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Id => f.write_str("Id"),
            Operation::Arr(_) => f.write_str("Arr(<function>)"),
            Operation::LiftPure(_) => f.write_str("LiftPure(<function>)"),
            Operation::LiftImpure { .. } => f.write_str("LiftImpure(<function>)"),
            Operation::AndThen(links) => f.debug_tuple("AndThen").field(links).finish(),
            Operation::FlatMap {
                first,
                continuations,
            } => f
                .debug_struct("FlatMap")
                .field("first", first)
                .field("continuations", &continuations.len())
                .finish(),
            Operation::Control(_) => f.write_str("Control(<function>)"),
            Operation::Prompt(body) => f.debug_tuple("Prompt").field(body).finish(),
            Operation::StubInput { inner, input } => f
                .debug_struct("StubInput")
                .field("inner", inner)
                .field("input", input)
                .finish(),
        }
    }
}
