//! Type-erased values flowing between the links of a composition.
//!
//! A flattened `AndThen` list, a `FlatMap` continuation list and a captured
//! continuation all hold links whose input and output types differ from one
//! another, so the engine moves values between links as [`Value`]s and the
//! typed [`Arrow`](crate::Arrow) facade converts at the boundary.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::fault::{raise, Fault};

/// Marker for types that can flow through an arrow.
///
/// Values must be clonable because the flat-map evaluator re-runs every
/// continuation against the original input and a stubbed input can be fed
/// to its arrow any number of times.
pub trait Data: Any + Clone + Send + Sync {}

impl<T: Any + Clone + Send + Sync> Data for T {}

/// A shared, type-erased value.
#[derive(Clone)]
pub(crate) struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub(crate) fn new<T: Data>(value: T) -> Self {
        Value {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Recover the typed value, cloning only when the value is still shared.
    ///
    /// A mismatch is an interpreter fault: the typed facade guarantees the
    /// types line up everywhere except across a captured continuation.
    pub(crate) fn take<T: Data>(self) -> T {
        let found = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(shared) => Arc::try_unwrap(shared).unwrap_or_else(|shared| (*shared).clone()),
            Err(_) => raise(Fault::TypeMismatch {
                expected: type_name::<T>(),
                found,
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish()
    }
}
