//! Handler for monadic chaining.
//!
//! `Kleisli f >>= k = Kleisli $ \x -> f x >>= \a -> runKleisli (k a) x`:
//! every continuation's arrow is run against the original input `x`.

use std::sync::Arc;

use crate::arrow::eval::eval;
use crate::arrow::operation::{Chain, Continuation, Node, Operation};
use crate::stage::Stage;
use crate::value::Value;

/// Steps a `FlatMap` seed and its continuation list.
pub(crate) struct FlatMapHandler<'a, E> {
    first: &'a Node<E>,
    continuations: &'a Chain<Continuation<E>>,
}

impl<'a, E> FlatMapHandler<'a, E> {
    pub(crate) fn new(first: &'a Node<E>, continuations: &'a Chain<Continuation<E>>) -> Self {
        FlatMapHandler {
            first,
            continuations,
        }
    }

    /// Run the seed to completion and bind the first continuation.
    ///
    /// The staged input stays the effective input of this step so that the
    /// bound arrow sees the same input it would under direct evaluation.
    pub(crate) fn step(&self, input: Result<Value, E>) -> Stage<E> {
        let input = match input {
            Ok(input) => input,
            Err(error) => return Stage::done(Err(error)),
        };

        let value = match eval(self.first, input.clone()) {
            Ok(value) => value,
            Err(error) => return Stage::done(Err(error)),
        };

        let Some((continuation, rest)) = self.continuations.split_first() else {
            return Stage::done(Ok(value));
        };

        let bound = continuation(value);
        let next = if rest.is_empty() {
            bound
        } else {
            Arc::new(Operation::FlatMap {
                first: bound,
                continuations: rest,
            })
        };
        Stage::staged(Ok(input), next)
    }
}
