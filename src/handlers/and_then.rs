//! Handler for flat sequential composition.

use std::sync::Arc;

use crate::arrow::eval::eval;
use crate::arrow::operation::{Chain, Node, Operation};
use crate::stage::Stage;
use crate::value::Value;

/// Steps an `AndThen` link list.
pub(crate) struct AndThenHandler<'a, E> {
    links: &'a Chain<Node<E>>,
}

impl<'a, E> AndThenHandler<'a, E> {
    pub(crate) fn new(links: &'a Chain<Node<E>>) -> Self {
        AndThenHandler { links }
    }

    /// Run the head link to completion and stage the remaining links.
    pub(crate) fn step(&self, input: Result<Value, E>) -> Stage<E> {
        let Some((head, rest)) = self.links.split_first() else {
            return Stage::done(input);
        };

        match input.and_then(|value| eval(head, value)) {
            Ok(value) if !rest.is_empty() => {
                Stage::staged(Ok(value), Arc::new(Operation::AndThen(rest)))
            }
            result => Stage::done(result),
        }
    }
}
