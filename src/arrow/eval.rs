//! The direct evaluator.
//!
//! Evaluation is a loop over an explicit stack of pending frames, so native
//! stack depth stays constant however `and_then` and `flat_map` are nested:
//! entering an `AndThen` pushes its remaining links, entering a `FlatMap`
//! pushes its continuations together with the input they must be run against.

use crate::arrow::operation::{Chain, Continuation, Node, Operation};
use crate::fault::{catch_panic, raise, Fault};
use crate::prompt;
use crate::value::Value;

/// Work left to do once the current node produces a value.
enum Frame<E> {
    /// Remaining links of an `AndThen`; the value feeds the head.
    Links(Chain<Node<E>>),
    /// Remaining continuations of a `FlatMap`; the value picks the next
    /// arrow, which runs against `input`.
    Bind {
        continuations: Chain<Continuation<E>>,
        input: Value,
    },
}

pub(crate) fn eval<E>(node: &Node<E>, input: Value) -> Result<Value, E> {
    let mut frames: Vec<Frame<E>> = Vec::new();
    let mut current = node.clone();
    let mut input = input;

    loop {
        let result = match &*current {
            Operation::Id => Ok(input),
            Operation::Arr(f) => f(input),
            Operation::LiftPure(f) => Ok(f(input)),
            Operation::LiftImpure { f, recover } => catch_panic(|| f(input)).map_err(*recover),
            Operation::AndThen(links) => match links.split_first() {
                Some((head, rest)) => {
                    let head = head.clone();
                    if !rest.is_empty() {
                        frames.push(Frame::Links(rest));
                    }
                    current = head;
                    continue;
                }
                None => Ok(input),
            },
            Operation::FlatMap {
                first,
                continuations,
            } => {
                let first = first.clone();
                frames.push(Frame::Bind {
                    continuations: continuations.clone(),
                    input: input.clone(),
                });
                current = first;
                continue;
            }
            Operation::Prompt(body) => {
                current = resolve_prompt(body);
                continue;
            }
            Operation::StubInput { inner, input: stub } => {
                input = stub.clone();
                current = inner.clone();
                continue;
            }
            Operation::Control(_) => raise(Fault::UnpromptedControl),
        };

        // Every frame short-circuits on failure.
        let value = result?;
        loop {
            match frames.pop() {
                None => return Ok(value),
                Some(Frame::Links(links)) => {
                    let Some((head, rest)) = links.split_first() else {
                        continue;
                    };
                    let head = head.clone();
                    if !rest.is_empty() {
                        frames.push(Frame::Links(rest));
                    }
                    current = head;
                    input = value;
                    break;
                }
                Some(Frame::Bind {
                    continuations,
                    input: original,
                }) => {
                    let Some((continuation, rest)) = continuations.split_first() else {
                        continue;
                    };
                    let bound = continuation(value);
                    if !rest.is_empty() {
                        frames.push(Frame::Bind {
                            continuations: rest,
                            input: original.clone(),
                        });
                    }
                    current = bound;
                    input = original;
                    break;
                }
            }
        }
    }
}

/// Resolve control effects at the top of the scope until none remain.
fn resolve_prompt<E>(body: &Node<E>) -> Node<E> {
    let mut scope = body.clone();
    while let Some(rescoped) = prompt::unfold(&scope) {
        scope = rescoped;
    }
    scope
}
