//! Single-step handlers for compositions.
//!
//! Each handler advances one composition variant by exactly one link and
//! stages the rest as a view over the same shared list, so stepping through
//! a chain of any length costs constant time per step. The direct evaluator
//! walks the same lists with its own frame stack.

mod and_then;
mod flat_map;

pub(crate) use and_then::AndThenHandler;
pub(crate) use flat_map::FlatMapHandler;
