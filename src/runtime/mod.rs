//! A cooperative, round-robin runtime for many fibers.
//!
//! The runtime owns an explicit run-queue. Each [`tick`](Runtime::tick) gives
//! the fiber at the head of the queue one turn of up to
//! [`steps_per_turn`](RuntimeConfig::steps_per_turn) steps, then moves it to
//! the back of the queue if it is still suspended. Fibers advance in FIFO
//! order, one turn each.
//!
//! # Example
//!
//! ```
//! use kleisli::{Arrow, Runtime, Tick};
//!
//! let add = |n: i32| Arrow::<i32, i32, String>::lift_pure(move |x: i32| x + n);
//!
//! let mut runtime = Runtime::new();
//! let long = runtime.spawn(&add(1).and_then(add(1)).and_then(add(1)), 0);
//! let short = runtime.spawn(&add(10), 0);
//!
//! assert_eq!(runtime.tick(), Tick::Yielded(long));
//! assert_eq!(runtime.tick(), Tick::Completed(short));
//!
//! let finished = runtime.run_all();
//! assert_eq!(finished, vec![(short, Ok(10)), (long, Ok(3))]);
//! ```

mod config;
#[cfg(feature = "serde")]
mod serde_impl;

pub use config::{ConfigError, RuntimeConfig, DEFAULT_STEPS_PER_TURN};

use std::collections::VecDeque;
use std::fmt;

use crate::arrow::Arrow;
use crate::fiber::StartedFiber;
use crate::value::Data;

/// Identifies a fiber within one [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberId(u64);

impl FiberId {
    /// The numeric id, unique within the runtime that issued it.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fiber-{}", self.0)
    }
}

/// What a single [`Runtime::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The queue was empty.
    Idle,
    /// The fiber took its turn and is still suspended.
    Yielded(FiberId),
    /// The fiber finished during its turn.
    Completed(FiberId),
}

/// A round-robin scheduler over fibers producing `Result<O, E>`.
pub struct Runtime<O, E> {
    config: RuntimeConfig,
    queue: VecDeque<(FiberId, StartedFiber<O, E>)>,
    finished: Vec<(FiberId, Result<O, E>)>,
    next_id: u64,
}

impl<O, E> fmt::Debug for Runtime<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("queued", &self.queue.len())
            .field("finished", &self.finished.len())
            .finish()
    }
}

impl<O, E> Default for Runtime<O, E>
where
    O: Data,
    E: Send + 'static,
{
    fn default() -> Self {
        Runtime::new()
    }
}

impl<O, E> Runtime<O, E>
where
    O: Data,
    E: Send + 'static,
{
    /// An empty runtime with the default configuration.
    pub fn new() -> Self {
        Runtime::with_config(RuntimeConfig::default())
    }

    /// An empty runtime with `config`.
    pub fn with_config(config: RuntimeConfig) -> Self {
        Runtime {
            config,
            queue: VecDeque::new(),
            finished: Vec::new(),
            next_id: 0,
        }
    }

    /// The scheduling configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Start `arrow` against `input` and enqueue the new fiber.
    pub fn spawn<I: Data>(&mut self, arrow: &Arrow<I, O, E>, input: I) -> FiberId {
        self.fork(arrow.to_fiber().start(input))
    }

    /// Enqueue an already started fiber at the back of the queue.
    pub fn fork(&mut self, fiber: StartedFiber<O, E>) -> FiberId {
        let id = FiberId(self.next_id);
        self.next_id += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(fiber = %id, suspended = fiber.is_suspended(), "fiber forked");

        self.queue.push_back((id, fiber));
        id
    }

    /// Give the fiber at the head of the queue one turn.
    pub fn tick(&mut self) -> Tick {
        let Some((id, mut fiber)) = self.queue.pop_front() else {
            return Tick::Idle;
        };

        for _ in 0..self.config.steps_per_turn() {
            if !fiber.is_suspended() {
                break;
            }
            fiber = fiber.resume();
        }

        match fiber {
            StartedFiber::Finished(result) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(fiber = %id, ok = result.is_ok(), "fiber completed");

                self.finished.push((id, result));
                Tick::Completed(id)
            }
            suspended => {
                #[cfg(feature = "tracing")]
                tracing::trace!(fiber = %id, "fiber yielded");

                self.queue.push_back((id, suspended));
                Tick::Yielded(id)
            }
        }
    }

    /// Tick until the queue is empty, then hand back every finished fiber in
    /// completion order.
    pub fn run_all(&mut self) -> Vec<(FiberId, Result<O, E>)> {
        while self.tick() != Tick::Idle {}
        std::mem::take(&mut self.finished)
    }

    /// Whether no fiber is queued.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued fibers.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no fiber is queued. Same as [`is_idle`](Runtime::is_idle).
    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }

    /// Results of fibers that finished but have not been collected yet.
    pub fn finished(&self) -> &[(FiberId, Result<O, E>)] {
        &self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(n: i32) -> Arrow<i32, i32, String> {
        Arrow::lift_pure(move |x: i32| x + n)
    }

    fn chain(links: usize) -> Arrow<i32, i32, String> {
        let mut arrow = add(1);
        for _ in 1..links {
            arrow = arrow.and_then(add(1));
        }
        arrow
    }

    #[test]
    fn empty_runtime_is_idle() {
        let mut runtime = Runtime::<i32, String>::new();
        assert!(runtime.is_idle());
        assert_eq!(runtime.tick(), Tick::Idle);
        assert!(runtime.run_all().is_empty());
    }

    #[test]
    fn ids_are_issued_in_order() {
        let mut runtime = Runtime::<i32, String>::new();
        let a = runtime.spawn(&add(1), 0);
        let b = runtime.spawn(&add(1), 0);
        assert_eq!(a.as_u64(), 0);
        assert_eq!(b.as_u64(), 1);
        assert_eq!(b.to_string(), "fiber-1");
        assert_eq!(runtime.len(), 2);
    }

    #[test]
    fn fibers_take_turns_round_robin() {
        let mut runtime = Runtime::<i32, String>::new();
        let a = runtime.spawn(&chain(2), 0);
        let b = runtime.spawn(&chain(2), 100);

        assert_eq!(runtime.tick(), Tick::Yielded(a));
        assert_eq!(runtime.tick(), Tick::Yielded(b));
        assert_eq!(runtime.tick(), Tick::Completed(a));
        assert_eq!(runtime.tick(), Tick::Completed(b));
        assert_eq!(runtime.tick(), Tick::Idle);
        assert_eq!(runtime.finished(), &[(a, Ok(2)), (b, Ok(102))]);
    }

    #[test]
    fn steps_per_turn_bounds_each_turn() {
        let config = RuntimeConfig::default().with_steps_per_turn(3);
        let mut runtime = Runtime::<i32, String>::with_config(config);
        let id = runtime.spawn(&chain(5), 0);

        assert_eq!(runtime.tick(), Tick::Yielded(id));
        assert_eq!(runtime.tick(), Tick::Completed(id));
        assert_eq!(runtime.run_all(), vec![(id, Ok(5))]);
    }

    #[test]
    fn forked_finished_fiber_completes_on_first_turn() {
        let mut runtime = Runtime::<i32, String>::new();
        let id = runtime.fork(StartedFiber::from_result(Err("early".to_string())));
        assert_eq!(runtime.tick(), Tick::Completed(id));
        assert_eq!(runtime.run_all(), vec![(id, Err("early".to_string()))]);
    }

    #[test]
    fn run_all_reports_completion_order() {
        let mut runtime = Runtime::<i32, String>::new();
        let long = runtime.spawn(&chain(10), 0);
        let short = runtime.spawn(&chain(1), 0);
        let failing = runtime.spawn(&add(1).and_then(Arrow::arr(|_| Err("x".to_string()))), 0);

        let finished = runtime.run_all();
        assert_eq!(
            finished,
            vec![(short, Ok(1)), (failing, Err("x".to_string())), (long, Ok(10))]
        );
        assert!(runtime.is_empty());
    }

    #[test]
    fn debug_reports_queue_sizes() {
        let mut runtime = Runtime::<i32, String>::new();
        runtime.spawn(&add(1), 0);
        let rendered = format!("{:?}", runtime);
        assert!(rendered.contains("queued: 1"));
    }
}
