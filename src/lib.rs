//! # Kleisli
//!
//! Composable effectful arrows with a steppable interpreter, delimited
//! continuations and cooperative fibers.
//!
//! An [`Arrow<I, O, E>`] describes a computation from `I` to `Result<O, E>`.
//! Arrows are immutable values: building one runs nothing. The same arrow
//! can be evaluated three ways:
//!
//! - directly, with [`Arrow::run`];
//! - one step at a time, with [`Arrow::to_steppable`];
//! - as a suspendable [`Fiber`], alone or on a round-robin [`Runtime`].
//!
//! All three agree on the result.
//!
//! ## Quick Example
//!
//! ```rust
//! use kleisli::prelude::*;
//!
//! let parse = arr(|s: String| s.trim().parse::<i32>().map_err(|e| e.to_string()));
//! let pipeline = parse
//!     .and_then(lift_pure(|n: i32| n * 2))
//!     .and_then(lift_pure(|n: i32| format!("doubled: {}", n)));
//!
//! assert_eq!(pipeline.run(" 21 ".to_string()), Ok("doubled: 42".to_string()));
//! assert!(pipeline.run("x".to_string()).is_err());
//!
//! // Step through the same pipeline
//! let mut steppable = pipeline.to_steppable("4".to_string());
//! while steppable.has_more_steps() {
//!     steppable = steppable.run_step();
//! }
//! assert_eq!(steppable.get_result(), Some(Ok("doubled: 8".to_string())));
//! ```
//!
//! ## Control effects
//!
//! ```rust
//! use kleisli::prelude::*;
//!
//! let scope = lift_pure(|x: i32| x + 100).and_then(control(
//!     |k: Resume<i32, i32, String>| -> Arrow<i32, i32, String> {
//!         k.with(lift_pure(|x: i32| x + 10))
//!     },
//! ));
//!
//! assert_eq!(prompt(scope).run(10), Ok(120));
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod arrow;
pub mod either;
pub mod fault;
pub mod fiber;
mod handlers;
pub mod ops;
pub mod prompt;
pub mod runtime;
pub mod stage;
pub mod testing;
#[cfg(feature = "tracing")]
pub mod tracing;
pub mod value;

// Re-exports
pub use arrow::{Arrow, OperationKind};
pub use either::Either;
pub use fault::{Fault, Panic};
pub use fiber::{Fiber, FiberFuture, FinishedFiber, StartedFiber};
pub use prompt::Resume;
pub use runtime::{ConfigError, FiberId, Runtime, RuntimeConfig, Tick};
pub use stage::{StagedComputation, SteppableComputation};
pub use value::Data;

#[cfg(feature = "tracing")]
pub use crate::tracing::ArrowTracingExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::arrow::{arr, control, id, lift_impure, lift_pure, prompt};
    pub use crate::arrow::{Arrow, OperationKind};
    pub use crate::either::Either;
    pub use crate::fault::{Fault, Panic};
    pub use crate::fiber::{Fiber, FinishedFiber, StartedFiber};
    pub use crate::prompt::Resume;
    pub use crate::runtime::{Runtime, RuntimeConfig, Tick};
    pub use crate::stage::{StagedComputation, SteppableComputation};
    pub use crate::value::Data;

    #[cfg(feature = "tracing")]
    pub use crate::tracing::ArrowTracingExt;
}
