//! Constructor functions for creating arrows.
//!
//! These mirror the associated constructors on [`Arrow`] so that
//! compositions read without the type prefix.

use crate::arrow::Arrow;
use crate::fault::Panic;
use crate::prompt::Resume;
use crate::value::Data;

/// The identity arrow.
///
/// # Example
///
/// ```rust
/// use kleisli::prelude::*;
///
/// assert_eq!(id::<_, ()>().run(10), Ok(10));
/// ```
pub fn id<I, E>() -> Arrow<I, I, E>
where
    I: Data,
    E: Send + 'static,
{
    Arrow::id()
}

/// Lift an effectful function.
///
/// # Example
///
/// ```rust
/// use kleisli::prelude::*;
///
/// let half = arr(|x: i32| if x % 2 == 0 { Ok(x / 2) } else { Err("odd") });
/// assert_eq!(half.run(10), Ok(5));
/// assert_eq!(half.run(3), Err("odd"));
/// ```
pub fn arr<I, O, E, F>(f: F) -> Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
    F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
{
    Arrow::arr(f)
}

/// Lift a total function.
///
/// # Example
///
/// ```rust
/// use kleisli::prelude::*;
///
/// assert_eq!(lift_pure::<_, _, (), _>(|x: i32| x + 1).run(10), Ok(11));
/// ```
pub fn lift_pure<I, O, E, F>(f: F) -> Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
    F: Fn(I) -> O + Send + Sync + 'static,
{
    Arrow::lift_pure(f)
}

/// Lift a function that may panic; panics become failures.
pub fn lift_impure<I, O, E, F>(f: F) -> Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: From<Panic> + Send + 'static,
    F: Fn(I) -> O + Send + Sync + 'static,
{
    Arrow::lift_impure(f)
}

/// Reify a control effect. See [`Arrow::control`].
pub fn control<I, O, E, A, B, F>(f: F) -> Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
    A: 'static,
    B: 'static,
    F: Fn(Resume<I, O, E>) -> Arrow<A, B, E> + Send + Sync + 'static,
{
    Arrow::control(f)
}

/// Delimit the nearest control effect inside `body`. See [`Arrow::prompt`].
pub fn prompt<I, O, E>(body: Arrow<I, O, E>) -> Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
{
    Arrow::prompt(body)
}
