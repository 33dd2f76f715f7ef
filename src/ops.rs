//! Derived arrow combinators.
//!
//! Everything here is built from the core constructors: the pairing
//! combinators from `arr` and `and_then`, the control-flow combinators from
//! `arr` wrapping a direct run of their arguments. None of them adds new
//! execution semantics, so they step as a single opaque operation.
//!
//! # Examples
//!
//! ```rust
//! use kleisli::prelude::*;
//! use kleisli::ops;
//!
//! let double = lift_pure::<i32, i32, String, _>(|x| x * 2);
//! let show = lift_pure::<i32, String, String, _>(|x| x.to_string());
//!
//! // (&&&): feed one input to both arrows
//! assert_eq!(ops::split(double.clone(), show.clone()).run(4), Ok((8, "4".to_string())));
//!
//! // (***): run each arrow on its own half of a pair
//! assert_eq!(ops::merge(double, show).run((4, 5)), Ok((8, "5".to_string())));
//! ```

use std::fmt::Debug;

use crate::arrow::Arrow;
use crate::either::Either;
use crate::fault::{catch_panic, Panic};
use crate::value::Data;

/// Apply `arrow` to the first component of a pair, passing the second
/// through unchanged.
///
/// `first (Kleisli f) = Kleisli (\ ~(b, d) -> f b >>= \c -> return (c, d))`
pub fn first<I, O, D, E>(arrow: Arrow<I, O, E>) -> Arrow<(I, D), (O, D), E>
where
    I: Data,
    O: Data,
    D: Data,
    E: Send + 'static,
{
    Arrow::arr(move |(input, d): (I, D)| arrow.run(input).map(|output| (output, d)))
}

/// Apply `arrow` to the second component of a pair, passing the first
/// through unchanged.
pub fn second<I, O, D, E>(arrow: Arrow<I, O, E>) -> Arrow<(D, I), (D, O), E>
where
    I: Data,
    O: Data,
    D: Data,
    E: Send + 'static,
{
    Arrow::arr(move |(d, input): (D, I)| arrow.run(input).map(|output| (d, output)))
}

fn swap<A, B, E>() -> Arrow<(A, B), (B, A), E>
where
    A: Data,
    B: Data,
    E: Send + 'static,
{
    Arrow::lift_pure(|(a, b): (A, B)| (b, a))
}

/// Run `f` and `g` side by side on the halves of a pair (`***`).
///
/// `f *** g = first f >>> arr swap >>> first g >>> arr swap`
pub fn merge<A, B, C, D, E>(f: Arrow<A, B, E>, g: Arrow<C, D, E>) -> Arrow<(A, C), (B, D), E>
where
    A: Data,
    B: Data,
    C: Data,
    D: Data,
    E: Send + 'static,
{
    first::<A, B, C, E>(f)
        .and_then(swap())
        .and_then(first::<C, D, B, E>(g))
        .and_then(swap())
}

/// Feed one input to both `f` and `g` and pair their outputs (`&&&`).
///
/// `f &&& g = arr (\b -> (b, b)) >>> f *** g`
pub fn split<I, B, C, E>(f: Arrow<I, B, E>, g: Arrow<I, C, E>) -> Arrow<I, (B, C), E>
where
    I: Data,
    B: Data,
    C: Data,
    E: Send + 'static,
{
    Arrow::lift_pure(|input: I| (input.clone(), input)).and_then(merge(f, g))
}

/// Route a `Left` through `on_left` and a `Right` through `on_right` (`|||`).
///
/// ```rust
/// use kleisli::prelude::*;
/// use kleisli::{ops, Either};
///
/// let arrow = ops::choice(
///     lift_pure::<i32, String, (), _>(|n| format!("number {}", n)),
///     lift_pure::<String, String, (), _>(|s| format!("text {}", s)),
/// );
///
/// assert_eq!(arrow.run(Either::Left(3)), Ok("number 3".to_string()));
/// assert_eq!(arrow.run(Either::Right("x".to_string())), Ok("text x".to_string()));
/// ```
pub fn choice<L, R, O, E>(on_left: Arrow<L, O, E>, on_right: Arrow<R, O, E>) -> Arrow<Either<L, R>, O, E>
where
    L: Data,
    R: Data,
    O: Data,
    E: Send + 'static,
{
    Arrow::arr(move |input: Either<L, R>| match input {
        Either::Left(l) => on_left.run(l),
        Either::Right(r) => on_right.run(r),
    })
}

/// Apply `arrow` to `Left` values, passing `Right` values through.
pub fn left<I, O, D, E>(arrow: Arrow<I, O, E>) -> Arrow<Either<I, D>, Either<O, D>, E>
where
    I: Data,
    O: Data,
    D: Data,
    E: Send + 'static,
{
    Arrow::arr(move |input: Either<I, D>| match input {
        Either::Left(i) => arrow.run(i).map(Either::Left),
        Either::Right(d) => Ok(Either::Right(d)),
    })
}

/// Apply `arrow` to `Right` values, passing `Left` values through.
pub fn right<I, O, D, E>(arrow: Arrow<I, O, E>) -> Arrow<Either<D, I>, Either<D, O>, E>
where
    I: Data,
    O: Data,
    D: Data,
    E: Send + 'static,
{
    Arrow::arr(move |input: Either<D, I>| match input {
        Either::Left(d) => Ok(Either::Left(d)),
        Either::Right(i) => arrow.run(i).map(Either::Right),
    })
}

/// Run `cond`, then `then_arrow` or `else_arrow` on the original input.
///
/// A failing condition short-circuits and neither branch runs.
pub fn if_then_else<I, O, E>(
    cond: Arrow<I, bool, E>,
    then_arrow: Arrow<I, O, E>,
    else_arrow: Arrow<I, O, E>,
) -> Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
{
    Arrow::arr(move |input: I| {
        if cond.run(input.clone())? {
            then_arrow.run(input)
        } else {
            else_arrow.run(input)
        }
    })
}

/// Feed a value through `body` for as long as `check` holds for it.
///
/// Returns the first value for which `check` yields `false`. A failure of
/// either arrow stops the loop. Iterations run in constant stack depth.
///
/// ```rust
/// use kleisli::prelude::*;
/// use kleisli::ops;
///
/// let doubling = ops::while_do(
///     lift_pure::<u64, bool, (), _>(|x| x < 1_000),
///     lift_pure(|x: u64| x * 2),
/// );
///
/// assert_eq!(doubling.run(3), Ok(1_536));
/// ```
pub fn while_do<I, E>(check: Arrow<I, bool, E>, body: Arrow<I, I, E>) -> Arrow<I, I, E>
where
    I: Data,
    E: Send + 'static,
{
    Arrow::arr(move |input: I| {
        let mut value = input;
        while check.run(value.clone())? {
            value = body.run(value)?;
        }
        Ok(value)
    })
}

/// Acquire a resource, use it, and always release it.
///
/// Once `acquire` succeeds, `release` runs exactly once whatever `during`
/// did. The output pairs the result of `during` with the result of
/// `release`; a panic in either becomes a failure via `E: From<Panic>`.
/// Only a failed `acquire` fails the bracket itself. Release failures are
/// logged.
///
/// ```rust
/// use kleisli::prelude::*;
/// use kleisli::ops;
///
/// let arrow = ops::bracket(
///     lift_pure::<&'static str, String, String, _>(|name| format!("handle:{}", name)),
///     arr(|handle: String| Err::<usize, _>(format!("{} unreadable", handle))),
///     lift_pure(|_handle: String| ()),
/// );
///
/// let (during, release) = arrow.run("config").unwrap();
/// assert_eq!(during, Err("handle:config unreadable".to_string()));
/// assert_eq!(release, Ok(()));
/// ```
pub fn bracket<I, R, O, E>(
    acquire: Arrow<I, R, E>,
    during: Arrow<R, O, E>,
    release: Arrow<R, (), E>,
) -> Arrow<I, (Result<O, E>, Result<(), E>), E>
where
    I: Data,
    R: Data,
    O: Data,
    E: Data + From<Panic> + Debug,
{
    Arrow::arr(move |input: I| {
        let resource = acquire.run(input)?;

        let during_result = catch_panic(|| during.run(resource.clone()))
            .unwrap_or_else(|panic| Err(E::from(panic)));

        // Release runs regardless of the use result
        let release_result =
            catch_panic(|| release.run(resource)).unwrap_or_else(|panic| Err(E::from(panic)));

        if let Err(ref rel_err) = release_result {
            #[cfg(feature = "tracing")]
            tracing::warn!("Resource cleanup failed: {:?}", rel_err);
            #[cfg(not(feature = "tracing"))]
            eprintln!("Resource cleanup failed: {:?}", rel_err);
        }

        Ok((during_result, release_result))
    })
}
