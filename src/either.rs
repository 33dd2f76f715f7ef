//! A neutral sum type, used to route values through
//! [`choice`](crate::ops::choice) and its relatives.
//!
//! Unlike `Result`, neither variant implies failure: `Either` only says
//! which of two branches a value belongs to.
//!
//! # Examples
//!
//! ```rust
//! use kleisli::Either;
//!
//! let cached: Either<String, i32> = Either::left("cached".to_string());
//! let description = cached.fold(
//!     |cached| format!("from cache: {}", cached),
//!     |fresh| format!("fresh: {}", fresh),
//! );
//! assert_eq!(description, "from cache: cached");
//! ```

/// A value that is either `Left(L)` or `Right(R)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Either<L, R> {
    /// The left variant
    Left(L),
    /// The right variant
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Create a Left value.
    #[inline]
    pub fn left(value: L) -> Self {
        Either::Left(value)
    }

    /// Create a Right value.
    #[inline]
    pub fn right(value: R) -> Self {
        Either::Right(value)
    }

    /// Whether this is a `Left`.
    #[inline]
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    /// Whether this is a `Right`.
    #[inline]
    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Transform the left value, leaving a right value untouched.
    pub fn map_left<L2, F>(self, f: F) -> Either<L2, R>
    where
        F: FnOnce(L) -> L2,
    {
        match self {
            Either::Left(l) => Either::Left(f(l)),
            Either::Right(r) => Either::Right(r),
        }
    }

    /// Transform the right value, leaving a left value untouched.
    pub fn map_right<R2, F>(self, f: F) -> Either<L, R2>
    where
        F: FnOnce(R) -> R2,
    {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(f(r)),
        }
    }

    /// Exchange the variants.
    ///
    /// ```rust
    /// use kleisli::Either;
    ///
    /// assert_eq!(Either::<i32, &str>::left(1).swap(), Either::right(1));
    /// ```
    pub fn swap(self) -> Either<R, L> {
        match self {
            Either::Left(l) => Either::Right(l),
            Either::Right(r) => Either::Left(r),
        }
    }

    /// Collapse both variants into one value.
    pub fn fold<T, F, G>(self, left_fn: F, right_fn: G) -> T
    where
        F: FnOnce(L) -> T,
        G: FnOnce(R) -> T,
    {
        match self {
            Either::Left(l) => left_fn(l),
            Either::Right(r) => right_fn(r),
        }
    }

    /// Read `Right` as success and `Left` as failure.
    pub fn into_result(self) -> Result<R, L> {
        match self {
            Either::Left(l) => Err(l),
            Either::Right(r) => Ok(r),
        }
    }
}

impl<T> Either<T, T> {
    /// The value, whichever side it is on.
    pub fn into_inner(self) -> T {
        match self {
            Either::Left(value) | Either::Right(value) => value,
        }
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(r) => Either::Right(r),
            Err(l) => Either::Left(l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let left: Either<i32, &str> = Either::left(1);
        let right: Either<i32, &str> = Either::right("a");
        assert!(left.is_left() && !left.is_right());
        assert!(right.is_right() && !right.is_left());
    }

    #[test]
    fn test_map_sides() {
        let left: Either<i32, i32> = Either::left(1);
        assert_eq!(left.map_left(|x| x + 1), Either::Left(2));
        assert_eq!(left.map_right(|x| x + 1), Either::Left(1));
    }

    #[test]
    fn test_fold_and_into_inner() {
        let right: Either<i32, i32> = Either::right(5);
        assert_eq!(right.fold(|l| l * 10, |r| r * 100), 500);
        assert_eq!(right.into_inner(), 5);
    }

    #[test]
    fn test_result_conversions() {
        let from_ok: Either<&str, i32> = Ok(3).into();
        let from_err: Either<&str, i32> = Err("no").into();
        assert_eq!(from_ok, Either::Right(3));
        assert_eq!(from_err.into_result(), Err("no"));
    }
}
