//! Tracing support for arrows.
//!
//! This module provides the `instrument` method for running an arrow inside a
//! tracing span. Feature-gated behind `#[cfg(feature = "tracing")]`.

use tracing::Span;

use crate::arrow::Arrow;
use crate::value::Data;

/// Extension trait for adding tracing instrumentation to arrows.
///
/// This trait is only available when the `tracing` feature is enabled.
pub trait ArrowTracingExt<I, O, E> {
    /// Run this arrow inside `span`.
    ///
    /// The span is entered for the whole evaluation, and an `error` event is
    /// recorded in it when the arrow fails. The instrumented arrow is a single
    /// opaque operation, so stepping does not descend into it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kleisli::prelude::*;
    /// use kleisli::ArrowTracingExt;
    /// use tracing::info_span;
    ///
    /// let order_id = 17;
    /// let arrow = lift_pure::<i32, i32, String, _>(|x| x * 2)
    ///     .instrument(info_span!("price_order", order_id));
    ///
    /// assert_eq!(arrow.run(21), Ok(42));
    /// ```
    fn instrument(self, span: Span) -> Arrow<I, O, E>;
}

impl<I, O, E> ArrowTracingExt<I, O, E> for Arrow<I, O, E>
where
    I: Data,
    O: Data,
    E: Send + 'static,
{
    fn instrument(self, span: Span) -> Arrow<I, O, E> {
        Arrow::arr(move |input: I| {
            let _entered = span.enter();
            let result = self.run(input);
            if result.is_err() {
                tracing::error!("arrow failed");
            }
            result
        })
    }
}
