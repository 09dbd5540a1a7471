//! Span instrumentation middleware.

use crate::{middleware::Middleware, next::Next};
use switchyard_core::{BoxError, Outcome, Request};

#[cfg(feature = "tracing")]
use tracing::Instrument;

/// A middleware wrapper that instruments execution with a `tracing` span.
///
/// The span covers the inner middleware and every layer it runs through
/// its continuation. Without the `tracing` feature the wrapper is
/// transparent.
pub struct Traced<M> {
    inner: M,
    name: &'static str,
}

impl<M> Traced<M> {
    /// Wrap `inner`; `name` is recorded on the span.
    pub const fn new(inner: M, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The name recorded on the span.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<M: Clone> Clone for Traced<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<M: Copy> Copy for Traced<M> {}

impl<M> std::fmt::Debug for Traced<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Traced").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<Req, Res, V, M> Middleware<Req, Res, V> for Traced<M>
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
    M: Middleware<Req, Res, V>,
{
    #[cfg(feature = "tracing")]
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        let span = tracing::info_span!(
            "request",
            layer = %self.name,
            method = %req.method(),
            path = %req.path()
        );
        self.inner.handle(req, res, next).instrument(span).await
    }

    #[cfg(not(feature = "tracing"))]
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        self.inner.handle(req, res, next).await
    }
}
