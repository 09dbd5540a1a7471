//! Deadline middleware.

use crate::{middleware::Middleware, next::Next};
use std::time::Duration;
use switchyard_core::{BoxError, DispatchError, Outcome, Request};
use tokio::time::timeout;

/// A middleware wrapper that fails with [`DispatchError::TimedOut`] when
/// the inner middleware, including everything downstream of it, does not
/// settle within the deadline.
///
/// The chain is dropped at the deadline; anything it already wrote to the
/// response stays written.
#[derive(Debug, Clone, Copy)]
pub struct Timeout<M> {
    inner: M,
    duration: Duration,
}

impl<M> Timeout<M> {
    /// Bound `inner` by `duration`.
    pub fn new(inner: M, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<Req, Res, V, M> Middleware<Req, Res, V> for Timeout<M>
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
    M: Middleware<Req, Res, V>,
{
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        match timeout(self.duration, self.inner.handle(req, res, next)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(DispatchError::TimedOut(self.duration))),
        }
    }
}
