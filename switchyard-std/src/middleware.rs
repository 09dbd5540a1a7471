//! # Middleware
//!
//! A middleware is one unit of work in a request chain. It receives the
//! request, the response and a [`Next`] continuation, and decides how the
//! chain proceeds:
//!
//! - run downstream layers with `next.run(req, res).await` and return (or
//!   transform) what they produced, possibly running code before and after;
//! - return its own [`Outcome`] without touching `next`, which ends the chain;
//! - return an error, which ends the chain and rejects the run.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Middleware`] uses native `async fn` for zero-cost static dispatch. The
//! router stores layers behind [`DynMiddleware`], which every middleware
//! implements automatically.

use crate::next::Next;
use futures::future::BoxFuture;
use switchyard_core::{BoxError, Outcome};
use std::future::Future;

/// One unit of work in a request chain.
///
/// # Example
///
/// ```rust,ignore
/// struct PoweredBy;
///
/// impl Middleware<MyRequest, MyResponse> for PoweredBy {
///     async fn handle<'a>(
///         &'a self,
///         req: &'a mut MyRequest,
///         res: &'a mut MyResponse,
///         next: Next<'a, MyRequest, MyResponse>,
///     ) -> Result<Outcome<()>, BoxError> {
///         let outcome = next.run(req, res).await?;
///         res.headers.push(("x-powered-by", "switchyard"));
///         Ok(outcome)
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Middleware<{Req}, {Res}, {V}>`",
    label = "missing `Middleware` implementation",
    note = "Implement `Middleware` directly, or wrap a closure with `switchyard::from_fn`."
)]
pub trait Middleware<Req, Res, V = ()>: Send + Sync + 'static {
    /// Handle the request, optionally delegating to the rest of the chain.
    fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> impl Future<Output = Result<Outcome<V>, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Middleware`].
pub trait DynMiddleware<Req, Res, V = ()>: Send + Sync + 'static {
    /// Handle the request (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> BoxFuture<'a, Result<Outcome<V>, BoxError>>;
}

// Blanket implementation: any Middleware is a DynMiddleware.
impl<Req, Res, V, M> DynMiddleware<Req, Res, V> for M
where
    M: Middleware<Req, Res, V>,
    Req: Send + 'static,
    Res: Send + 'static,
    V: Send + 'static,
{
    fn handle_dyn<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> BoxFuture<'a, Result<Outcome<V>, BoxError>> {
        Box::pin(self.handle(req, res, next))
    }
}

/// A middleware built from a closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F> {
    f: F,
}

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Turn a closure into a [`Middleware`].
///
/// The closure returns a boxed future borrowing its arguments, which keeps
/// the request and response usable after `next.run(..)` resolves.
///
/// ```rust,ignore
/// let add_one = from_fn(|req: &mut MyRequest, res: &mut MyResponse, next: Next<'_, MyRequest, MyResponse, i32>| {
///     Box::pin(async move { Ok(next.run(req, res).await?.map(|v| v + 1)) })
/// });
/// ```
pub fn from_fn<Req, Res, V, F>(f: F) -> FromFn<F>
where
    F: for<'a> Fn(
            &'a mut Req,
            &'a mut Res,
            Next<'a, Req, Res, V>,
        ) -> BoxFuture<'a, Result<Outcome<V>, BoxError>>
        + Send
        + Sync
        + 'static,
{
    FromFn { f }
}

impl<Req, Res, V, F> Middleware<Req, Res, V> for FromFn<F>
where
    F: for<'a> Fn(
            &'a mut Req,
            &'a mut Res,
            Next<'a, Req, Res, V>,
        ) -> BoxFuture<'a, Result<Outcome<V>, BoxError>>
        + Send
        + Sync
        + 'static,
{
    fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> impl Future<Output = Result<Outcome<V>, BoxError>> + Send {
        (self.f)(req, res, next)
    }
}
