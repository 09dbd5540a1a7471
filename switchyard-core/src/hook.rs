//! # Primitive Kernel (Hook)
//!
//! The simplest way to take part in a request chain.
//!
//! A hook looks at the request, may mutate the request or response, and then
//! says whether the chain should go on (`Next`) or end here (`Stop`). It
//! never sees the continuation, so it cannot run code after downstream
//! layers; use a middleware for that.
//!
//! # Use Cases
//!
//! - Observing requests (logging, metrics)
//! - Rejecting requests early (auth checks that answer 401 and stop)
//! - Decorating requests before the real handlers run

use crate::error::BoxError;
use std::future::Future;

/// Result of hook execution indicating whether to continue or stop the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    /// Continue to the next matching layer.
    Next,
    /// The request was fully handled; stop the chain here.
    Stop,
}

/// A callback-style participant in a request chain.
///
/// Hooks become layers through the `HookLayer` adapter in `switchyard-std`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Hook<{Req}, {Res}>`",
    label = "missing `Hook` implementation",
    note = "Hooks must implement `on_request` for the request type `{Req}` and response type `{Res}`."
)]
pub trait Hook<Req, Res>: Send + Sync + 'static {
    /// Called when the hook's layer is reached.
    fn on_request(
        &self,
        req: &mut Req,
        res: &mut Res,
    ) -> impl Future<Output = Result<HookResult, BoxError>> + Send;
}
