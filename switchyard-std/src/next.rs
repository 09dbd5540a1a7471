//! # Continuation (Next)
//!
//! The executor threads a [`Next`] through every matched layer. Calling
//! [`Next::run`] advances to the following candidate and resolves to whatever
//! the rest of the chain produced.
//!
//! `Next` is consumed by `run`, so a layer cannot advance twice, and the
//! returned future does nothing until awaited: dropping it simply means the
//! downstream layers never run. There is no way for downstream failures to
//! go unobserved.

use crate::router::{Layer, LayerHandler};
use futures::{FutureExt, future::BoxFuture};
use std::{any::Any, panic::AssertUnwindSafe};
use switchyard_core::{BoxError, DispatchError, Outcome, Params, Request};

/// A layer that matched the current request, with the data its match produced.
pub(crate) struct Candidate<'a, Req, Res, V> {
    pub(crate) layer: &'a Layer<Req, Res, V>,
    pub(crate) params: Params,
    pub(crate) remainder: Option<String>,
}

/// The continuation handed to each middleware.
///
/// # Chain depth
///
/// Every matched layer polls the rest of the chain from inside its own
/// future, so stack use grows with the number of layers one request passes
/// through. Debug builds on a 2 MiB thread stack handle a few hundred
/// layers; chains near a thousand need a larger stack or a release build.
/// Group long runs of pass-through work into one middleware, or split them
/// across mounted routers that decline early.
#[must_use = "downstream layers only run when `Next::run` is awaited"]
pub struct Next<'a, Req, Res, V = ()> {
    chain: &'a [Candidate<'a, Req, Res, V>],
    attach_params: bool,
}

impl<'a, Req, Res, V> Next<'a, Req, Res, V> {
    pub(crate) fn new(chain: &'a [Candidate<'a, Req, Res, V>], attach_params: bool) -> Self {
        Self {
            chain,
            attach_params,
        }
    }

    /// A continuation with nothing downstream; running it resolves to
    /// [`Outcome::NoMatch`].
    pub fn empty() -> Self {
        Self {
            chain: Default::default(),
            attach_params: false,
        }
    }

    /// Number of matched layers still waiting downstream.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }

    /// Whether nothing is left downstream.
    pub fn is_last(&self) -> bool {
        self.chain.is_empty()
    }
}

impl<'a, Req, Res, V> Next<'a, Req, Res, V>
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
{
    /// Run the rest of the chain and resolve to its outcome.
    ///
    /// The request and response are only reborrowed, so the caller can keep
    /// using them once the returned future resolves.
    pub fn run<'b>(
        self,
        req: &'b mut Req,
        res: &'b mut Res,
    ) -> BoxFuture<'b, Result<Outcome<V>, BoxError>>
    where
        'a: 'b,
    {
        Box::pin(async move {
            let Some((current, rest)) = self.chain.split_first() else {
                return Ok(Outcome::NoMatch);
            };
            let next = Next::new(rest, self.attach_params);

            if self.attach_params && !current.params.is_empty() {
                if let Some(params) = req.params_mut() {
                    params.merge(&current.params);
                }
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(layer = %current.layer, remaining = rest.len(), "entering layer");

            match &current.layer.handler {
                LayerHandler::Middleware(middleware) => {
                    // Closure-based middleware may panic before returning a future.
                    AssertUnwindSafe(async move { middleware.handle_dyn(req, res, next).await })
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|panic| {
                            Err(Box::new(DispatchError::Panicked(panic_message(&*panic)))
                                as BoxError)
                        })
                }
                LayerHandler::Mount(router) => {
                    let path = current.remainder.as_deref().unwrap_or("/");
                    match router.dispatch(req, res, path).await? {
                        Outcome::NoMatch => {
                            #[cfg(feature = "tracing")]
                            tracing::trace!(layer = %current.layer, "mounted router declined");

                            next.run(req, res).await
                        }
                        outcome => Ok(outcome),
                    }
                }
            }
        })
    }
}

impl<Req, Res, V> std::fmt::Debug for Next<'_, Req, Res, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.chain.len())
            .field("attach_params", &self.attach_params)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
