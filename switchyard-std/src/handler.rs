//! # Handler Wrapper
//!
//! [`RequestHandler`] turns a [`Router`] into a terminal request handler:
//! it runs the chain and makes sure every request ends in exactly one of
//! three places.
//!
//! | Chain result        | What happens                                   |
//! |---------------------|------------------------------------------------|
//! | a value             | discarded; handlers already wrote the response |
//! | `NoMatch`           | the no-match fallback answers                  |
//! | an error            | the error fallback answers                     |
//!
//! Fallbacks are only consulted here, never by [`Router::run`] and never for
//! mounted routers.
//!
//! # Defaults
//!
//! - no match: `404` with `Route {METHOD} {path} not found`
//! - error: `500` with `Internal Server Error`, or the error text itself
//!   when [`HandlerOptions::expose_errors`] is set. Exposing errors leaks
//!   internals to clients.
//!
//! A panic inside a fallback is not caught.

use crate::{next::Next, router::Router};
use futures::future::BoxFuture;
use std::{fmt, sync::Arc};
use switchyard_core::{BoxError, Outcome, Request, Response};

/// Fallback invoked when the chain fails.
///
/// The continuation it receives has nothing downstream.
pub type ErrorFallback<Req, Res, V> = Arc<
    dyn for<'a> Fn(BoxError, &'a mut Req, &'a mut Res, Next<'a, Req, Res, V>) -> BoxFuture<'a, ()>
        + Send
        + Sync,
>;

/// Fallback invoked when the chain resolves to [`Outcome::NoMatch`].
pub type NoMatchFallback<Req, Res> =
    Arc<dyn for<'a> Fn(&'a mut Req, &'a mut Res) -> BoxFuture<'a, ()> + Send + Sync>;

/// Configuration for [`RequestHandler`].
///
/// # Example
///
/// ```rust,ignore
/// let handler = router.handler(
///     HandlerOptions::new()
///         .on_no_match(|_req, res| Box::pin(async move {
///             res.set_status(404);
///             res.send("nothing here".into());
///         }))
///         .expose_errors(cfg!(debug_assertions)),
/// );
/// ```
pub struct HandlerOptions<Req, Res, V = ()> {
    on_error: Option<ErrorFallback<Req, Res, V>>,
    on_no_match: Option<NoMatchFallback<Req, Res>>,
    expose_errors: bool,
}

impl<Req, Res, V> Default for HandlerOptions<Req, Res, V> {
    fn default() -> Self {
        Self {
            on_error: None,
            on_no_match: None,
            expose_errors: false,
        }
    }
}

impl<Req, Res, V> Clone for HandlerOptions<Req, Res, V> {
    fn clone(&self) -> Self {
        Self {
            on_error: self.on_error.clone(),
            on_no_match: self.on_no_match.clone(),
            expose_errors: self.expose_errors,
        }
    }
}

impl<Req, Res, V> HandlerOptions<Req, Res, V> {
    /// Options using both default fallbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default error fallback.
    pub fn on_error<F>(mut self, fallback: F) -> Self
    where
        F: for<'a> Fn(BoxError, &'a mut Req, &'a mut Res, Next<'a, Req, Res, V>) -> BoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.on_error = Some(Arc::new(fallback));
        self
    }

    /// Replace the default no-match fallback.
    pub fn on_no_match<F>(mut self, fallback: F) -> Self
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.on_no_match = Some(Arc::new(fallback));
        self
    }

    /// Whether the default error fallback sends the error text to the client.
    ///
    /// Has no effect once a custom error fallback is set.
    pub fn expose_errors(mut self, expose: bool) -> Self {
        self.expose_errors = expose;
        self
    }
}

impl<Req, Res, V> fmt::Debug for HandlerOptions<Req, Res, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("on_error", &self.on_error.as_ref().map(|_| "custom"))
            .field("on_no_match", &self.on_no_match.as_ref().map(|_| "custom"))
            .field("expose_errors", &self.expose_errors)
            .finish()
    }
}

/// A router with its fallbacks resolved.
///
/// Cheap to clone; clones share the router.
pub struct RequestHandler<Req, Res, V = ()> {
    router: Router<Req, Res, V>,
    options: HandlerOptions<Req, Res, V>,
}

impl<Req, Res, V> Clone for RequestHandler<Req, Res, V> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            options: self.options.clone(),
        }
    }
}

impl<Req, Res, V> RequestHandler<Req, Res, V>
where
    Req: Request,
    Res: Response,
    V: Send + 'static,
{
    /// Wrap `router` with `options`.
    pub fn new(router: Router<Req, Res, V>, options: HandlerOptions<Req, Res, V>) -> Self {
        Self { router, options }
    }

    /// The wrapped router.
    pub fn router(&self) -> &Router<Req, Res, V> {
        &self.router
    }

    /// Handle one request to completion.
    pub async fn handle(&self, req: &mut Req, res: &mut Res) {
        match self.router.run(req, res).await {
            Ok(Outcome::Value(_)) => {}
            Ok(Outcome::NoMatch) => match &self.options.on_no_match {
                Some(fallback) => fallback(req, res).await,
                None => not_found(req, res),
            },
            Err(error) => match &self.options.on_error {
                Some(fallback) => fallback(error, req, res, Next::empty()).await,
                None => internal_error(&*error, res, self.options.expose_errors),
            },
        }
    }
}

impl<Req, Res, V> fmt::Debug for RequestHandler<Req, Res, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("router", &self.router)
            .field("options", &self.options)
            .finish()
    }
}

fn not_found<Req: Request, Res: Response>(req: &Req, res: &mut Res) {
    res.set_status(404);
    res.send(format!("Route {} {} not found", req.method(), req.path()));
}

fn internal_error<Res: Response>(
    error: &(dyn std::error::Error + Send + Sync + 'static),
    res: &mut Res,
    expose: bool,
) {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %error, "request failed");

    res.set_status(500);
    if expose {
        res.send(error.to_string());
    } else {
        res.send("Internal Server Error".to_owned());
    }
}
