//! # Router
//!
//! Registration happens on a [`RouterBuilder`]; [`RouterBuilder::build`]
//! freezes the registry into a [`Router`], an immutable table shared behind
//! an [`Arc`]. Cloning a router is cheap and every clone dispatches over the
//! same layers, so one router can serve any number of concurrent requests.
//!
//! # Matching
//!
//! For each request, the router filters its layers, in registration order,
//! down to those whose method filter accepts the request method and whose
//! path scope matches the request path. The surviving candidates run as one
//! chain, linked by [`Next`].

use crate::{
    handler::{HandlerOptions, RequestHandler},
    matcher::{MountPoint, PathPattern, PathScope, method_matches},
    middleware::{DynMiddleware, Middleware},
    next::{Candidate, Next},
};
use futures::future::BoxFuture;
use std::{fmt, sync::Arc};
use switchyard_core::{BoxError, BuildError, Method, Outcome, Request, Response};

/// What a layer runs once it matches.
///
/// Built through [`IntoLayer`]; not nameable outside the crate.
pub enum LayerHandler<Req, Res, V> {
    /// A plain middleware.
    Middleware(Arc<dyn DynMiddleware<Req, Res, V>>),
    /// A nested router, dispatched over the unmatched path remainder.
    Mount(Router<Req, Res, V>),
}

/// Marker selecting the [`IntoLayer`] impl for middleware.
#[derive(Debug)]
pub enum ViaMiddleware {}

/// Marker selecting the [`IntoLayer`] impl for nested routers.
#[derive(Debug)]
pub enum ViaRouter {}

/// Anything a registration method accepts as a layer: a [`Middleware`] or a
/// nested [`Router`].
///
/// `Kind` only keeps the two impls apart and is always inferred.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be registered as a layer",
    label = "not a `Middleware<{Req}, {Res}, {V}>` or a `Router<{Req}, {Res}, {V}>`",
    note = "Wrap closures with `switchyard::from_fn`."
)]
pub trait IntoLayer<Req, Res, V, Kind> {
    /// Convert into the handler a layer stores.
    fn into_layer(self) -> LayerHandler<Req, Res, V>;
}

impl<Req, Res, V, M> IntoLayer<Req, Res, V, ViaMiddleware> for M
where
    M: Middleware<Req, Res, V>,
    Req: Send + 'static,
    Res: Send + 'static,
    V: Send + 'static,
{
    fn into_layer(self) -> LayerHandler<Req, Res, V> {
        LayerHandler::Middleware(Arc::new(self))
    }
}

impl<Req, Res, V> IntoLayer<Req, Res, V, ViaRouter> for Router<Req, Res, V> {
    fn into_layer(self) -> LayerHandler<Req, Res, V> {
        LayerHandler::Mount(self)
    }
}

/// One registered unit of work.
pub(crate) struct Layer<Req, Res, V> {
    /// `None` accepts every method.
    pub(crate) method: Option<Method>,
    pub(crate) scope: PathScope,
    pub(crate) handler: LayerHandler<Req, Res, V>,
}

impl<Req, Res, V> fmt::Display for Layer<Req, Res, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            Some(method) => write!(f, "{method} {}", self.scope)?,
            None => write!(f, "* {}", self.scope)?,
        }
        if let LayerHandler::Mount(_) = self.handler {
            f.write_str(" (mounted router)")?;
        }
        Ok(())
    }
}

/// Router-wide configuration, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterOptions {
    /// Merge parameters captured by each match into the request's parameter
    /// map before the matching layer runs.
    pub attach_params: bool,
}

struct RouteTable<Req, Res, V> {
    layers: Vec<Layer<Req, Res, V>>,
    options: RouterOptions,
}

impl<Req, Res, V> RouteTable<Req, Res, V> {
    fn candidates(&self, method: &str, path: &str) -> Vec<Candidate<'_, Req, Res, V>> {
        self.layers
            .iter()
            .filter(|layer| method_matches(layer.method, method))
            .filter_map(|layer| {
                let matched = layer.scope.matches(path)?;
                let remainder = match (&layer.handler, matched.remainder) {
                    (LayerHandler::Mount(_), None) => Some(path.to_owned()),
                    (_, remainder) => remainder,
                };
                Some(Candidate {
                    layer,
                    params: matched.params,
                    remainder,
                })
            })
            .collect()
    }
}

/// Builder collecting layers in registration order.
///
/// Every registration method consumes and returns the builder so calls
/// chain. An invalid pattern or base does not fail the call; the first such
/// error is reported by [`build`](Self::build).
///
/// Each call registers one layer. Several handlers for the same base or
/// pattern take one call each and run in call order. Any handler may be a
/// nested [`Router`] instead of a middleware; see [`IntoLayer`].
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::builder()
///     .attach_params(true)
///     .using(Logger)
///     .get("/users/:id", show_user)
///     .mount("/admin", admin)
///     .build()?;
/// ```
pub struct RouterBuilder<Req, Res, V = ()> {
    layers: Vec<Layer<Req, Res, V>>,
    options: RouterOptions,
    error: Option<BuildError>,
}

impl<Req, Res, V> Default for RouterBuilder<Req, Res, V> {
    fn default() -> Self {
        Self::with_options(RouterOptions::default())
    }
}

impl<Req, Res, V> RouterBuilder<Req, Res, V> {
    /// Create an empty builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with the given options.
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            layers: Vec::new(),
            options,
            error: None,
        }
    }

    /// Set whether captured parameters are attached to the request.
    pub fn attach_params(mut self, attach: bool) -> Self {
        self.options.attach_params = attach;
        self
    }

    /// Number of layers registered so far.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer has been registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Freeze the registry into a [`Router`].
    pub fn build(self) -> Result<Router<Req, Res, V>, BuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(Router {
            table: Arc::new(RouteTable {
                layers: self.layers,
                options: self.options,
            }),
        })
    }

    fn push(
        mut self,
        method: Option<Method>,
        scope: Result<PathScope, BuildError>,
        handler: LayerHandler<Req, Res, V>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        match scope {
            Ok(scope) => self.layers.push(Layer {
                method,
                scope,
                handler,
            }),
            Err(error) => self.error = Some(error),
        }
        self
    }
}

impl<Req, Res, V> RouterBuilder<Req, Res, V>
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
{
    /// Run `handler` for every request.
    ///
    /// A nested router registered this way matches against the whole path.
    pub fn using<K>(self, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.push(None, Ok(PathScope::Any), handler.into_layer())
    }

    /// Run `handler` for every request whose path lies under `base`.
    ///
    /// A nested router registered this way matches against the path with
    /// `base` stripped.
    pub fn using_at<K>(self, base: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        let scope = MountPoint::parse(base).map(PathScope::Base);
        self.push(None, scope, handler.into_layer())
    }

    /// Delegate requests under `base` to a nested router.
    ///
    /// The nested router matches against the path with `base` stripped. If
    /// none of its layers produce a value, dispatch continues with the next
    /// layer of this router.
    pub fn mount(self, base: &str, router: Router<Req, Res, V>) -> Self {
        self.using_at(base, router)
    }

    /// Run `handler` for `method` requests whose whole path matches
    /// `pattern`.
    ///
    /// A nested router registered this way matches against the pattern's
    /// wildcard capture, or `/` when the pattern has no wildcard.
    pub fn route<K>(
        self,
        method: Method,
        pattern: &str,
        handler: impl IntoLayer<Req, Res, V, K>,
    ) -> Self {
        let scope = PathPattern::parse(pattern).map(PathScope::Pattern);
        self.push(Some(method), scope, handler.into_layer())
    }

    /// Run `handler` for every `method` request, whatever its path.
    pub fn on<K>(self, method: Method, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.push(Some(method), Ok(PathScope::Any), handler.into_layer())
    }

    /// Run `handler` for requests of any method whose whole path matches
    /// `pattern`.
    pub fn all<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        let scope = PathPattern::parse(pattern).map(PathScope::Pattern);
        self.push(None, scope, handler.into_layer())
    }

    /// Register a `GET` route. It also answers `HEAD` requests.
    pub fn get<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Get, pattern, handler)
    }

    /// Register a `HEAD` route.
    pub fn head<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Head, pattern, handler)
    }

    /// Register a `POST` route.
    pub fn post<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Post, pattern, handler)
    }

    /// Register a `PUT` route.
    pub fn put<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Put, pattern, handler)
    }

    /// Register a `PATCH` route.
    pub fn patch<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Patch, pattern, handler)
    }

    /// Register a `DELETE` route.
    pub fn delete<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Delete, pattern, handler)
    }

    /// Register an `OPTIONS` route.
    pub fn options<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Options, pattern, handler)
    }

    /// Register a `TRACE` route.
    pub fn trace<K>(self, pattern: &str, handler: impl IntoLayer<Req, Res, V, K>) -> Self {
        self.route(Method::Trace, pattern, handler)
    }
}

impl<Req, Res, V> fmt::Debug for RouterBuilder<Req, Res, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field(
                "layers",
                &self.layers.iter().map(ToString::to_string).collect::<Vec<_>>(),
            )
            .field("options", &self.options)
            .field("error", &self.error)
            .finish()
    }
}

/// A frozen, shareable routing table.
pub struct Router<Req, Res, V = ()> {
    table: Arc<RouteTable<Req, Res, V>>,
}

impl<Req, Res, V> Clone for Router<Req, Res, V> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<Req, Res, V> Router<Req, Res, V> {
    /// Start building a router.
    pub fn builder() -> RouterBuilder<Req, Res, V> {
        RouterBuilder::new()
    }

    /// Number of registered layers (mounted routers count as one).
    pub fn len(&self) -> usize {
        self.table.layers.len()
    }

    /// Whether the router has no layers.
    pub fn is_empty(&self) -> bool {
        self.table.layers.is_empty()
    }

    /// The options the router was built with.
    pub fn options(&self) -> RouterOptions {
        self.table.options
    }
}

impl<Req, Res, V> Router<Req, Res, V>
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
{
    /// Match the request against the registry and run the matching chain.
    ///
    /// Resolves to [`Outcome::NoMatch`] when nothing matched or every
    /// matching layer deferred to its continuation. Errors raised by a layer
    /// are returned as-is. The response is never touched by the router
    /// itself.
    pub async fn run(&self, req: &mut Req, res: &mut Res) -> Result<Outcome<V>, BoxError> {
        let path = req.path().to_owned();
        let outcome = self.dispatch(req, res, &path).await?;

        #[cfg(feature = "tracing")]
        {
            if outcome.is_no_match() {
                tracing::debug!(method = req.method(), path = %path, "no layer produced a value");
            }
        }

        Ok(outcome)
    }

    /// Dispatch over `path`, which differs from the request path when this
    /// router is mounted.
    pub(crate) fn dispatch<'b>(
        &'b self,
        req: &'b mut Req,
        res: &'b mut Res,
        path: &'b str,
    ) -> BoxFuture<'b, Result<Outcome<V>, BoxError>> {
        Box::pin(async move {
            let candidates = self.table.candidates(req.method(), path);
            Next::new(&candidates, self.table.options.attach_params)
                .run(req, res)
                .await
        })
    }
}

impl<Req, Res, V> Router<Req, Res, V>
where
    Req: Request,
    Res: Response,
    V: Send + 'static,
{
    /// Wrap the router into a terminal request handler with fallbacks.
    pub fn handler(&self, options: HandlerOptions<Req, Res, V>) -> RequestHandler<Req, Res, V> {
        RequestHandler::new(self.clone(), options)
    }
}

impl<Req, Res, V> fmt::Debug for Router<Req, Res, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field(
                "layers",
                &self.table.layers.iter().map(ToString::to_string).collect::<Vec<_>>(),
            )
            .field("options", &self.table.options)
            .finish()
    }
}
