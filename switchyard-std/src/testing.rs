//! Testing utilities for Switchyard.
//!
//! This module provides in-memory request/response types and small
//! middleware that make chains easy to observe in tests.
//!
//! # Features
//!
//! - [`TestRequest`] / [`TestResponse`]: host objects implementing the collaborator traits
//! - [`Journal`] and [`RecordingMiddleware`]: record which layers ran, in order
//! - [`CountingMiddleware`]: count how often a layer ran
//! - [`Reply`]: end the chain with a fixed value
//! - [`Fail`]: end the chain with an error

use crate::{middleware::Middleware, next::Next};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use switchyard_core::{BoxError, Outcome, Params, Request, Response};

// ============================================================================
// Host Objects
// ============================================================================

/// An in-memory request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestRequest {
    /// Method token, e.g. `"GET"`.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Parameters attached by routers built with `attach_params`.
    pub params: Params,
}

impl TestRequest {
    /// Create a request with an arbitrary method token.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: Params::new(),
        }
    }

    /// Create a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Create a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    /// Create a `HEAD` request.
    pub fn head(path: impl Into<String>) -> Self {
        Self::new("HEAD", path)
    }

    /// Look up an attached parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

impl Request for TestRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn params_mut(&mut self) -> Option<&mut Params> {
        Some(&mut self.params)
    }
}

/// An in-memory response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResponse {
    status: Option<u16>,
    body: Option<String>,
    /// Headers set by middleware under test.
    pub headers: Vec<(String, String)>,
}

impl TestResponse {
    /// Create an unanswered response.
    pub fn new() -> Self {
        Self::default()
    }

    /// The status set so far.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The body sent so far.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Whether a body was sent.
    pub fn is_sent(&self) -> bool {
        self.body.is_some()
    }

    /// Look up a header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Response for TestResponse {
    fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    fn send(&mut self, body: String) {
        self.body = Some(body);
    }
}

// ============================================================================
// Journal
// ============================================================================

/// A shared, ordered log of labels.
///
/// # Example
///
/// ```rust,ignore
/// let journal = Journal::new();
/// let router = Router::builder()
///     .using(journal.record("auth"))
///     .get("/", journal.record("index"))
///     .build()?;
///
/// router.run(&mut req, &mut res).await?;
/// assert_eq!(journal.entries(), ["auth", "index"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label.
    pub fn push(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// A snapshot of the labels written so far.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of labels written so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget every label.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// A middleware that writes `label` and then continues the chain.
    pub fn record(&self, label: impl Into<String>) -> RecordingMiddleware {
        RecordingMiddleware {
            label: label.into(),
            journal: self.clone(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Recording Middleware
// ============================================================================

/// A middleware that writes its label to a [`Journal`] on entry and then
/// continues the chain. See [`Journal::record`].
#[derive(Debug, Clone)]
pub struct RecordingMiddleware {
    label: String,
    journal: Journal,
}

impl RecordingMiddleware {
    /// The label this middleware records.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<Req, Res, V> Middleware<Req, Res, V> for RecordingMiddleware
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
{
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        self.journal.push(self.label.as_str());
        next.run(req, res).await
    }
}

// ============================================================================
// Counting Middleware
// ============================================================================

/// A middleware that counts how often it ran, then continues the chain.
#[derive(Debug, Clone, Default)]
pub struct CountingMiddleware {
    count: Arc<AtomicUsize>,
}

impl CountingMiddleware {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the middleware ran, across all clones.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<Req, Res, V> Middleware<Req, Res, V> for CountingMiddleware
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
{
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        next.run(req, res).await
    }
}

// ============================================================================
// Terminal Middleware
// ============================================================================

/// A middleware that ends the chain with a clone of its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reply<V>(pub V);

impl<Req, Res, V> Middleware<Req, Res, V> for Reply<V>
where
    Req: Send + 'static,
    Res: Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn handle<'a>(
        &'a self,
        _req: &'a mut Req,
        _res: &'a mut Res,
        _next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        Ok(Outcome::Value(self.0.clone()))
    }
}

/// A middleware that ends the chain with an error carrying its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fail {
    message: String,
}

impl Fail {
    /// Create a failing middleware.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<Req, Res, V> Middleware<Req, Res, V> for Fail
where
    Req: Send + 'static,
    Res: Send + 'static,
    V: Send + 'static,
{
    async fn handle<'a>(
        &'a self,
        _req: &'a mut Req,
        _res: &'a mut Res,
        _next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        Err(self.message.clone().into())
    }
}
