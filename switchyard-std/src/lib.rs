//! # switchyard-std
//!
//! The routing and dispatch engine of Switchyard.
//!
//! This crate provides:
//! - **Matching**: [`PathPattern`], [`MountPoint`], [`method_matches`]
//! - **Registration**: [`RouterBuilder`], frozen into a shareable [`Router`];
//!   any layer takes a middleware or a nested router ([`IntoLayer`])
//! - **Dispatch**: [`Router::run`] and the [`Next`] continuation
//! - **Middleware**: the [`Middleware`] trait, [`DynMiddleware`], [`from_fn`]
//! - **Handler wrapper**: [`RequestHandler`] and [`HandlerOptions`]
//! - **Standard layers**: [`layers::Logger`], [`layers::Traced`],
//!   [`layers::HookLayer`] and, with the `timeout` feature, `layers::Timeout`
//! - **Testing**: in-memory hosts and observable middleware in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core vocabulary
pub use switchyard_core;

// Modules
mod handler;
pub mod layers;
mod matcher;
mod middleware;
mod next;
mod router;
pub mod testing;

pub use futures::future::BoxFuture;
pub use handler::{ErrorFallback, HandlerOptions, NoMatchFallback, RequestHandler};
pub use matcher::{MountPoint, PathMatch, PathPattern, method_matches};
pub use middleware::{DynMiddleware, FromFn, Middleware, from_fn};
pub use next::Next;
pub use router::{IntoLayer, Router, RouterBuilder, RouterOptions, ViaMiddleware, ViaRouter};
