//! # switchyard - Ordered Routing and Middleware Chains
//!
//! `switchyard` selects, for one request, the registered layers that match
//! its method and path, and runs them as a single chain. Each layer gets a
//! [`Next`] continuation, so it can run code before and after everything
//! downstream, end the chain with its own value, or fail it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchyard::prelude::*;
//!
//! let api = Router::builder()
//!     .get("/users/:id", show_user)
//!     .build()?;
//!
//! let app = Router::builder()
//!     .attach_params(true)
//!     .using(Logger)
//!     .mount("/api", api)
//!     .build()?;
//!
//! // Raw dispatch: inspect what the chain produced.
//! let outcome = app.run(&mut req, &mut res).await?;
//!
//! // Terminal handler: fallbacks answer unmatched and failed requests.
//! let handler = app.handler(HandlerOptions::new());
//! handler.handle(&mut req, &mut res).await;
//! ```
//!
//! ## Crates
//!
//! - `switchyard-core`: collaborator traits and shared vocabulary
//! - `switchyard-std`: matching, registration, dispatch and standard layers
//! - `switchyard-macros`: `#[middleware]` and `#[hook]`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use switchyard_core::{
    // Error types
    BoxError,
    BuildError,
    DispatchError,
    // Hook
    Hook,
    HookResult,
    // Vocabulary
    Method,
    Outcome,
    Params,
    // Host collaborators
    Request,
    Response,
    UnknownMethod,
};

pub use switchyard_std::{
    BoxFuture,
    // Middleware
    DynMiddleware,
    // Handler wrapper
    ErrorFallback,
    FromFn,
    HandlerOptions,
    // Registration
    IntoLayer,
    Middleware,
    // Matching
    MountPoint,
    // Continuation
    Next,
    NoMatchFallback,
    PathMatch,
    PathPattern,
    RequestHandler,
    // Registration and dispatch
    Router,
    RouterBuilder,
    RouterOptions,
    ViaMiddleware,
    ViaRouter,
    from_fn,
    method_matches,
};

/// Standard middleware.
pub mod layers {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::layers::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::testing::*;
}

/// Prelude module - common imports for Switchyard.
///
/// # Usage
///
/// ```rust,ignore
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        BoxFuture,
        // Handler wrapper
        HandlerOptions,
        // Core traits
        Hook,
        HookResult,
        Method,
        Middleware,
        Next,
        Outcome,
        Request,
        Response,
        // Routing
        Router,
        from_fn,
        layers::{HookLayer, Logger},
    };
}

#[cfg(feature = "macros")]
pub use switchyard_macros::{hook, middleware};
