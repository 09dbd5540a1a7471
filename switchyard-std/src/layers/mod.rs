//! Standard middleware.
//!
//! - [`Logger`]: logs each request and how its chain ended
//! - [`Traced`]: runs a middleware and its downstream inside a tracing span
//! - [`HookLayer`]: adapts a [`Hook`](switchyard_core::Hook) into a middleware
//! - [`Timeout`]: bounds a middleware and its downstream with a deadline
//!   (feature `timeout`)

mod adapter;
mod logging;
mod span;
#[cfg(feature = "timeout")]
mod timeout;

pub use adapter::HookLayer;
pub use logging::Logger;
pub use span::Traced;
#[cfg(feature = "timeout")]
pub use timeout::Timeout;
