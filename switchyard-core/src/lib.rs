//! # switchyard-core
//!
//! Core vocabulary for the Switchyard request routing and middleware engine.
//!
//! This crate has minimal dependencies and is meant to be imported by hosts
//! and middleware authors that don't need the full `switchyard-std` engine.
//!
//! # Contents
//!
//! - [`Request`] / [`Response`] - what the engine needs from host objects
//! - [`Method`] - the fixed set of methods a layer can be restricted to
//! - [`Params`] - named path parameters
//! - [`Outcome`] - a chain's value, or the `NoMatch` sentinel
//! - [`Hook`] - the callback-style primitive (continue or stop)
//!
//! # Error Types
//!
//! - [`BoxError`] - The error type carried through a chain
//! - [`BuildError`] - Registry compilation errors
//! - [`DispatchError`] - Errors raised by the executor itself

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod hook;
mod method;
mod outcome;
mod params;
mod request;
mod response;

// Re-exports
pub use error::{BoxError, BuildError, DispatchError, UnknownMethod};
pub use hook::{Hook, HookResult};
pub use method::Method;
pub use outcome::Outcome;
pub use params::Params;
pub use request::Request;
pub use response::Response;
