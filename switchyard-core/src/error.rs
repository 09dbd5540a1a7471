//! Error types for Switchyard.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`BuildError`] - Errors detected while freezing a router's registry
//! - [`DispatchError`] - Errors raised by the chain executor itself
//! - [`UnknownMethod`] - A method token outside the supported set
//!
//! Errors produced by handlers travel through the chain as [`BoxError`]
//! untouched, so fallbacks can downcast them to their original type.

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building a router.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A method-route pattern could not be compiled.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The pattern as registered.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A mount base could not be compiled.
    #[error("invalid mount base `{base}`: {reason}")]
    InvalidBase {
        /// The base as registered.
        base: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl BuildError {
    /// Build an [`BuildError::InvalidPattern`].
    pub fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        BuildError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: reason.into(),
        }
    }

    /// Build an [`BuildError::InvalidBase`].
    pub fn base(base: &str, reason: impl Into<String>) -> Self {
        BuildError::InvalidBase {
            base: base.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the chain executor rather than by a handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A handler panicked while it was running.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// A handler did not settle before its deadline.
    #[error("handler timed out after {0:?}")]
    TimedOut(Duration),
}

/// Returned when parsing a method token that is not one of the supported methods.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);
