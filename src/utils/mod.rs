//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `chathub` application.
//!
//! It holds the hub-level error type and the logging bootstrap.

pub mod error;
pub mod logging;

pub use error::HubError;
