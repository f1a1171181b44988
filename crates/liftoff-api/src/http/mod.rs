//! HTTP surface modules (router, guard middleware, handlers).

/// Countdown configuration read/write handlers.
pub mod config;
/// Uniform API error wrapper.
pub mod errors;
/// Connection guard middleware.
pub mod guard;
/// Health endpoint.
pub mod health;
/// Service index endpoint.
pub mod meta;
/// Router construction and server host.
pub mod router;
