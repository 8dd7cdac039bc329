//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, and response compression.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
///
/// This is the only bound on identity-provider calls: a sign-in cut off here
/// leaves the session in `Loading` until the provider publishes a change.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
