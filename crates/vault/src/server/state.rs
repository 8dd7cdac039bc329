//! Shared application state injected into every Axum handler.

use crate::config::ExecutionContext;
use crate::crypto::FieldCipher;
use crate::session::SessionStore;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-backed) so that Axum can clone the
/// state for each request without copying key material or session data.
#[derive(Clone)]
pub struct AppState {
    /// Best-effort field cipher bound to the deployment key.
    pub cipher: FieldCipher,
    /// Current authentication session.
    pub session: SessionStore,
    /// Whether this process runs with an identity provider at all.
    pub execution_context: ExecutionContext,
}

impl AppState {
    /// Create a new [`AppState`] from its parts.
    pub fn new(
        cipher: FieldCipher,
        session: SessionStore,
        execution_context: ExecutionContext,
    ) -> Self {
        Self {
            cipher,
            session,
            execution_context,
        }
    }
}
