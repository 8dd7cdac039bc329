//! The identity-provider seam consumed by [`super::SessionStore`].

use async_trait::async_trait;
use common::{Credential, ErrorCategory, Identity};
use thiserror::Error;
use tokio::sync::watch;

use super::classifier::classify;

/// Errors reported by an identity provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider answered with a structured error code.
    #[error("identity provider rejected the request: {code}")]
    Rejected { code: String },

    /// The request never completed (DNS, connect, TLS, malformed response).
    #[error("identity provider request failed: {0}")]
    Transport(String),
}

impl ProviderError {
    /// User-safe category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProviderError::Rejected { code } => classify(code),
            ProviderError::Transport(_) => ErrorCategory::NetworkError,
        }
    }
}

/// External service that owns credentials and sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Channel of session changes.
    ///
    /// The receiver's current value is the identity at the time of the call
    /// (`None` when signed out); every later change is published on it.
    fn session_changes(&self) -> watch::Receiver<Option<Identity>>;

    /// Verify an email + password pair and start a session.
    async fn sign_in(&self, credential: Credential) -> Result<Identity, ProviderError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), ProviderError>;
}
