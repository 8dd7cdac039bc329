//! [`IdentityToolkitClient`]: REST client for a hosted identity toolkit that
//! exposes `accounts:signInWithPassword`.
//!
//! The REST API has no push channel, so the client publishes session changes
//! itself: a successful sign-in publishes the new identity and sign-out
//! publishes `None`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use common::{Credential, Identity};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use super::provider::{IdentityProvider, ProviderError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInReply {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Identity provider backed by the identity toolkit REST API.
pub struct IdentityToolkitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session: watch::Sender<Option<Identity>>,
}

impl IdentityToolkitClient {
    /// Build a client for `base_url` authenticated with the project `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            anyhow::bail!("identity provider API key must not be empty");
        }
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build identity provider HTTP client")?;
        let (session, _) = watch::channel(None);
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key,
            session,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{method}", self.base_url)
    }
}

/// Extract the provider code from an error reply, or synthesise one from the
/// HTTP status when the body is not in the expected shape.
fn rejection_code(status: reqwest::StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorReply>(body) {
        Ok(reply) => reply.error.message,
        Err(_) => format!("HTTP_{}", status.as_u16()),
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    fn session_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }

    async fn sign_in(&self, credential: Credential) -> Result<Identity, ProviderError> {
        let body = SignInBody {
            email: &credential.email,
            password: &credential.password,
            return_secure_token: true,
        };
        let resp = self
            .http
            .post(self.endpoint("signInWithPassword"))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            // Strip the URL so the API key never reaches logs.
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            let code = rejection_code(status, &bytes);
            debug!(status = status.as_u16(), code = %code, "sign-in rejected");
            return Err(ProviderError::Rejected { code });
        }

        let reply: SignInReply = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Transport(format!("malformed sign-in reply: {e}")))?;
        let identity = Identity {
            uid: reply.local_id,
            email: reply.email,
        };
        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.session.send_replace(None);
        Ok(())
    }
}
