//! Authentication session state machine.
//!
//! # State machine
//!
//! ```text
//!              listener(Some)                 listener(None) / sign_out
//!   Loading ─────────────────▶ Authenticated ─────────────────────────▶ Unauthenticated
//!      ▲  │                                                                   │
//!      │  └──── provider error ───▶ Failed(category)                         │
//!      └──────────────────────── sign_in ─────────────────────────────────────┘
//! ```
//!
//! [`SessionStore`] starts in `Loading`. It leaves `Loading` only once an
//! identity provider is attached and its listener fires, or a sign-in fails.
//! Without a provider (headless execution, or a provider that failed to
//! initialise) it stays in `Loading` for the life of the process.
//!
//! # Ordering
//!
//! The listener runs as its own task and can interleave with in-flight
//! `sign_in`/`sign_out` calls. A successful `sign_in` waits until the state
//! has left `Loading` before returning, but the state it observes is whatever
//! the listener last published; a concurrent sign-out can win. If the
//! listener task has ended it stops waiting and returns with the state as is.
//! Provider calls have no timeout, so a hung provider leaves the state in
//! `Loading`.

pub mod classifier;
pub mod provider;
pub mod toolkit;

pub use provider::IdentityProvider;
pub use toolkit::IdentityToolkitClient;

use std::sync::{Arc, OnceLock};

use common::{Credential, Identity, ServiceError, SessionState};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::{Config, ExecutionContext};

struct Inner {
    state: watch::Sender<SessionState>,
    provider: OnceLock<Attached>,
}

struct Attached {
    provider: Arc<dyn IdentityProvider>,
    /// Closes when the listener task exits.
    listener: watch::Receiver<()>,
}

/// Bring up the identity provider for `session` according to `cfg`.
///
/// In the headless context nothing is constructed. In the interactive context
/// a missing API key or a client construction failure is logged and is final
/// for the process: the session stays `Loading` and sign-in answers `503`.
pub fn init_for(cfg: &Config, session: &SessionStore) {
    if cfg.execution_context == ExecutionContext::Headless {
        info!("headless execution context; identity provider not initialised");
        return;
    }
    let Some(api_key) = cfg.identity_api_key.as_deref() else {
        error!("IDENTITY_API_KEY is not set; authentication is unavailable for this process");
        return;
    };
    match IdentityToolkitClient::new(&cfg.identity_base_url, api_key) {
        Ok(client) => {
            if !session.attach(Arc::new(client)) {
                warn!("identity provider was already attached");
            }
        }
        Err(e) => {
            error!(error = %e, "identity provider initialisation failed; authentication is unavailable for this process");
        }
    }
}

/// Shared holder of the current [`SessionState`].
///
/// Cheap to clone; all clones observe and mutate the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create a store in [`SessionState::Loading`] with no provider attached.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            inner: Arc::new(Inner {
                state,
                provider: OnceLock::new(),
            }),
        }
    }

    /// Register the session listener for `provider`.
    ///
    /// Only the first call has any effect; later calls return `false` and
    /// leave the existing registration in place. Must be called from within a
    /// Tokio runtime.
    pub fn attach(&self, provider: Arc<dyn IdentityProvider>) -> bool {
        let (alive, listener) = watch::channel(());
        let attached = Attached {
            provider: Arc::clone(&provider),
            listener,
        };
        if self.inner.provider.set(attached).is_err() {
            debug!("session listener already registered; ignoring");
            return false;
        }

        let mut changes = provider.session_changes();
        let store = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let _alive = alive;
            loop {
                let identity = changes.borrow_and_update().clone();
                match store.upgrade() {
                    Some(inner) => SessionStore { inner }.on_session_change(identity),
                    None => break,
                }
                if changes.changed().await.is_err() {
                    debug!("identity provider closed its session channel");
                    break;
                }
            }
        });

        info!("session listener registered");
        true
    }

    /// Whether a provider (and therefore its listener) has been attached.
    pub fn listener_registered(&self) -> bool {
        self.inner.provider.get().is_some()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    /// Receive every subsequent state. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Sign in with an email + password pair.
    ///
    /// On success, waits for the listener to move the state out of `Loading`
    /// and returns the identity reported by the provider. On failure the
    /// state becomes `Failed(category)`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Unavailable`] if no provider is attached; the state is
    ///   left untouched.
    /// - [`ServiceError::Authentication`] carrying the classified category if
    ///   the provider rejects the attempt.
    pub async fn sign_in(&self, credential: Credential) -> Result<Identity, ServiceError> {
        let Some(attached) = self.inner.provider.get() else {
            warn!("sign-in attempted but the identity provider is not initialised");
            return Err(ServiceError::Unavailable(
                "identity provider not initialised".into(),
            ));
        };
        let provider = Arc::clone(&attached.provider);
        let mut listener = attached.listener.clone();

        let mut updates = self.subscribe();
        self.transition(SessionState::Loading);

        match provider.sign_in(credential).await {
            Ok(identity) => {
                // The listener may not have seen the new session yet.
                let settled = async {
                    updates
                        .wait_for(|state| !matches!(state, SessionState::Loading))
                        .await
                        .is_ok()
                };
                tokio::select! {
                    biased;
                    _ = settled => {}
                    _ = listener.changed() => {
                        warn!(state = self.current().label(), "session listener has stopped; not waiting for it");
                    }
                }
                info!(uid = %identity.uid, "signed in");
                Ok(identity)
            }
            Err(e) => {
                let category = e.category();
                warn!(category = category.as_str(), error = %e, "sign-in failed");
                self.transition(SessionState::Failed { category });
                Err(ServiceError::Authentication(category))
            }
        }
    }

    /// End the current session.
    ///
    /// A provider failure is logged and otherwise ignored: the state is left
    /// as it was. Without a provider this does nothing.
    pub async fn sign_out(&self) {
        let Some(provider) = self.inner.provider.get().map(|a| Arc::clone(&a.provider)) else {
            debug!("sign-out ignored: identity provider not initialised");
            return;
        };
        match provider.sign_out().await {
            Ok(()) => {
                self.transition(SessionState::Unauthenticated);
                info!("signed out");
            }
            Err(e) => warn!(error = %e, "sign-out failed; session left unchanged"),
        }
    }

    fn on_session_change(&self, identity: Option<Identity>) {
        let next = match identity {
            Some(identity) => SessionState::Authenticated { identity },
            None => SessionState::Unauthenticated,
        };
        self.transition(next);
    }

    /// The single mutation point: replace the whole state and notify
    /// subscribers.
    fn transition(&self, next: SessionState) {
        let to = next.label();
        let from = self.inner.state.send_replace(next).label();
        debug!(from, to, "session transition");
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
