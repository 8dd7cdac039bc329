//! Authentication session data: states, identities, credentials, and the
//! closed set of user-facing failure categories.

use serde::{Deserialize, Serialize};

/// User-safe classification of an authentication failure.
///
/// The set is closed: provider codes that do not map to a specific category
/// collapse to [`ErrorCategory::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidEmail,
    UserDisabled,
    UserNotFound,
    WrongCredential,
    TooManyAttempts,
    NetworkError,
    Unknown,
}

impl ErrorCategory {
    /// Fixed message shown to end users for this category.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorCategory::InvalidEmail => "Invalid email address",
            ErrorCategory::UserDisabled => "User account is disabled",
            ErrorCategory::UserNotFound => "No account found with this email",
            ErrorCategory::WrongCredential => "Invalid email or password",
            ErrorCategory::TooManyAttempts => "Too many sign-in attempts, try again later",
            ErrorCategory::NetworkError => "Network error, check your connection",
            ErrorCategory::Unknown => "Sign in failed",
        }
    }

    /// Stable `snake_case` identifier, identical to the serialised form.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::InvalidEmail => "invalid_email",
            ErrorCategory::UserDisabled => "user_disabled",
            ErrorCategory::UserNotFound => "user_not_found",
            ErrorCategory::WrongCredential => "wrong_credential",
            ErrorCategory::TooManyAttempts => "too_many_attempts",
            ErrorCategory::NetworkError => "network_error",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned user id.
    pub uid: String,
    /// Email address, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Current authentication status.
///
/// Every change replaces the whole value, so an observer never sees a
/// half-applied transition. A failure category only exists inside
/// [`SessionState::Failed`]; any other state implies the error is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Loading,
    Unauthenticated,
    Authenticated { identity: Identity },
    Failed { category: ErrorCategory },
}

impl SessionState {
    /// The signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated { identity } => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated { .. } => "authenticated",
            SessionState::Failed { .. } => "failed",
        }
    }
}

/// An email + password pair for a single sign-in attempt.
///
/// Consumed by value on sign-in and never stored.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serialises_as_snake_case() {
        for category in [
            ErrorCategory::InvalidEmail,
            ErrorCategory::UserDisabled,
            ErrorCategory::UserNotFound,
            ErrorCategory::WrongCredential,
            ErrorCategory::TooManyAttempts,
            ErrorCategory::NetworkError,
            ErrorCategory::Unknown,
        ] {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.as_str());
        }
    }

    #[test]
    fn unknown_message_is_generic() {
        assert_eq!(ErrorCategory::Unknown.user_message(), "Sign in failed");
    }

    #[test]
    fn session_state_is_tagged() {
        let state = SessionState::Authenticated {
            identity: Identity {
                uid: "u1".into(),
                email: Some("a@example.com".into()),
            },
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "authenticated");
        assert_eq!(json["identity"]["uid"], "u1");

        let failed = SessionState::Failed {
            category: ErrorCategory::UserDisabled,
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["category"], "user_disabled");
    }

    #[test]
    fn default_state_is_loading() {
        assert_eq!(SessionState::default(), SessionState::Loading);
        assert!(SessionState::default().identity().is_none());
    }

    #[test]
    fn credential_debug_redacts_password() {
        let c = Credential::new("a@example.com", "hunter2");
        let dbg = format!("{c:?}");
        assert!(dbg.contains("a@example.com"));
        assert!(!dbg.contains("hunter2"));
    }
}
