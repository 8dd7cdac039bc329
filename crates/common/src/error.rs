//! Common error types shared across crates.

use thiserror::Error;

use crate::session::ErrorCategory;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Unauthenticated`] → 401
/// - [`ServiceError::Authentication`] → 401
/// - [`ServiceError::Unavailable`] → 503
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body was not valid JSON for the endpoint.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A record operation was attempted without an authenticated session.
    #[error("an authenticated session is required")]
    Unauthenticated,

    /// The identity provider rejected a sign-in attempt.
    ///
    /// Only the fixed category message is rendered; provider error text never
    /// reaches this type.
    #[error("{}", .0.user_message())]
    Authentication(ErrorCategory),

    /// The identity provider was never initialised in this process.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthenticated => 401,
            ServiceError::Authentication(_) => 401,
            ServiceError::Unavailable(_) => 503,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Unauthenticated => "unauthenticated",
            ServiceError::Authentication(category) => category.as_str(),
            ServiceError::Unavailable(_) => "service_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::Unauthenticated.http_status(), 401);
        assert_eq!(
            ServiceError::Authentication(ErrorCategory::Unknown).http_status(),
            401
        );
        assert_eq!(ServiceError::Unavailable("x".into()).http_status(), 503);
    }

    #[test]
    fn authentication_display_is_category_message() {
        let e = ServiceError::Authentication(ErrorCategory::WrongCredential);
        assert_eq!(e.to_string(), "Invalid email or password");
        assert_eq!(e.code(), "wrong_credential");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("missing field `record`".into());
        assert!(e.to_string().contains("missing field `record`"));
    }
}
