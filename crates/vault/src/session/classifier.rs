//! Mapping from identity-provider error codes to [`ErrorCategory`].
//!
//! Both SDK-style codes (`auth/wrong-password`) and REST-style codes
//! (`INVALID_PASSWORD`, optionally followed by ` : detail`) are recognised.
//! Anything else is [`ErrorCategory::Unknown`]; the raw code is never shown to
//! end users.

use common::ErrorCategory;

/// Classify a provider error code.
pub fn classify(code: &str) -> ErrorCategory {
    match normalise(code) {
        "auth/invalid-email" | "INVALID_EMAIL" => ErrorCategory::InvalidEmail,
        "auth/user-disabled" | "USER_DISABLED" => ErrorCategory::UserDisabled,
        "auth/user-not-found" | "EMAIL_NOT_FOUND" => ErrorCategory::UserNotFound,
        "auth/wrong-password"
        | "auth/invalid-credential"
        | "INVALID_PASSWORD"
        | "INVALID_LOGIN_CREDENTIALS" => ErrorCategory::WrongCredential,
        "auth/too-many-requests" | "TOO_MANY_ATTEMPTS_TRY_LATER" => ErrorCategory::TooManyAttempts,
        "auth/network-request-failed" => ErrorCategory::NetworkError,
        _ => ErrorCategory::Unknown,
    }
}

/// Strip surrounding whitespace and any ` : detail` suffix.
fn normalise(code: &str) -> &str {
    code.split(" : ").next().unwrap_or(code).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdk_codes() {
        assert_eq!(classify("auth/invalid-email"), ErrorCategory::InvalidEmail);
        assert_eq!(classify("auth/user-disabled"), ErrorCategory::UserDisabled);
        assert_eq!(classify("auth/user-not-found"), ErrorCategory::UserNotFound);
        assert_eq!(classify("auth/wrong-password"), ErrorCategory::WrongCredential);
        assert_eq!(classify("auth/invalid-credential"), ErrorCategory::WrongCredential);
        assert_eq!(classify("auth/too-many-requests"), ErrorCategory::TooManyAttempts);
        assert_eq!(classify("auth/network-request-failed"), ErrorCategory::NetworkError);
    }

    #[test]
    fn rest_codes_with_detail_suffix() {
        assert_eq!(
            classify("TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled"),
            ErrorCategory::TooManyAttempts
        );
        assert_eq!(classify("EMAIL_NOT_FOUND"), ErrorCategory::UserNotFound);
        assert_eq!(classify(" INVALID_LOGIN_CREDENTIALS "), ErrorCategory::WrongCredential);
    }

    #[test]
    fn unmapped_codes_are_unknown() {
        assert_eq!(classify("auth/quota-exceeded"), ErrorCategory::Unknown);
        assert_eq!(classify(""), ErrorCategory::Unknown);
        assert_eq!(classify("AUTH/WRONG-PASSWORD"), ErrorCategory::Unknown);
    }
}
