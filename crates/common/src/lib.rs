//! Common types, protocol definitions, and errors shared across `field-vault` crates.

pub mod error;
pub mod protocol;
pub mod session;

pub use error::ServiceError;
pub use session::{Credential, ErrorCategory, Identity, SessionState};
