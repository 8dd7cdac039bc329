//! `field-vault` library: field-level record encryption and the
//! authentication session state machine that gates it.
//!
//! The binary in `main.rs` composes these into an HTTP service; business code
//! can also link the library and call [`crypto::FieldCipher`],
//! [`fields::encrypt_fields`], and [`session::SessionStore`] directly.

pub mod config;
pub mod crypto;
pub mod fields;
pub mod server;
pub mod session;
pub mod telemetry;
