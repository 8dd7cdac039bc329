//! Field encryption: key derivation, AES-256-GCM-SIV primitives, and the
//! best-effort [`FieldCipher`] facade used by the record layer.
//!
//! This module is free of HTTP and identity-provider dependencies.
//!
//! # Ciphertext format
//!
//! ```text
//! v1.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext+tag)>
//! ```
//!
//! The `v1` prefix leaves room for a future algorithm or key-version change
//! without breaking existing ciphertext.

pub mod cipher;
pub mod facade;
pub mod key;

pub use facade::{FieldCipher, Transformed};
pub use key::{resolve_passphrase, FieldKey, KeySource};
