//! [`FieldCipher`]: best-effort encryption of single string values.
//!
//! Failures never reach the caller. Encryption that fails returns the
//! plaintext unchanged; decryption that fails (wrong key, tampering, input
//! that is not ciphertext, empty plaintext) returns the input unchanged.
//! Callers cannot tell a transformed value from a passed-through one by the
//! output alone; [`Transformed::degraded`] exposes the difference internally.

use std::sync::Arc;

use tracing::warn;

use super::cipher::{decrypt_str, encrypt_field};
use super::key::{FieldKey, KeyError, KeySource};

/// Outcome of a best-effort transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// The transformed value, or the input when `degraded` is set.
    pub value: String,
    /// `true` when the cipher failed and the input was passed through.
    pub degraded: bool,
}

impl Transformed {
    fn ok(value: String) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    fn passthrough(input: &str) -> Self {
        Self {
            value: input.to_owned(),
            degraded: true,
        }
    }
}

/// Symmetric string cipher bound to the deployment's single field key.
///
/// Cheap to clone; the key is shared behind an `Arc` and never mutated.
#[derive(Clone, Debug)]
pub struct FieldCipher {
    key: Arc<FieldKey>,
    source: KeySource,
}

impl FieldCipher {
    pub fn new(key: FieldKey, source: KeySource) -> Self {
        Self {
            key: Arc::new(key),
            source,
        }
    }

    /// Derive the key from `passphrase` and build a cipher around it.
    ///
    /// # Errors
    ///
    /// Propagates [`KeyError`] from key derivation.
    pub fn from_passphrase(passphrase: &str, source: KeySource) -> Result<Self, KeyError> {
        Ok(Self::new(FieldKey::derive(passphrase)?, source))
    }

    pub fn key_source(&self) -> KeySource {
        self.source
    }

    /// Encrypt `plaintext`, falling back to the plaintext itself on failure.
    pub fn encrypt(&self, plaintext: &str) -> String {
        self.encrypt_detailed(plaintext).value
    }

    /// Decrypt `ciphertext`, falling back to the input itself on failure.
    pub fn decrypt(&self, ciphertext: &str) -> String {
        self.decrypt_detailed(ciphertext).value
    }

    pub fn encrypt_detailed(&self, plaintext: &str) -> Transformed {
        if plaintext.is_empty() {
            return Transformed::ok(String::new());
        }
        match encrypt_field(plaintext.as_bytes(), self.key.as_bytes()) {
            Ok(field) => Transformed::ok(field.to_string_repr()),
            Err(e) => {
                warn!(error = %e, "field encryption failed; storing value unencrypted");
                Transformed::passthrough(plaintext)
            }
        }
    }

    pub fn decrypt_detailed(&self, ciphertext: &str) -> Transformed {
        if ciphertext.is_empty() {
            return Transformed::ok(String::new());
        }
        match decrypt_str(ciphertext, self.key.as_bytes()) {
            Ok(plaintext) if !plaintext.is_empty() => Transformed::ok(plaintext),
            Ok(_) => {
                warn!("field decryption produced an empty value; returning input unchanged");
                Transformed::passthrough(ciphertext)
            }
            Err(e) => {
                warn!(error = %e, "field decryption failed; returning input unchanged");
                Transformed::passthrough(ciphertext)
            }
        }
    }
}
