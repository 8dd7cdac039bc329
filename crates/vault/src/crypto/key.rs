//! [`FieldKey`]: the single static key used for every field in a deployment,
//! and the passphrase sources it can be derived from.
//!
//! # Security invariants
//!
//! - The derived key is **never** logged, serialised, or included in traces.
//! - The same passphrase must be used for every encrypt/decrypt call within a
//!   deployment; a different passphrase silently yields undecryptable fields.

use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::cipher::KEY_LEN;

/// Passphrase substituted when no key is configured at runtime or build time.
///
/// **Insecure.** Anything encrypted under this value can be decrypted by
/// anyone holding this source code. Startup logs an error and `/health`
/// reports `degraded` whenever it is in use.
pub const INSECURE_DEFAULT_PASSPHRASE: &str = "field-vault-insecure-default-key";

/// Domain label hashed into the fixed key-derivation salt.
const KEY_SALT_DOMAIN: &[u8] = b"field-vault:field-key:v1";

/// Argon2id memory cost in KiB (19 MiB).
const ARGON2_M_COST: u32 = 19 * 1024;
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

/// Errors produced while deriving the field key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The passphrase is empty.
    #[error("encryption passphrase must not be empty")]
    EmptyPassphrase,

    /// Argon2 rejected its parameters or input.
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Where the encryption passphrase came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// `ENCRYPTION_KEY` in the process environment at startup.
    Runtime,
    /// `FIELD_VAULT_ENCRYPTION_KEY` captured when the binary was compiled.
    BuildTime,
    /// [`INSECURE_DEFAULT_PASSPHRASE`].
    InsecureDefault,
}

impl KeySource {
    pub fn as_str(self) -> &'static str {
        match self {
            KeySource::Runtime => "runtime",
            KeySource::BuildTime => "build_time",
            KeySource::InsecureDefault => "insecure_default",
        }
    }

    pub fn is_insecure(self) -> bool {
        self == KeySource::InsecureDefault
    }
}

/// Pick the passphrase to use: runtime value, then build-time value, then the
/// insecure default.
///
/// The returned copy is wiped when dropped.
pub fn resolve_passphrase(runtime: Option<&str>) -> (Zeroizing<String>, KeySource) {
    resolve_from(runtime, option_env!("FIELD_VAULT_ENCRYPTION_KEY"))
}

fn resolve_from(
    runtime: Option<&str>,
    build_time: Option<&str>,
) -> (Zeroizing<String>, KeySource) {
    let (key, source) = if let Some(key) = runtime.filter(|k| !k.is_empty()) {
        (key, KeySource::Runtime)
    } else if let Some(key) = build_time.filter(|k| !k.is_empty()) {
        (key, KeySource::BuildTime)
    } else {
        (INSECURE_DEFAULT_PASSPHRASE, KeySource::InsecureDefault)
    };
    (Zeroizing::new(key.to_owned()), source)
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FieldKey(Box<[u8; KEY_LEN]>);

impl FieldKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Box::new(bytes))
    }

    /// Stretch `passphrase` into a 256-bit key with Argon2id.
    ///
    /// The salt is fixed per product so that every process in a deployment
    /// derives the same key from the same passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptyPassphrase`] for an empty passphrase and
    /// [`KeyError::Derivation`] if Argon2 fails.
    pub fn derive(passphrase: &str) -> Result<Self, KeyError> {
        if passphrase.is_empty() {
            return Err(KeyError::EmptyPassphrase);
        }
        let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(KEY_LEN))
            .map_err(|e| KeyError::Derivation(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = Self(Box::new([0u8; KEY_LEN]));
        argon2
            .hash_password_into(passphrase.as_bytes(), &key_salt(), &mut key.0[..])
            .map_err(|e| KeyError::Derivation(e.to_string()))?;
        Ok(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

fn key_salt() -> [u8; 16] {
    let digest = Sha256::digest(KEY_SALT_DOMAIN);
    let mut salt = [0u8; 16];
    salt.copy_from_slice(&digest[..16]);
    salt
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("FieldKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_key_wins() {
        let (key, source) = resolve_from(Some("runtime-secret"), Some("baked-in"));
        assert_eq!(key.as_str(), "runtime-secret");
        assert_eq!(source, KeySource::Runtime);
    }

    #[test]
    fn build_time_key_used_when_runtime_absent() {
        let (key, source) = resolve_from(None, Some("baked-in"));
        assert_eq!(key.as_str(), "baked-in");
        assert_eq!(source, KeySource::BuildTime);

        let (_, source) = resolve_from(Some(""), Some("baked-in"));
        assert_eq!(source, KeySource::BuildTime);
    }

    #[test]
    fn falls_back_to_insecure_default() {
        let (key, source) = resolve_from(None, None);
        assert_eq!(key.as_str(), INSECURE_DEFAULT_PASSPHRASE);
        assert!(source.is_insecure());
        assert_eq!(source.as_str(), "insecure_default");
    }

    #[test]
    fn derivation_is_deterministic_per_passphrase() {
        let a = FieldKey::derive("k1").unwrap();
        let b = FieldKey::derive("k1").unwrap();
        let c = FieldKey::derive("k2").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
        assert_eq!(a.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn empty_passphrase_rejected() {
        assert!(matches!(FieldKey::derive(""), Err(KeyError::EmptyPassphrase)));
    }

    #[test]
    fn zeroize_clears_key_bytes() {
        let mut key = FieldKey::from_bytes([0xAB; KEY_LEN]);
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn field_key_redacted_in_debug() {
        let key = FieldKey::from_bytes([0xFF; KEY_LEN]);
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
