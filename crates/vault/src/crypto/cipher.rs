//! AES-256-GCM-SIV encryption and decryption of individual string fields.
//!
//! Every call draws a fresh random 96-bit nonce, so encrypting the same value
//! twice yields two different ciphertexts. AES-GCM-SIV keeps an accidental
//! nonce collision from exposing the key stream.

use std::str::FromStr;

use aes_gcm_siv::{
    aead::{Aead, KeyInit, OsRng},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Prefix that appears at the start of every encrypted field value.
pub const VERSION_PREFIX: &str = "v1";

/// A parsed, encrypted field value.
///
/// The string representation is `v1.<base64url(nonce)>.<base64url(ciphertext+tag)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedField {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

impl EncryptedField {
    /// Encode this value to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}.{}.{}",
            VERSION_PREFIX,
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
        )
    }
}

impl FromStr for EncryptedField {
    type Err = CipherError;

    /// Parse an encrypted field string back into an [`EncryptedField`].
    ///
    /// Fails with [`CipherError::InvalidFormat`] if the string does not match
    /// the `v1.<nonce>.<ciphertext>` structure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, '.').collect();
        if parts.len() != 3 || parts[0] != VERSION_PREFIX {
            return Err(CipherError::InvalidFormat);
        }
        let nonce_bytes = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| CipherError::InvalidFormat)?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(CipherError::InvalidFormat);
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&nonce_bytes);

        let ciphertext = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| CipherError::InvalidFormat)?;

        Ok(Self { nonce, ciphertext })
    }
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// AES-GCM-SIV encryption or decryption failed.
    #[error("aead operation failed")]
    AeadFailure,

    /// The encrypted field string does not match the expected format.
    #[error("invalid encrypted field format")]
    InvalidFormat,

    /// Decryption succeeded but the plaintext is not UTF-8.
    #[error("decrypted field is not valid UTF-8")]
    InvalidUtf8,
}

/// Encrypt a plaintext field using AES-256-GCM-SIV under a fresh random nonce.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error.
pub fn encrypt_field(plaintext: &[u8], key: &[u8]) -> Result<EncryptedField, CipherError> {
    let cipher = build_cipher(key)?;

    use aes_gcm_siv::aead::rand_core::RngCore;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CipherError::AeadFailure)?;

    Ok(EncryptedField {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypt an [`EncryptedField`] back to plaintext bytes.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] if authentication fails (wrong key or tampered data).
pub fn decrypt_field(field: &EncryptedField, key: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    let nonce = Nonce::from_slice(&field.nonce);
    cipher
        .decrypt(nonce, field.ciphertext.as_ref())
        .map_err(|_| CipherError::AeadFailure)
}

/// Parse, decrypt, and UTF-8 decode a `v1.` string in one step.
pub fn decrypt_str(encoded: &str, key: &[u8]) -> Result<String, CipherError> {
    let field: EncryptedField = encoded.parse()?;
    let plaintext = decrypt_field(&field, key)?;
    String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
}

fn build_cipher(key: &[u8]) -> Result<Aes256GcmSiv, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    Aes256GcmSiv::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> Vec<u8> {
        use aes_gcm_siv::aead::rand_core::RngCore;
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = random_key();
        let encrypted = encrypt_field(b"555-1234", &key).unwrap();
        let decrypted = decrypt_field(&encrypted, &key).unwrap();
        assert_eq!(decrypted, b"555-1234");
    }

    #[test]
    fn fresh_nonce_per_call() {
        let key = random_key();
        let a = encrypt_field(b"same", &key).unwrap();
        let b = encrypt_field(b"same", &key).unwrap();
        assert_ne!(a.to_string_repr(), b.to_string_repr());
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let encrypted = encrypt_field(b"secret", &random_key()).unwrap();
        assert!(decrypt_field(&encrypted, &random_key()).is_err());
    }

    #[test]
    fn invalid_key_length_rejected() {
        let short_key = vec![0u8; 16];
        assert!(matches!(
            encrypt_field(b"x", &short_key),
            Err(CipherError::InvalidKeyLength)
        ));
    }

    #[test]
    fn decrypt_str_parses_repr() {
        let key = random_key();
        let s = encrypt_field("Zoë Ångström".as_bytes(), &key)
            .unwrap()
            .to_string_repr();
        assert!(s.starts_with("v1."));
        assert_eq!(decrypt_str(&s, &key).unwrap(), "Zoë Ångström");
    }

    #[test]
    fn from_str_rejects_bad_prefix() {
        assert!("v2.abc.def".parse::<EncryptedField>().is_err());
    }

    #[test]
    fn from_str_rejects_too_few_parts() {
        assert!("v1.abc".parse::<EncryptedField>().is_err());
    }

    #[test]
    fn from_str_rejects_bad_base64() {
        assert!("v1.!!!.abc".parse::<EncryptedField>().is_err());
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let key = random_key();
        let mut field = encrypt_field(b"tamper me", &key).unwrap();
        field.ciphertext[0] ^= 0xFF;
        assert!(decrypt_field(&field, &key).is_err());
    }
}
