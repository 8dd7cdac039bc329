//! Selective encryption of sensitive fields in a [`Record`].
//!
//! Only top-level string values named in the field list are transformed;
//! absent, `null`, and non-string fields are passed through untouched. Field
//! names are literal keys (a `.` has no special meaning).
//!
//! Neither operation is idempotent: encrypting an already-encrypted record
//! wraps each field a second time and needs two decrypt passes to undo.

use common::protocol::Record;
use serde_json::Value;
use tracing::warn;

use crate::crypto::{FieldCipher, Transformed};

/// Return a shallow copy of `record` with every named string field encrypted.
pub fn encrypt_fields<S: AsRef<str>>(
    cipher: &FieldCipher,
    record: &Record,
    fields: &[S],
) -> Record {
    transform_fields(record, fields, "encrypt", |s| cipher.encrypt_detailed(s))
}

/// Return a shallow copy of `record` with every named string field decrypted.
pub fn decrypt_fields<S: AsRef<str>>(
    cipher: &FieldCipher,
    record: &Record,
    fields: &[S],
) -> Record {
    transform_fields(record, fields, "decrypt", |s| cipher.decrypt_detailed(s))
}

fn transform_fields<S, F>(record: &Record, fields: &[S], op: &'static str, transform: F) -> Record
where
    S: AsRef<str>,
    F: Fn(&str) -> Transformed,
{
    let mut out = record.clone();
    let mut degraded = 0usize;

    for field in fields {
        if let Some(Value::String(s)) = out.get_mut(field.as_ref()) {
            let result = transform(s);
            degraded += usize::from(result.degraded);
            *s = result.value;
        }
    }

    if degraded > 0 {
        warn!(op, degraded, "some record fields were passed through unchanged");
    }
    out
}
