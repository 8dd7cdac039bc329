//! Structured logging, with OpenTelemetry span export when an OTLP endpoint is
//! configured.
//!
//! # Telemetry invariants
//!
//! - **No plaintext field values, passwords, tokens, or key material** may
//!   appear in any span attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden
//!   by `RUST_LOG` when set.

pub mod init;

pub use init::init_telemetry;
