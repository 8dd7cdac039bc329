//! `field-vault` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing, optional OTLP export).
//! 3. Resolve the encryption passphrase and derive the field key.
//! 4. Create the [`SessionStore`] and, in the interactive execution context,
//!    initialise the identity provider and register its session listener.
//! 5. Build the Axum router and start the HTTP server.

use anyhow::{Context, Result};
use tracing::{error, info};

use vault::config::Config;
use vault::crypto::{resolve_passphrase, FieldCipher};
use vault::server::{self, state::AppState};
use vault::session::{self, SessionStore};
use vault::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        execution_context = ?cfg.execution_context,
        "field-vault starting"
    );

    // -----------------------------------------------------------------------
    // 3. Field key
    // -----------------------------------------------------------------------
    let cipher = build_cipher(&cfg).await?;

    // -----------------------------------------------------------------------
    // 4. Session
    // -----------------------------------------------------------------------
    let session = SessionStore::new();
    session::init_for(&cfg, &session);

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(cipher, session, cfg.execution_context);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Resolve the passphrase and derive the field key off the async runtime.
async fn build_cipher(cfg: &Config) -> Result<FieldCipher> {
    let (passphrase, source) = resolve_passphrase(cfg.encryption_key.as_deref());
    if source.is_insecure() {
        if cfg.require_encryption_key {
            anyhow::bail!("ENCRYPTION_KEY is not set and REQUIRE_ENCRYPTION_KEY=true");
        }
        error!(
            "ENCRYPTION_KEY is not set; falling back to the built-in default key. \
             Fields encrypted now are readable by anyone with this binary's source. \
             Set ENCRYPTION_KEY before storing real data."
        );
    }

    let cipher =
        tokio::task::spawn_blocking(move || FieldCipher::from_passphrase(&passphrase, source))
            .await
            .context("field key derivation task panicked")?
            .context("failed to derive field key")?;
    info!(key_source = source.as_str(), "field key ready");
    Ok(cipher)
}
