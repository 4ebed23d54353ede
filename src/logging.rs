//! # Logging Module
//!
//! Inizializzazione del sistema di logging con `tracing` per gli host che
//! incorporano il plugin e non hanno già un subscriber globale.
//!
//! `RUST_LOG` ha la precedenza; altrimenti INFO, o DEBUG con `verbose`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set, otherwise INFO or DEBUG
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    })
}

/// Install a global `fmt` subscriber. Fails if one is already installed
pub fn init_logging(verbose: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
