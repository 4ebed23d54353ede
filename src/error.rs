//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della libreria.
//!
//! ## Categorie di errori:
//! - `MissingMetafile`: il build non ha fornito il manifest degli output (fatale per il pass)
//! - `InvalidPattern`: pattern glob di esclusione malformato (fatale per il pass)
//! - `InvalidOptions`: opzioni codec rifiutate (locale al singolo job)
//! - `Io`: errori di lettura/scrittura (locale al singolo job)
//! - `Task`: task di compressione andato in panic o cancellato
//! - `Config`: file di configurazione non valido
//!
//! ## Esempio:
//! ```rust
//! use build_compressor::CompressError;
//!
//! let err = CompressError::InvalidOptions("gzip level 12 out of range".to_string());
//! assert!(!err.is_fatal());
//! ```

use std::path::PathBuf;

/// Custom error types for the compression pass
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("Expected metafile, but it does not exist. Set `metafile: true` in the build options.")]
    MissingMetafile,

    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid codec options: {0}")]
    InvalidOptions(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CompressError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors that abort the whole pass rather than a single job
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingMetafile | Self::InvalidPattern { .. } | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CompressError>;
