//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione del pass di compressione.
//!
//! ## Responsabilità:
//! - Definisce `PartialCompressOptions` (input utente, ogni campo opzionale)
//! - Definisce `CompressOptions` (opzioni risolte, sempre complete)
//! - Merge field-by-field delle opzioni utente sui default
//! - Caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `gzip` / `deflate` / `brotli`: abilitano i singoli codec (default: true)
//! - `excludes`: pattern glob dei file da saltare (default: nessuno)
//! - `gzipOptions` / `deflateOptions`: opzioni zlib (default: livello massimo, 9)
//! - `brotliOptions`: opzioni brotli (default: quelle del codec)
//! - `concurrency`: limite file in parallelo (default: nessun limite)
//! - `progress`: mostra progress bar (default: false)
//!
//! ## Merge:
//! Il merge è shallow: se l'utente fornisce `gzipOptions`, quel record sostituisce
//! interamente quello di default. `{"gzipOptions": {"chunkSize": 4096}}` produce
//! quindi il livello di default del codec (6), non il livello massimo.
//!
//! ## Esempio:
//! ```rust
//! use build_compressor::config::{CompressOptions, PartialCompressOptions};
//!
//! let partial = PartialCompressOptions {
//!     gzip: Some(false),
//!     ..Default::default()
//! };
//! let options = CompressOptions::resolve(&partial);
//! assert!(!options.gzip);
//! assert!(options.deflate && options.brotli);
//! ```

use crate::codec::Codec;
use crate::error::{CompressError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read buffer size used when a codec record does not set `chunkSize`
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Tuning for the gzip and deflate (zlib) codecs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ZlibOptions {
    /// Compression level (0-9). `None` means the codec default (6)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Read chunk size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
}

impl ZlibOptions {
    pub const DEFAULT_LEVEL: u32 = 6;
    pub const BEST_COMPRESSION: u32 = 9;

    /// Record used for both zlib codecs when the user supplies nothing
    pub fn best_compression() -> Self {
        Self {
            level: Some(Self::BEST_COMPRESSION),
            chunk_size: None,
        }
    }

    pub fn effective_level(&self) -> u32 {
        self.level.unwrap_or(Self::DEFAULT_LEVEL)
    }

    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    /// Check the record the way the codec would before accepting it
    pub fn validate(&self) -> Result<()> {
        if self.effective_level() > Self::BEST_COMPRESSION {
            return Err(CompressError::InvalidOptions(format!(
                "zlib level must be between 0 and 9, got {}",
                self.effective_level()
            )));
        }
        if self.chunk_size == Some(0) {
            return Err(CompressError::InvalidOptions(
                "chunkSize must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tuning for the brotli codec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BrotliOptions {
    /// Quality (0-11). `None` means the codec default (11)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    /// Base-2 log of the sliding window size (10-24). `None` means 22
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lgwin: Option<u32>,
    /// Expected input size, lets the encoder tune its window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_hint: Option<usize>,
    /// Read chunk size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
}

impl BrotliOptions {
    pub const DEFAULT_QUALITY: u32 = 11;
    pub const DEFAULT_LGWIN: u32 = 22;
    pub const MIN_LGWIN: u32 = 10;
    pub const MAX_LGWIN: u32 = 24;

    pub fn effective_quality(&self) -> u32 {
        self.quality.unwrap_or(Self::DEFAULT_QUALITY)
    }

    pub fn effective_lgwin(&self) -> u32 {
        self.lgwin.unwrap_or(Self::DEFAULT_LGWIN)
    }

    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    /// Check the record the way the codec would before accepting it
    pub fn validate(&self) -> Result<()> {
        if self.effective_quality() > Self::DEFAULT_QUALITY {
            return Err(CompressError::InvalidOptions(format!(
                "brotli quality must be between 0 and 11, got {}",
                self.effective_quality()
            )));
        }
        let lgwin = self.effective_lgwin();
        if !(Self::MIN_LGWIN..=Self::MAX_LGWIN).contains(&lgwin) {
            return Err(CompressError::InvalidOptions(format!(
                "brotli lgwin must be between 10 and 24, got {}",
                lgwin
            )));
        }
        if self.chunk_size == Some(0) {
            return Err(CompressError::InvalidOptions(
                "chunkSize must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options as supplied by the user; omitted fields fall back to the defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCompressOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gzip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deflate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brotli: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excludes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gzip_options: Option<ZlibOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deflate_options: Option<ZlibOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brotli_options: Option<BrotliOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

impl PartialCompressOptions {
    /// Load options from a JSON file. A missing file yields all defaults
    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        let partial: PartialCompressOptions = serde_json::from_str(&content)
            .with_context(|| format!("Invalid options file {}", path.display()))?;
        Ok(partial)
    }

    /// Save options to a JSON file
    pub async fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Fully resolved options for one compression pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressOptions {
    pub gzip: bool,
    pub deflate: bool,
    pub brotli: bool,
    pub excludes: Vec<String>,
    pub gzip_options: ZlibOptions,
    pub deflate_options: ZlibOptions,
    pub brotli_options: BrotliOptions,
    /// Max files compressed at once. `None` leaves the fan-out unbounded
    pub concurrency: Option<usize>,
    pub progress: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            gzip: true,
            deflate: true,
            brotli: true,
            excludes: Vec::new(),
            gzip_options: ZlibOptions::best_compression(),
            deflate_options: ZlibOptions::best_compression(),
            brotli_options: BrotliOptions::default(),
            concurrency: None,
            progress: false,
        }
    }
}

impl CompressOptions {
    /// Merge user options over the defaults, one top-level field at a time
    pub fn resolve(partial: &PartialCompressOptions) -> Self {
        let defaults = Self::default();
        let partial = partial.clone();

        Self {
            gzip: partial.gzip.unwrap_or(defaults.gzip),
            deflate: partial.deflate.unwrap_or(defaults.deflate),
            brotli: partial.brotli.unwrap_or(defaults.brotli),
            excludes: partial.excludes.unwrap_or(defaults.excludes),
            gzip_options: partial.gzip_options.unwrap_or(defaults.gzip_options),
            deflate_options: partial.deflate_options.unwrap_or(defaults.deflate_options),
            brotli_options: partial.brotli_options.unwrap_or(defaults.brotli_options),
            concurrency: partial.concurrency.or(defaults.concurrency),
            progress: partial.progress.unwrap_or(defaults.progress),
        }
    }

    /// Validate pass-level parameters. Codec records are checked per job
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == Some(0) {
            return Err(CompressError::Config(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_enabled(&self, codec: Codec) -> bool {
        match codec {
            Codec::Gzip => self.gzip,
            Codec::Deflate => self.deflate,
            Codec::Brotli => self.brotli,
        }
    }

    /// Enabled codecs in their fixed execution order
    pub fn enabled_codecs(&self) -> Vec<Codec> {
        Codec::ALL
            .into_iter()
            .filter(|codec| self.is_enabled(*codec))
            .collect()
    }
}
