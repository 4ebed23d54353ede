//! # Build Compressor Library
//!
//! Compressore post-build: dopo che il bundler ha scritto i suoi output, legge
//! il manifest dei file prodotti e scrive accanto a ciascuno le versioni
//! compresse `.gz`, `.zz` (zlib) e `.br`.
//!
//! ## Architettura dei moduli:
//! - `config`: opzioni utente, default e merge
//! - `error`: tipi di errore custom
//! - `exclude`: filtro di esclusione basato su glob
//! - `codec`: codec supportati e stadio di encoding streaming
//! - `compressor`: fan-out per build e pipeline per singolo job
//! - `plugin`: aggancio al ciclo di vita della build (`on_end`)
//! - `report`: esiti per job e report aggregato
//! - `progress`: progress bar e statistiche
//! - `file_manager`: utilità sui file
//! - `logging`: inizializzazione `tracing`
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use build_compressor::{BuildResult, CompressPlugin, Metafile, PartialCompressOptions};
//!
//! # async fn example() -> Result<(), build_compressor::CompressError> {
//! let plugin = CompressPlugin::new(PartialCompressOptions::default());
//! let metafile = Metafile::from_outputs(["dist/app.js", "dist/app.css"]);
//! let report = plugin.on_end(&BuildResult::with_metafile(metafile)).await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod compressor;
pub mod config;
pub mod error;
pub mod exclude;
pub mod file_manager;
pub mod logging;
pub mod plugin;
pub mod progress;
pub mod report;

pub use codec::Codec;
pub use compressor::FanOut;
pub use config::{BrotliOptions, CompressOptions, PartialCompressOptions, ZlibOptions};
pub use error::{CompressError, Result};
pub use exclude::ExclusionFilter;
pub use plugin::{BuildResult, CompressPlugin, Metafile, Plugin, PluginBuild};
pub use report::{CompressionReport, JobOutcome, JobStatus};
