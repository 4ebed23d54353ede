//! # Compression Job Module
//!
//! Un job = (file sorgente, codec, opzioni codec, file derivato).
//!
//! ## Pipeline:
//! 1. Validazione opzioni codec (opzioni rifiutate = nessun file creato)
//! 2. Lettura streaming del sorgente (`BufReader`, chunk limitati)
//! 3. Encoder del codec
//! 4. Scrittura su file derivato (creato o sovrascritto)
//!
//! La pipeline gira sul blocking pool di tokio. Qualsiasi errore chiude tutti
//! e tre gli stadi e rimuove il file derivato parziale.

use crate::codec::{self, Codec, CodecOptions};
use crate::compressor::path_resolver::PathResolver;
use crate::config::CompressOptions;
use crate::error::{CompressError, Result};
use crate::file_manager::FileManager;
use crate::report::{JobOutcome, JobStatus};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error};

/// One (file, codec) compression task
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionJob {
    pub source: PathBuf,
    pub codec: Codec,
    pub options: CodecOptions,
    pub output: PathBuf,
}

impl CompressionJob {
    pub fn new(source: PathBuf, codec: Codec, options: &CompressOptions) -> Self {
        let output = PathResolver::output_path(&source, codec);
        Self {
            source,
            codec,
            options: CodecOptions::for_codec(codec, options),
            output,
        }
    }

    /// Jobs for every enabled codec of `source`, in execution order
    pub fn for_file(source: PathBuf, options: &CompressOptions) -> Vec<Self> {
        options
            .enabled_codecs()
            .into_iter()
            .map(|codec| Self::new(source.clone(), codec, options))
            .collect()
    }

    /// Run the pipeline on the current thread.
    ///
    /// Returns `(original_size, compressed_size)`.
    pub fn run_blocking(&self) -> Result<(u64, u64)> {
        self.options.validate()?;

        let source = File::open(&self.source).map_err(|e| CompressError::io(&self.source, e))?;
        let original_size = source
            .metadata()
            .map_err(|e| CompressError::io(&self.source, e))?
            .len();
        let chunk_size = self.options.chunk_size();
        let mut reader = BufReader::with_capacity(chunk_size, source);

        let output = File::create(&self.output).map_err(|e| CompressError::io(&self.output, e))?;
        let writer = BufWriter::with_capacity(chunk_size, output);

        let streamed = codec::encode(self.codec, &self.options, &mut reader, writer)
            .and_then(|writer| writer.into_inner().map_err(|e| e.into_error()))
            .map(drop);

        if let Err(e) = streamed {
            FileManager::remove_partial_output(&self.output);
            return Err(CompressError::io(&self.output, e));
        }

        let compressed_size = FileManager::file_size(&self.output)?;
        Ok((original_size, compressed_size))
    }

    /// Run the pipeline on the blocking pool and record its outcome
    pub async fn run(self) -> JobOutcome {
        let started_at = Instant::now();
        let job = self.clone();
        let result = match tokio::task::spawn_blocking(move || job.run_blocking()).await {
            Ok(result) => result,
            Err(e) => Err(CompressError::Task(e.to_string())),
        };
        let finished_at = Instant::now();

        let status = match result {
            Ok((original_size, compressed_size)) => {
                debug!(
                    "Compressed {} -> {} ({} -> {})",
                    self.source.display(),
                    self.output.display(),
                    FileManager::format_size(original_size),
                    FileManager::format_size(compressed_size)
                );
                JobStatus::Compressed {
                    original_size,
                    compressed_size,
                }
            }
            Err(e) => {
                error!(
                    "Failed to compress {} with {}: {}",
                    self.source.display(),
                    self.codec,
                    e
                );
                JobStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        JobOutcome {
            source: self.source,
            output: self.output,
            codec: self.codec,
            status,
            started_at,
            finished_at,
        }
    }
}
