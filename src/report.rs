//! # Compression Report Module
//!
//! Esito di ogni job (file × codec) e report aggregato del pass.
//!
//! ## Responsabilità:
//! - `JobOutcome`: risultato di un singolo job, riuscito o fallito
//! - `CompressionReport`: tutti gli esiti in ordine manifest × codec, più i file esclusi
//! - Serializzazione JSON per i consumer programmatici
//!
//! ## Esempio JSON:
//! ```json
//! {
//!   "outcomes": [
//!     {"source": "out/app.js", "output": "out/app.js.gz", "codec": "gzip",
//!      "status": "compressed", "original_size": 10240, "compressed_size": 2311}
//!   ],
//!   "excluded": ["out/app.css.map"],
//!   "peak_files_in_flight": 1,
//!   "duration_seconds": 0.12
//! }
//! ```

use crate::codec::Codec;
use crate::file_manager::FileManager;
use crate::progress::CompressionStats;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of one (file, codec) job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Compressed {
        original_size: u64,
        compressed_size: u64,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub codec: Codec,
    #[serde(flatten)]
    pub status: JobStatus,
    #[serde(skip)]
    pub started_at: Instant,
    #[serde(skip)]
    pub finished_at: Instant,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, JobStatus::Compressed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Failed { error } => Some(error),
            JobStatus::Compressed { .. } => None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.finished_at.saturating_duration_since(self.started_at)
    }

    pub fn reduction_percent(&self) -> Option<f64> {
        match self.status {
            JobStatus::Compressed {
                original_size,
                compressed_size,
            } => Some(FileManager::calculate_reduction(original_size, compressed_size)),
            JobStatus::Failed { .. } => None,
        }
    }
}

/// Everything one build-completion pass did
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompressionReport {
    pub outcomes: Vec<JobOutcome>,
    pub excluded: Vec<PathBuf>,
    /// Highest number of files compressed at the same time
    pub peak_files_in_flight: usize,
    pub duration_seconds: f64,
}

impl CompressionReport {
    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }

    pub fn successes(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_success())
    }

    /// True when every job produced its derived file
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Outcomes for one source file, in codec order
    pub fn outcomes_for<'a>(&'a self, source: &'a Path) -> impl Iterator<Item = &'a JobOutcome> {
        self.outcomes.iter().filter(move |outcome| outcome.source == source)
    }

    pub fn stats(&self) -> CompressionStats {
        let mut stats = CompressionStats::new();
        let mut sources = HashSet::new();

        for outcome in &self.outcomes {
            match outcome.status {
                JobStatus::Compressed {
                    original_size,
                    compressed_size,
                } => {
                    sources.insert(outcome.source.as_path());
                    stats.add_compressed(original_size, compressed_size);
                }
                JobStatus::Failed { .. } => stats.add_error(),
            }
        }

        stats.files_compressed = sources.len();
        stats.files_excluded = self.excluded.len();
        stats
    }

    pub fn summary(&self) -> String {
        format!("{} in {:.2}s", self.stats().format_summary(), self.duration_seconds)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
