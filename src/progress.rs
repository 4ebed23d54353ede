//! # Progress Tracking and Statistics Module
//!
//! Progress bar opzionale e statistiche aggregate del pass di compressione.
//!
//! ## Componenti principali:
//! - `ProgressManager`: progress bar `indicatif` sul numero di job (nascosta se disabilitata)
//! - `CompressionStats`: contatori cumulativi (job riusciti, falliti, byte risparmiati)
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:02] [========================================] 12/12 (100%) [OK] app.js.br: 78.4% saved
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a compression pass
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a progress bar over `total_jobs`, or a hidden one when disabled
    pub fn new(total_jobs: u64, enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total_jobs);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// Statistics for one compression pass
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CompressionStats {
    pub files_compressed: usize,
    pub files_excluded: usize,
    pub jobs_succeeded: usize,
    pub jobs_failed: usize,
    pub total_original_size: u64,
    pub total_compressed_size: u64,
}

impl CompressionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_compressed(&mut self, original_size: u64, compressed_size: u64) {
        self.jobs_succeeded += 1;
        self.total_original_size += original_size;
        self.total_compressed_size += compressed_size;
    }

    pub fn add_error(&mut self) {
        self.jobs_failed += 1;
    }

    pub fn total_bytes_saved(&self) -> u64 {
        self.total_original_size.saturating_sub(self.total_compressed_size)
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_compressed_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Files: {} compressed, {} excluded | Jobs: {} ok, {} failed | Saved: {} ({:.2}%)",
            self.files_compressed,
            self.files_excluded,
            self.jobs_succeeded,
            self.jobs_failed,
            FileManager::format_size(self.total_bytes_saved()),
            self.overall_reduction_percent()
        )
    }
}
