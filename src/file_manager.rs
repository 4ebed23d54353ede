//! # File Management Module
//!
//! Piccole utilità sui file usate dal pass di compressione.
//!
//! ## Utilità:
//! - `file_size()`: dimensione di un file su disco
//! - `remove_partial_output()`: rimuove un file derivato scritto a metà
//! - `format_size()`: converte bytes in formato leggibile (KB, MB, GB)
//! - `calculate_reduction()`: calcola percentuale di riduzione

use crate::error::{CompressError, Result};
use std::path::Path;
use tracing::warn;

/// Manages file operations for compression jobs
pub struct FileManager;

impl FileManager {
    /// Get the size of a file in bytes
    pub fn file_size(path: &Path) -> Result<u64> {
        std::fs::metadata(path)
            .map(|metadata| metadata.len())
            .map_err(|e| CompressError::io(path, e))
    }

    /// Remove a derived file left behind by a failed job
    pub fn remove_partial_output(path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
