//! # Progress Tracking Module
//!
//! Tracker condiviso tra i task dei file: aggiorna la progress bar a ogni job completato.

use crate::progress::ProgressManager;
use crate::report::{JobOutcome, JobStatus};

/// Tracker progress condiviso tra i task di compressione
#[derive(Clone)]
pub struct ProgressTracker {
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker
    pub fn new(total_jobs: usize, enabled: bool) -> Self {
        Self {
            progress_manager: ProgressManager::new(total_jobs as u64, enabled),
        }
    }

    /// Aggiorna la progress bar con l'esito di un job
    pub fn handle_job_completion(&self, outcome: &JobOutcome) {
        self.progress_manager.update(&Self::completion_message(outcome));
    }

    fn completion_message(outcome: &JobOutcome) -> String {
        let name = outcome
            .output
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();

        match &outcome.status {
            JobStatus::Compressed { .. } => format!(
                "[OK] {}: {:.1}% saved",
                name,
                outcome.reduction_percent().unwrap_or_default()
            ),
            JobStatus::Failed { .. } => format!("[ERROR] {}: error", name),
        }
    }

    pub fn completed(&self) -> u64 {
        self.progress_manager.position()
    }

    /// Finalizza progress bar
    pub fn finish(&self, summary: &str) {
        self.progress_manager.finish(summary);
    }
}
