//! # Compression Fan-out
//!
//! Orchestratore del pass di compressione per una singola build.
//!
//! ## Flusso:
//! 1. Compila i pattern di esclusione (una volta per build, non per file)
//! 2. Per ogni file del manifest, in ordine, costruisce i job dei codec abilitati
//! 3. Lancia un task tokio per file: i file procedono in parallelo, i codec
//!    dello stesso file uno dopo l'altro (gzip, deflate, brotli)
//! 4. Attende tutti i task e raccoglie gli esiti in un `CompressionReport`
//!
//! Un job fallito non ferma né gli altri file né i codec successivi dello stesso file.

use crate::compressor::{job::CompressionJob, path_resolver::PathResolver, progress_tracker::ProgressTracker};
use crate::config::CompressOptions;
use crate::error::{CompressError, Result};
use crate::exclude::ExclusionFilter;
use crate::report::{CompressionReport, JobOutcome, JobStatus};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Jobs for one manifest entry
#[derive(Debug, Clone)]
pub struct FilePlan {
    pub source: PathBuf,
    pub jobs: Vec<CompressionJob>,
}

/// Result of filtering a manifest
#[derive(Debug, Clone, Default)]
pub struct PassPlan {
    pub files: Vec<FilePlan>,
    pub excluded: Vec<PathBuf>,
}

impl PassPlan {
    pub fn total_jobs(&self) -> usize {
        self.files.iter().map(|file| file.jobs.len()).sum()
    }
}

/// Orchestratore per un pass di compressione
pub struct FanOut {
    options: CompressOptions,
    filter: ExclusionFilter,
    limiter: Option<Arc<Semaphore>>,
}

impl FanOut {
    /// Prepara il pass: valida le opzioni e compila i pattern di esclusione
    pub fn new(options: CompressOptions) -> Result<Self> {
        options.validate()?;
        let filter = ExclusionFilter::compile(&options.excludes)?;
        let limiter = options
            .concurrency
            .map(|permits| Arc::new(Semaphore::new(permits)));

        Ok(Self {
            options,
            filter,
            limiter,
        })
    }

    /// Filter the manifest and build every job, synchronously and in order
    pub fn plan<S: AsRef<str>>(&self, manifest: &[S], working_dir: Option<&Path>) -> PassPlan {
        let mut plan = PassPlan::default();

        for entry in manifest {
            let entry = entry.as_ref();
            let source = PathResolver::source_path(entry, working_dir);

            if let Some(pattern) = self.filter.matching_pattern(Path::new(entry)) {
                debug!("Excluding {} (matches `{}`)", entry, pattern);
                plan.excluded.push(source);
                continue;
            }

            let jobs = CompressionJob::for_file(source.clone(), &self.options);
            if !jobs.is_empty() {
                plan.files.push(FilePlan { source, jobs });
            }
        }

        plan
    }

    /// Esegue il pass completo sul manifest
    pub async fn run<S: AsRef<str>>(&self, manifest: &[S], working_dir: Option<&Path>) -> CompressionReport {
        let start_time = Instant::now();
        let plan = self.plan(manifest, working_dir);

        self.log_configuration(manifest.len(), &plan);

        if plan.files.is_empty() {
            info!("No output files to compress");
            return CompressionReport {
                outcomes: Vec::new(),
                excluded: plan.excluded,
                peak_files_in_flight: 0,
                duration_seconds: start_time.elapsed().as_secs_f64(),
            };
        }

        let progress_tracker = ProgressTracker::new(plan.total_jobs(), self.options.progress);
        let (outcomes, peak_files_in_flight) = self
            .process_files_concurrently(plan.files, progress_tracker.clone())
            .await;
        debug!("At most {} files were compressed at once", peak_files_in_flight);

        let report = CompressionReport {
            outcomes,
            excluded: plan.excluded,
            peak_files_in_flight,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        };

        progress_tracker.finish(&report.stats().format_summary());
        info!("=== Compression Complete ===");
        info!("{}", report.summary());
        if !report.is_success() {
            error!(
                "{} compression job(s) failed; their derived files are missing",
                report.failures().count()
            );
        }

        report
    }

    /// Logga configurazione
    fn log_configuration(&self, manifest_len: usize, plan: &PassPlan) {
        let codecs: Vec<&str> = self
            .options
            .enabled_codecs()
            .iter()
            .map(|codec| codec.name())
            .collect();

        info!(
            "Compressing build output: {} files in manifest, {} excluded, codecs: [{}]",
            manifest_len,
            plan.excluded.len(),
            codecs.join(", ")
        );
        match self.options.concurrency {
            Some(limit) => debug!("Concurrency: at most {} files at once", limit),
            None => debug!("Concurrency: unbounded"),
        }
    }

    /// Un task per file; i job di un file girano in sequenza.
    ///
    /// Restituisce gli esiti e il picco di file in lavorazione contemporanea.
    async fn process_files_concurrently(
        &self,
        files: Vec<FilePlan>,
        progress_tracker: ProgressTracker,
    ) -> (Vec<JobOutcome>, usize) {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut tasks: Vec<(FilePlan, JoinHandle<Vec<JobOutcome>>)> = Vec::with_capacity(files.len());

        for file in files {
            let jobs = file.jobs.clone();
            let limiter = self.limiter.clone();
            let progress_clone = progress_tracker.clone();
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);

            let task = tokio::spawn(async move {
                // the semaphore is never closed, so acquisition only fails if it were
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let running = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(running, Ordering::SeqCst);

                let mut outcomes = Vec::with_capacity(jobs.len());
                for job in jobs {
                    let outcome = job.run().await;
                    progress_clone.handle_job_completion(&outcome);
                    outcomes.push(outcome);
                }

                in_flight.fetch_sub(1, Ordering::SeqCst);
                outcomes
            });

            tasks.push((file, task));
        }

        // Aspetta tutti i task e raccoglie risultati in ordine di manifest
        let mut outcomes = Vec::new();
        for (file, task) in tasks {
            match task.await {
                Ok(file_outcomes) => outcomes.extend(file_outcomes),
                Err(e) => {
                    error!("Compression task for {} failed: {}", file.source.display(), e);
                    let error = CompressError::Task(e.to_string()).to_string();
                    let failed_at = Instant::now();
                    outcomes.extend(file.jobs.into_iter().map(|job| JobOutcome {
                        source: job.source,
                        output: job.output,
                        codec: job.codec,
                        status: JobStatus::Failed {
                            error: error.clone(),
                        },
                        started_at: failed_at,
                        finished_at: failed_at,
                    }));
                }
            }
        }

        (outcomes, peak.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::config::{BrotliOptions, PartialCompressOptions};
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str) -> String {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, format!("/* {} */\n", name).repeat(300)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn fan_out(partial: PartialCompressOptions) -> FanOut {
        FanOut::new(CompressOptions::resolve(&partial)).unwrap()
    }

    #[test]
    fn test_plan_keeps_manifest_and_codec_order() {
        let fan_out = fan_out(PartialCompressOptions {
            excludes: Some(vec!["*.map".to_string()]),
            ..Default::default()
        });
        let manifest = ["out/b.js", "out/a.css.map", "out/a.js"];
        let plan = fan_out.plan(&manifest, None);

        let sources: Vec<_> = plan.files.iter().map(|f| f.source.clone()).collect();
        assert_eq!(sources, vec![PathBuf::from("out/b.js"), PathBuf::from("out/a.js")]);
        assert_eq!(plan.excluded, vec![PathBuf::from("out/a.css.map")]);
        assert_eq!(plan.total_jobs(), 6);

        let codecs: Vec<_> = plan.files[0].jobs.iter().map(|j| j.codec).collect();
        assert_eq!(codecs, Codec::ALL.to_vec());
    }

    #[test]
    fn test_plan_matches_manifest_key_not_resolved_path() {
        let fan_out = fan_out(PartialCompressOptions {
            excludes: Some(vec!["out/*.js".to_string()]),
            ..Default::default()
        });
        let plan = fan_out.plan(&["out/app.js"], Some(Path::new("/srv/project")));

        assert!(plan.files.is_empty());
        assert_eq!(plan.excluded, vec![PathBuf::from("/srv/project/out/app.js")]);
    }

    #[test]
    fn test_all_codecs_disabled_plans_nothing() {
        let fan_out = fan_out(PartialCompressOptions {
            gzip: Some(false),
            deflate: Some(false),
            brotli: Some(false),
            ..Default::default()
        });
        assert_eq!(fan_out.plan(&["out/app.js"], None).total_jobs(), 0);
    }

    #[test]
    fn test_bad_pattern_fails_before_any_job() {
        let options = CompressOptions::resolve(&PartialCompressOptions {
            excludes: Some(vec!["{unclosed".to_string()]),
            ..Default::default()
        });
        assert!(matches!(FanOut::new(options), Err(CompressError::InvalidPattern { .. })));
    }

    #[tokio::test]
    async fn test_run_produces_every_derived_file() {
        let dir = TempDir::new().unwrap();
        let manifest = vec![write_file(&dir, "out/app.js"), write_file(&dir, "out/app.css")];

        let report = fan_out(PartialCompressOptions::default()).run(&manifest, None).await;

        assert!(report.is_success());
        assert_eq!(report.outcomes.len(), 6);
        for source in &manifest {
            for suffix in [".gz", ".zz", ".br"] {
                assert!(Path::new(&format!("{}{}", source, suffix)).exists());
            }
        }
        // manifest × codec order
        assert_eq!(report.outcomes[0].codec, Codec::Gzip);
        assert_eq!(report.outcomes[2].codec, Codec::Brotli);
        assert_eq!(report.outcomes[3].source, PathBuf::from(&manifest[1]));
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_job() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "out/app.js");
        let missing = dir.path().join("out/gone.js").to_string_lossy().into_owned();
        let fan_out = fan_out(PartialCompressOptions {
            brotli_options: Some(BrotliOptions {
                quality: Some(99),
                ..Default::default()
            }),
            ..Default::default()
        });

        let report = fan_out.run(&[missing.clone(), good.clone()], None).await;

        // 3 jobs for the missing file, plus the bad brotli job of the good one
        assert_eq!(report.failures().count(), 4);
        assert_eq!(report.successes().count(), 2);
        assert!(Path::new(&format!("{}.gz", good)).exists());
        assert!(Path::new(&format!("{}.zz", good)).exists());
        assert!(!Path::new(&format!("{}.br", good)).exists());
        assert!(!Path::new(&format!("{}.gz", missing)).exists());
    }

    #[tokio::test]
    async fn test_concurrency_limit_still_completes() {
        let dir = TempDir::new().unwrap();
        let manifest: Vec<String> = (0..6)
            .map(|i| write_file(&dir, &format!("out/chunk-{}.js", i)))
            .collect();
        let fan_out = fan_out(PartialCompressOptions {
            concurrency: Some(2),
            deflate: Some(false),
            brotli: Some(false),
            ..Default::default()
        });

        let report = fan_out.run(&manifest, None).await;
        assert!(report.is_success());
        assert_eq!(report.outcomes.len(), 6);
        assert!(report.peak_files_in_flight >= 1);
        assert!(report.peak_files_in_flight <= 2);
    }

    #[tokio::test]
    async fn test_unbounded_files_overlap() {
        let dir = TempDir::new().unwrap();
        let manifest: Vec<String> = (0..6)
            .map(|i| write_file(&dir, &format!("out/chunk-{}.js", i)))
            .collect();

        let report = fan_out(PartialCompressOptions::default()).run(&manifest, None).await;

        assert!(report.is_success());
        assert!(report.peak_files_in_flight > 1);
    }

    #[tokio::test]
    async fn test_codecs_of_one_file_run_in_sequence() {
        let dir = TempDir::new().unwrap();
        let manifest = vec![write_file(&dir, "out/app.js"), write_file(&dir, "out/vendor.js")];

        let report = fan_out(PartialCompressOptions::default()).run(&manifest, None).await;

        for source in &manifest {
            let outcomes: Vec<_> = report.outcomes_for(Path::new(source)).collect();
            let codecs: Vec<_> = outcomes.iter().map(|outcome| outcome.codec).collect();
            assert_eq!(codecs, Codec::ALL.to_vec());
            for pair in outcomes.windows(2) {
                assert!(pair[0].finished_at <= pair[1].started_at);
            }
        }
    }

    #[tokio::test]
    async fn test_empty_manifest() {
        let manifest: Vec<String> = Vec::new();
        let report = fan_out(PartialCompressOptions::default()).run(&manifest, None).await;
        assert!(report.outcomes.is_empty());
        assert!(report.excluded.is_empty());
        assert_eq!(report.peak_files_in_flight, 0);
    }
}
