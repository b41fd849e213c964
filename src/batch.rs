//! Labels a directory of documents on a bounded worker pool.

use crate::candidates::CandidatePool;
use crate::ground_truth::GroundTruth;
use crate::interchange::{read_document, write_document};
use crate::labeler::{LabelingReport, ZoneLabeler};
use crate::logging::{LabelingObserver, BATCH};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const GEOMETRY_SUFFIX: &str = ".geometry.json";
pub const GROUND_TRUTH_SUFFIX: &str = ".gt.json";
pub const LABELED_SUFFIX: &str = ".labeled.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelingJob {
    pub name: String,
    pub geometry: PathBuf,
    pub ground_truth: PathBuf,
    pub output: PathBuf,
}

impl LabelingJob {
    pub fn new(name: impl Into<String>, geometry: PathBuf, ground_truth: PathBuf, output: PathBuf) -> Self {
        Self {
            name: name.into(),
            geometry,
            ground_truth,
            output,
        }
    }

    /// Job for `<dir>/<stem>.geometry.json` and its sibling files.
    pub fn for_stem(dir: &Path, stem: &str) -> Self {
        Self::new(
            stem,
            dir.join(format!("{stem}{GEOMETRY_SUFFIX}")),
            dir.join(format!("{stem}{GROUND_TRUTH_SUFFIX}")),
            dir.join(format!("{stem}{LABELED_SUFFIX}")),
        )
    }
}

/// Geometry files in `dir` that have a ground-truth sibling, sorted by name.
pub fn discover_jobs(dir: &Path) -> Result<Vec<LabelingJob>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;

    let mut jobs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(stem) = file_name.strip_suffix(GEOMETRY_SUFFIX) else {
            continue;
        };
        let job = LabelingJob::for_stem(dir, stem);
        if !job.ground_truth.is_file() {
            warn!(
                target: BATCH,
                geometry = %job.geometry.display(),
                "No ground truth next to geometry file, skipping"
            );
            continue;
        }
        jobs.push(job);
    }
    jobs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(jobs)
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Labeled(LabelingReport),
    /// Output already existed.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    pub job: LabelingJob,
    pub outcome: JobOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub results: Vec<JobResult>,
}

impl BatchSummary {
    pub fn reports(&self) -> impl Iterator<Item = &LabelingReport> {
        self.results.iter().filter_map(|result| match &result.outcome {
            JobOutcome::Labeled(report) => Some(report),
            _ => None,
        })
    }

    pub fn labeled(&self) -> usize {
        self.reports().count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome == JobOutcome::Skipped)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, JobOutcome::Failed(_)))
            .count()
    }

    /// Per-document summary lines followed by a total.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.reports().map(LabelingReport::summary_line).collect();
        let labeled = self.labeled();
        let mean_coverage = if labeled == 0 {
            0.0
        } else {
            self.reports().map(LabelingReport::coverage).sum::<f64>() / labeled as f64
        };
        lines.push(format!(
            "total: {} labeled, {} skipped, {} failed, mean coverage {:.2}%",
            labeled,
            self.skipped(),
            self.failed(),
            mean_coverage
        ));
        lines
    }
}

/// Reads, labels and writes one document. Nothing is written on failure.
pub fn run_job(
    labeler: &ZoneLabeler,
    job: &LabelingJob,
    observer: &dyn LabelingObserver,
) -> Result<LabelingReport> {
    let mut doc = read_document(&job.geometry)
        .with_context(|| format!("Failed to read geometry {}", job.geometry.display()))?;
    doc.set_name(job.name.clone());

    let ground_truth = GroundTruth::from_path(&job.ground_truth)
        .with_context(|| format!("Failed to read ground truth {}", job.ground_truth.display()))?;
    let pool = CandidatePool::from_ground_truth(&ground_truth, labeler.config(), observer);

    let report = labeler
        .label_document(&mut doc, &pool, observer)
        .with_context(|| format!("Failed to label {}", job.name))?;

    write_document(&doc, &job.output)
        .with_context(|| format!("Failed to write {}", job.output.display()))?;
    Ok(report)
}

/// Runs every job on a pool sized by the labeler's parallel policy. A failing
/// job is recorded and the others carry on.
pub fn run_batch(
    jobs: &[LabelingJob],
    labeler: &ZoneLabeler,
    observer: &dyn LabelingObserver,
) -> Result<BatchSummary> {
    let pool = labeler
        .config()
        .parallel
        .build_pool()
        .context("Failed to build worker pool")?;

    info!(
        target: BATCH,
        jobs = jobs.len(),
        threads = pool.current_num_threads(),
        "Starting batch"
    );

    let results: Vec<JobResult> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let outcome = if job.output.exists() {
                    info!(target: BATCH, job = %job.name, "Output exists, skipping");
                    JobOutcome::Skipped
                } else {
                    match run_job(labeler, job, observer) {
                        Ok(report) => JobOutcome::Labeled(report),
                        Err(err) => {
                            let message = format!("{err:#}");
                            error!(target: BATCH, job = %job.name, error = %message, "Job failed");
                            JobOutcome::Failed(message)
                        }
                    }
                };
                JobResult {
                    job: job.clone(),
                    outcome,
                }
            })
            .collect()
    });

    let summary = BatchSummary { results };
    info!(
        target: BATCH,
        labeled = summary.labeled(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "Batch finished"
    );
    Ok(summary)
}
