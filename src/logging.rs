use std::path::Path;
use std::sync::Once;
use tracing::{debug, trace};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::decision::DecisionTier;
use crate::label::ZoneLabel;
use crate::model::{PageId, ZoneId};

// Define log targets as constants
pub const CANDIDATE_POOL: &str = "candidate_pool";
pub const ZONE_DECISION: &str = "zone_decision";
pub const ZONE_PROPAGATION: &str = "zone_propagation";
pub const BATCH: &str = "batch";
pub const TREE_OPS: &str = "tree_ops";

pub const LOG_FILE_NAME: &str = "pdf-labeling.log";

static INIT: Once = Once::new();

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Logs to stderr through a non-blocking writer, leaving stdout to command
/// output. Keep the returned guard alive for as long as events should be
/// flushed.
///
/// Only the first call of this or [`init_logging_with_dir`] installs a
/// subscriber. Later calls return a guard over a writer nothing logs to.
pub fn init_logging(verbose: bool) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    INIT.call_once(|| {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(writer)
            .with_filter(default_filter(verbose));

        if let Err(err) = tracing_subscriber::registry().with(stderr_layer).try_init() {
            debug!(error = %err, "Global subscriber already set, keeping it");
        }
    });

    guard
}

/// Whether a logging setup call has already run in this process.
pub fn logging_initialized() -> bool {
    INIT.is_completed()
}

/// Same as [`init_logging`] plus a file layer writing `pdf-labeling.log`
/// under `log_dir`. The directory is created even when a subscriber was
/// already installed, but the file then stays empty.
pub fn init_logging_with_dir(verbose: bool, log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, LOG_FILE_NAME);
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    INIT.call_once(|| {
        let file_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_appender)
            .with_filter(default_filter(verbose));

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(default_filter(verbose));

        if let Err(err) = tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
        {
            debug!(error = %err, "Global subscriber already set, keeping it");
        }
    });

    Ok(guard)
}

/// Trace points of a labeling run.
pub trait LabelingObserver: Send + Sync {
    fn candidate_built(&self, text: &str, label: ZoneLabel);

    fn tier_accepted(&self, zone: ZoneId, tier: DecisionTier, label: ZoneLabel);

    fn zone_unmatched(&self, zone: ZoneId);

    fn propagation_pass(&self, page: PageId, pass: usize, labeled: usize, remaining: usize);
}

/// Forwards every trace point to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LabelingObserver for TracingObserver {
    fn candidate_built(&self, text: &str, label: ZoneLabel) {
        trace!(target: CANDIDATE_POOL, %label, text, "Candidate entry");
    }

    fn tier_accepted(&self, zone: ZoneId, tier: DecisionTier, label: ZoneLabel) {
        debug!(target: ZONE_DECISION, zone = zone.0, ?tier, %label, "Zone labeled");
    }

    fn zone_unmatched(&self, zone: ZoneId) {
        debug!(target: ZONE_DECISION, zone = zone.0, "No tier accepted zone");
    }

    fn propagation_pass(&self, page: PageId, pass: usize, labeled: usize, remaining: usize) {
        debug!(
            target: ZONE_PROPAGATION,
            page = page.0,
            pass,
            labeled,
            remaining,
            "Propagation pass finished"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl LabelingObserver for NullObserver {
    fn candidate_built(&self, _text: &str, _label: ZoneLabel) {}

    fn tier_accepted(&self, _zone: ZoneId, _tier: DecisionTier, _label: ZoneLabel) {}

    fn zone_unmatched(&self, _zone: ZoneId) {}

    fn propagation_pass(&self, _page: PageId, _pass: usize, _labeled: usize, _remaining: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_repeated_setup_keeps_first_subscriber() {
        let _first = init_logging(false);
        assert!(logging_initialized());

        let _second = init_logging(true);
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs");
        let _third = init_logging_with_dir(false, &logs).unwrap();

        assert!(logs.is_dir());
        assert!(logging_initialized());
    }
}
