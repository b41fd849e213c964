pub mod batch;
pub mod candidates;
pub mod config;
pub mod decision;
pub mod enhance;
pub mod error;
pub mod export;
pub mod geo;
pub mod ground_truth;
pub mod interchange;
pub mod label;
pub mod labeler;
pub mod logging;
pub mod model;
pub mod neighbors;
pub mod propagation;
pub mod scoring;
pub mod similarity;
pub mod text;
pub mod tree;

pub use crate::candidates::CandidatePool;
pub use crate::config::LabelingConfig;
pub use crate::error::{LabelingError, Result, TreeError};
pub use crate::geo::Rect;
pub use crate::ground_truth::GroundTruth;
pub use crate::label::{LabelCategory, ZoneLabel};
pub use crate::labeler::{LabelingReport, ZoneLabeler};
pub use crate::model::Document;

use crate::logging::TracingObserver;

/// Label every zone of a document against its ground truth
///
/// # Arguments
/// * `doc` - Geometric document tree; its zone labels are overwritten
/// * `ground_truth` - Metadata record of the same document
/// * `config` - Thresholds, scorers and tolerances
///
/// # Returns
/// * `Result<LabelingReport>` - Coverage statistics of the run
pub fn label_document(
    doc: &mut Document,
    ground_truth: &GroundTruth,
    config: &LabelingConfig,
) -> Result<LabelingReport> {
    let observer = TracingObserver;
    let pool = CandidatePool::from_ground_truth(ground_truth, config, &observer);
    let labeler = ZoneLabeler::new(config.clone());
    labeler.label_document(doc, &pool, &observer)
}
