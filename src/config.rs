//! Tunable knobs of the labeling pipeline, loadable from JSON.

use crate::error::Result;
use crate::similarity::SmithWaterman;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Acceptance thresholds and tie tolerances of the decision tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Minimum min/max ratio between zone and entry token counts.
    #[serde(default = "DecisionThresholds::default_length_ratio")]
    pub length_ratio: f64,

    #[serde(default = "DecisionThresholds::default_length_normalized_score")]
    pub length_normalized_score: f64,

    #[serde(default = "DecisionThresholds::default_zone_normalized_score")]
    pub zone_normalized_score: f64,

    #[serde(default = "DecisionThresholds::default_cumulative_score")]
    pub cumulative_score: f64,

    /// Token-overlap tiers accept only counts strictly above this.
    #[serde(default = "DecisionThresholds::default_min_shared_tokens")]
    pub min_shared_tokens: usize,

    #[serde(default = "DecisionThresholds::default_fine_tie_epsilon")]
    pub fine_tie_epsilon: f64,

    #[serde(default = "DecisionThresholds::default_coarse_tie_epsilon")]
    pub coarse_tie_epsilon: f64,
}

impl DecisionThresholds {
    fn default_length_ratio() -> f64 {
        0.7
    }

    fn default_length_normalized_score() -> f64 {
        0.7
    }

    fn default_zone_normalized_score() -> f64 {
        0.5
    }

    fn default_cumulative_score() -> f64 {
        0.5
    }

    fn default_min_shared_tokens() -> usize {
        1
    }

    fn default_fine_tie_epsilon() -> f64 {
        1e-7
    }

    fn default_coarse_tie_epsilon() -> f64 {
        1e-4
    }
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            length_ratio: Self::default_length_ratio(),
            length_normalized_score: Self::default_length_normalized_score(),
            zone_normalized_score: Self::default_zone_normalized_score(),
            cumulative_score: Self::default_cumulative_score(),
            min_shared_tokens: Self::default_min_shared_tokens(),
            fine_tie_epsilon: Self::default_fine_tie_epsilon(),
            coarse_tie_epsilon: Self::default_coarse_tie_epsilon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmithWatermanConfig {
    #[serde(default = "SmithWatermanConfig::default_penalty")]
    pub gap_penalty: f64,
    #[serde(default = "SmithWatermanConfig::default_penalty")]
    pub mismatch_penalty: f64,
}

impl SmithWatermanConfig {
    fn default_penalty() -> f64 {
        0.1
    }

    pub fn scorer(&self) -> SmithWaterman {
        SmithWaterman::new(self.gap_penalty, self.mismatch_penalty)
    }
}

impl Default for SmithWatermanConfig {
    fn default() -> Self {
        Self {
            gap_penalty: Self::default_penalty(),
            mismatch_penalty: Self::default_penalty(),
        }
    }
}

/// Worker-pool sizing for batch runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of worker threads.
    /// If None, rayon picks its default (typically number of CPU cores).
    #[serde(default)]
    pub max_threads: Option<usize>,
}

impl ParallelPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Builds a dedicated pool sized by this policy.
    pub fn build_pool(&self) -> std::result::Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(num_threads) = self.max_threads {
            builder = builder.num_threads(num_threads);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelingConfig {
    /// Coordinates closer than this are treated as equal by geometric
    /// ordering and neighbor lookup.
    #[serde(default = "LabelingConfig::default_geometry_tolerance")]
    pub geometry_tolerance: f64,

    #[serde(default)]
    pub decision: DecisionThresholds,

    #[serde(default)]
    pub smith_waterman: SmithWatermanConfig,

    /// Zones whose raw text contains any of these score zero everywhere.
    #[serde(default = "LabelingConfig::default_boilerplate_markers")]
    pub boilerplate_markers: Vec<String>,

    /// Longest first-to-last page range expanded into page-number entries.
    #[serde(default = "LabelingConfig::default_max_page_span")]
    pub max_page_span: u64,

    #[serde(default)]
    pub parallel: ParallelPolicy,
}

impl LabelingConfig {
    fn default_geometry_tolerance() -> f64 {
        1.0
    }

    fn default_boilerplate_markers() -> Vec<String> {
        vec!["www.biomedcentral.com".to_string()]
    }

    fn default_max_page_span() -> u64 {
        2000
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.parallel = self.parallel.with_max_threads(max_threads);
        self
    }
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            geometry_tolerance: Self::default_geometry_tolerance(),
            decision: DecisionThresholds::default(),
            smith_waterman: SmithWatermanConfig::default(),
            boilerplate_markers: Self::default_boilerplate_markers(),
            max_page_span: Self::default_max_page_span(),
            parallel: ParallelPolicy::default(),
        }
    }
}
