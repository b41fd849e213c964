//! Per-document labeling run: score, decide, propagate.

use crate::candidates::CandidatePool;
use crate::config::LabelingConfig;
use crate::decision::{Decision, DecisionPolicy, DecisionTier};
use crate::error::Result;
use crate::label::{LabelCategory, ZoneLabel};
use crate::logging::{LabelingObserver, ZONE_DECISION};
use crate::model::Document;
use crate::neighbors::NeighborTable;
use crate::propagation::PropagationEngine;
use crate::scoring::{TokenizedPool, ZoneScorer};
use crate::tree;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

const KEY_METADATA_LABELS: [ZoneLabel; 4] = [
    ZoneLabel::MetAffiliation,
    ZoneLabel::MetAuthor,
    ZoneLabel::MetBibInfo,
    ZoneLabel::MetTitle,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelingReport {
    pub document: String,
    pub zones: usize,
    pub labeled: usize,
    /// Distinct metadata labels (including `GenMetadata`) present.
    pub metadata_labeled: usize,
    pub propagated: usize,
    pub unmatched: usize,
    pub tiers: BTreeMap<DecisionTier, usize>,
    pub assigned: BTreeSet<ZoneLabel>,
}

impl LabelingReport {
    /// Percentage of zones carrying a label.
    pub fn coverage(&self) -> f64 {
        if self.zones == 0 {
            return 0.0;
        }
        self.labeled as f64 * 100.0 / self.zones as f64
    }

    /// Truncated integer coverage, as printed in summary lines.
    pub fn coverage_percent(&self) -> usize {
        if self.zones == 0 {
            return 0;
        }
        self.labeled * 100 / self.zones
    }

    /// One point for references plus one per key metadata label present.
    pub fn key_label_score(&self) -> usize {
        let references = usize::from(self.assigned.contains(&ZoneLabel::References));
        references
            + KEY_METADATA_LABELS
                .iter()
                .filter(|label| self.assigned.contains(*label))
                .count()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.document,
            self.coverage_percent(),
            self.metadata_labeled,
            self.key_label_score()
        )
    }
}

pub struct ZoneLabeler {
    config: LabelingConfig,
    scorer: ZoneScorer,
    policy: DecisionPolicy,
}

impl ZoneLabeler {
    pub fn new(config: LabelingConfig) -> Self {
        let scorer = ZoneScorer::from_config(&config);
        Self::with_scorer(config, scorer)
    }

    pub fn with_scorer(config: LabelingConfig, scorer: ZoneScorer) -> Self {
        let policy = DecisionPolicy::new(config.decision.clone());
        Self {
            config,
            scorer,
            policy,
        }
    }

    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    /// Relabels every zone of `doc`. A malformed tree is rejected before any
    /// label changes.
    pub fn label_document(
        &self,
        doc: &mut Document,
        pool: &CandidatePool,
        observer: &dyn LabelingObserver,
    ) -> Result<LabelingReport> {
        tree::validate(doc)?;

        let tokenized = TokenizedPool::new(pool);
        let engine = PropagationEngine::new(observer);
        let mut report = LabelingReport {
            document: doc.name().unwrap_or_default().to_string(),
            ..LabelingReport::default()
        };

        for page in doc.pages().to_vec() {
            let mut labels: Vec<Option<ZoneLabel>> = {
                let scores = self.scorer.score_page(doc, page, &tokenized);
                scores
                    .iter()
                    .map(|zone_scores| {
                        let decision = self.policy.decide(zone_scores);
                        match decision {
                            Decision::Accepted { tier, label } => {
                                observer.tier_accepted(zone_scores.zone, tier, label);
                                *report.tiers.entry(tier).or_insert(0) += 1;
                            }
                            Decision::Unmatched => observer.zone_unmatched(zone_scores.zone),
                        }
                        decision.label()
                    })
                    .collect()
            };

            let neighbors = NeighborTable::for_page(doc, page, self.config.geometry_tolerance);
            let propagation = engine.run(page, &mut labels, &neighbors);
            report.propagated += propagation.labeled;

            let zones = doc.page(page).zones().to_vec();
            for (zone, label) in zones.into_iter().zip(labels) {
                doc.set_label(zone, label);
            }
        }

        for zone in doc.zones() {
            report.zones += 1;
            if let Some(label) = doc.label(zone) {
                report.labeled += 1;
                report.assigned.insert(label);
            }
        }
        report.metadata_labeled = report
            .assigned
            .iter()
            .filter(|label| label.is_of_category_or_general(LabelCategory::Metadata))
            .count();
        report.unmatched = report.zones - report.labeled;

        info!(
            target: ZONE_DECISION,
            document_id = %doc.id,
            document = %report.document,
            zones = report.zones,
            labeled = report.labeled,
            propagated = report.propagated,
            "Labeled document"
        );
        Ok(report)
    }
}
