//! Similarity of every zone of a page against every candidate entry.

use crate::candidates::CandidatePool;
use crate::config::LabelingConfig;
use crate::label::ZoneLabel;
use crate::model::{Document, PageId, ZoneId};
use crate::similarity::{CosineOverlap, TokenSimilarity};
use crate::text::normalized_tokens;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry {
    pub text: String,
    pub label: ZoneLabel,
    pub tokens: Vec<String>,
}

/// Candidate pool with entry tokens computed once per document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizedPool {
    entries: Vec<PoolEntry>,
}

impl TokenizedPool {
    pub fn new(pool: &CandidatePool) -> Self {
        let entries = pool
            .iter()
            .map(|(text, label)| PoolEntry {
                text: text.to_string(),
                label,
                tokens: normalized_tokens(text),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One candidate scored against one zone. Borrows the entry tokens from the
/// pool it was scored against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate<'p> {
    pub label: ZoneLabel,
    pub entry_tokens: &'p [String],
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneScores<'p> {
    pub zone: ZoneId,
    pub tokens: Vec<String>,
    /// Pool order.
    pub alignment: Vec<ScoredCandidate<'p>>,
    /// Pool order.
    pub overlap: Vec<ScoredCandidate<'p>>,
}

pub struct ZoneScorer {
    alignment: Arc<dyn TokenSimilarity>,
    overlap: Arc<dyn TokenSimilarity>,
    boilerplate_markers: Vec<String>,
}

impl ZoneScorer {
    pub fn new(
        alignment: Arc<dyn TokenSimilarity>,
        overlap: Arc<dyn TokenSimilarity>,
        boilerplate_markers: Vec<String>,
    ) -> Self {
        Self {
            alignment,
            overlap,
            boilerplate_markers,
        }
    }

    pub fn from_config(config: &LabelingConfig) -> Self {
        Self::new(
            Arc::new(config.smith_waterman.scorer()),
            Arc::new(CosineOverlap),
            config.boilerplate_markers.clone(),
        )
    }

    fn is_boilerplate(&self, raw_text: &str) -> bool {
        self.boilerplate_markers
            .iter()
            .any(|marker| !marker.is_empty() && raw_text.contains(marker.as_str()))
    }

    pub fn score_zone<'p>(&self, doc: &Document, zone: ZoneId, pool: &'p TokenizedPool) -> ZoneScores<'p> {
        let raw_text = doc.zone_text(zone);
        let tokens = normalized_tokens(&raw_text);
        let boilerplate = self.is_boilerplate(&raw_text);

        let mut alignment = Vec::with_capacity(pool.len());
        let mut overlap = Vec::with_capacity(pool.len());
        for entry in pool.entries() {
            let (sw, cos) = if boilerplate {
                (0.0, 0.0)
            } else {
                (
                    self.alignment.score(&entry.tokens, &tokens),
                    self.overlap.score(&entry.tokens, &tokens),
                )
            };
            alignment.push(ScoredCandidate {
                label: entry.label,
                entry_tokens: &entry.tokens,
                score: sw,
            });
            overlap.push(ScoredCandidate {
                label: entry.label,
                entry_tokens: &entry.tokens,
                score: cos,
            });
        }

        ZoneScores {
            zone,
            tokens,
            alignment,
            overlap,
        }
    }

    /// Scores in page order.
    pub fn score_page<'p>(&self, doc: &Document, page: PageId, pool: &'p TokenizedPool) -> Vec<ZoneScores<'p>> {
        doc.page(page)
            .zones()
            .iter()
            .map(|zone| self.score_zone(doc, *zone, pool))
            .collect()
    }
}
