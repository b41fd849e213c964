//! Tiered choice of a zone's label from its candidate scores.

use crate::config::DecisionThresholds;
use crate::label::ZoneLabel;
use crate::scoring::{ScoredCandidate, ZoneScores};
use crate::text::strip_punctuation;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Tiers in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DecisionTier {
    LengthNormalizedAlignment,
    ZoneNormalizedAlignment,
    CumulativeAlignment,
    ExactTokenOverlap,
    NormalizedTokenOverlap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Accepted { tier: DecisionTier, label: ZoneLabel },
    Unmatched,
}

impl Decision {
    pub fn label(&self) -> Option<ZoneLabel> {
        match self {
            Decision::Accepted { label, .. } => Some(*label),
            Decision::Unmatched => None,
        }
    }

    pub fn tier(&self) -> Option<DecisionTier> {
        match self {
            Decision::Accepted { tier, .. } => Some(*tier),
            Decision::Unmatched => None,
        }
    }
}

// Tolerance comparators are not total orders, which `slice::sort_by` may
// reject. Merge sort only ever asks "does the right one go first".
fn stable_sort_by<T: Copy>(items: &mut [T], cmp: &impl Fn(&T, &T) -> Ordering) {
    let len = items.len();
    if len <= 1 {
        return;
    }
    let mid = len / 2;
    stable_sort_by(&mut items[..mid], cmp);
    stable_sort_by(&mut items[mid..], cmp);

    let mut merged = Vec::with_capacity(len);
    let (mut i, mut j) = (0, mid);
    while i < mid && j < len {
        if cmp(&items[j], &items[i]) == Ordering::Less {
            merged.push(items[j]);
            j += 1;
        } else {
            merged.push(items[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&items[i..mid]);
    merged.extend_from_slice(&items[j..]);
    items.copy_from_slice(&merged);
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// Descending by `key`; keys within `epsilon` prefer the longer entry.
fn descending_with_ties(
    key: impl Fn(&ScoredCandidate<'_>) -> f64,
    epsilon: f64,
) -> impl Fn(&ScoredCandidate<'_>, &ScoredCandidate<'_>) -> Ordering {
    move |a, b| {
        let diff = key(a) - key(b);
        if diff.abs() < epsilon {
            b.entry_tokens.len().cmp(&a.entry_tokens.len())
        } else if diff > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

fn normalized_score(candidate: &ScoredCandidate<'_>) -> f64 {
    ratio(candidate.score, candidate.entry_tokens.len())
}

#[derive(Debug, Clone, Default)]
pub struct DecisionPolicy {
    thresholds: DecisionThresholds,
}

impl DecisionPolicy {
    pub fn new(thresholds: DecisionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    pub fn decide(&self, scores: &ZoneScores<'_>) -> Decision {
        let zone_len = scores.tokens.len();

        let mut by_normalized = scores.alignment.clone();
        stable_sort_by(
            &mut by_normalized,
            &descending_with_ties(normalized_score, self.thresholds.fine_tie_epsilon),
        );
        if let Some(label) = self.length_normalized(zone_len, &by_normalized) {
            return Decision::Accepted {
                tier: DecisionTier::LengthNormalizedAlignment,
                label,
            };
        }

        let mut by_raw = scores.alignment.clone();
        stable_sort_by(
            &mut by_raw,
            &descending_with_ties(|c| c.score, self.thresholds.coarse_tie_epsilon),
        );
        if let Some(label) = self.zone_normalized(zone_len, &by_raw) {
            return Decision::Accepted {
                tier: DecisionTier::ZoneNormalizedAlignment,
                label,
            };
        }

        if let Some(label) = self.cumulative(zone_len, &scores.alignment) {
            return Decision::Accepted {
                tier: DecisionTier::CumulativeAlignment,
                label,
            };
        }

        if let Some(label) = self.best_overlap(&by_normalized, |candidate| {
            scores
                .tokens
                .iter()
                .filter(|token| candidate.entry_tokens.contains(token))
                .count()
        }) {
            return Decision::Accepted {
                tier: DecisionTier::ExactTokenOverlap,
                label,
            };
        }

        let zone_stripped: Vec<String> = scores.tokens.iter().map(|t| strip_punctuation(t)).collect();
        if let Some(label) = self.best_overlap(&by_normalized, |candidate| {
            let entry_stripped: Vec<String> = candidate
                .entry_tokens
                .iter()
                .map(|t| strip_punctuation(t))
                .collect();
            zone_stripped
                .iter()
                .filter(|token| !token.is_empty() && entry_stripped.contains(token))
                .count()
        }) {
            return Decision::Accepted {
                tier: DecisionTier::NormalizedTokenOverlap,
                label,
            };
        }

        Decision::Unmatched
    }

    fn length_normalized(&self, zone_len: usize, sorted: &[ScoredCandidate<'_>]) -> Option<ZoneLabel> {
        let best = sorted.first()?;
        let entry_len = best.entry_tokens.len();
        let longer = zone_len.max(entry_len);
        let shorter = zone_len.min(entry_len);
        let accepted = longer > 0
            && ratio(shorter as f64, longer) > self.thresholds.length_ratio
            && normalized_score(best) > self.thresholds.length_normalized_score;
        accepted.then_some(best.label)
    }

    fn zone_normalized(&self, zone_len: usize, sorted: &[ScoredCandidate<'_>]) -> Option<ZoneLabel> {
        let best = sorted.first()?;
        let accepted =
            zone_len > 0 && ratio(best.score, zone_len) > self.thresholds.zone_normalized_score;
        accepted.then_some(best.label)
    }

    fn cumulative(&self, zone_len: usize, candidates: &[ScoredCandidate<'_>]) -> Option<ZoneLabel> {
        let mut sums: BTreeMap<ZoneLabel, f64> = BTreeMap::new();
        for candidate in candidates {
            let share = ratio(candidate.score, zone_len.max(candidate.entry_tokens.len()));
            *sums.entry(candidate.label).or_insert(0.0) += share;
        }

        let max = sums.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let (label, sum) = sums
            .into_iter()
            .find(|(_, sum)| *sum >= max - self.thresholds.coarse_tie_epsilon)?;
        (sum >= self.thresholds.cumulative_score).then_some(label)
    }

    fn best_overlap(
        &self,
        sorted: &[ScoredCandidate<'_>],
        shared_tokens: impl Fn(&ScoredCandidate<'_>) -> usize,
    ) -> Option<ZoneLabel> {
        let mut best = None;
        let mut best_count = 0;
        for candidate in sorted {
            let count = shared_tokens(candidate);
            if count > best_count && count > self.thresholds.min_shared_tokens {
                best = Some(candidate.label);
                best_count = count;
            }
        }
        best
    }
}
