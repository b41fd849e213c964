//! Token-sequence similarity measures used by the zone scorer.

use std::collections::HashMap;

/// Similarity between two token sequences. Scores are non-negative and
/// higher means more alike.
pub trait TokenSimilarity: Send + Sync {
    fn score(&self, a: &[String], b: &[String]) -> f64;
}

/// Local alignment over tokens: +1 per match, with penalties for mismatches
/// and gaps. The score is the best cell of the alignment matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmithWaterman {
    pub gap_penalty: f64,
    pub mismatch_penalty: f64,
}

impl Default for SmithWaterman {
    fn default() -> Self {
        Self {
            gap_penalty: 0.1,
            mismatch_penalty: 0.1,
        }
    }
}

impl SmithWaterman {
    pub fn new(gap_penalty: f64, mismatch_penalty: f64) -> Self {
        Self {
            gap_penalty,
            mismatch_penalty,
        }
    }
}

impl TokenSimilarity for SmithWaterman {
    fn score(&self, a: &[String], b: &[String]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let mut prev = vec![0.0f64; b.len() + 1];
        let mut curr = vec![0.0f64; b.len() + 1];
        let mut best = 0.0f64;

        for token_a in a {
            curr[0] = 0.0;
            for (j, token_b) in b.iter().enumerate() {
                let diagonal = if token_a == token_b {
                    prev[j] + 1.0
                } else {
                    prev[j] - self.mismatch_penalty
                };
                let up = prev[j + 1] - self.gap_penalty;
                let left = curr[j] - self.gap_penalty;
                let cell = diagonal.max(up).max(left).max(0.0);
                curr[j + 1] = cell;
                best = best.max(cell);
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        best
    }
}

/// Cosine of the term-frequency vectors. Ignores token order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineOverlap;

fn term_frequencies(tokens: &[String]) -> HashMap<&str, f64> {
    let mut freq = HashMap::new();
    for token in tokens {
        *freq.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    freq
}

impl TokenSimilarity for CosineOverlap {
    fn score(&self, a: &[String], b: &[String]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let fa = term_frequencies(a);
        let fb = term_frequencies(b);

        let dot: f64 = fa
            .iter()
            .filter_map(|(token, x)| fb.get(token).map(|y| x * y))
            .sum();
        let norm_a = fa.values().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = fb.values().map(|y| y * y).sum::<f64>().sqrt();

        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}
