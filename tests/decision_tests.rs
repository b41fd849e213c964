use zone_labeler::config::DecisionThresholds;
use zone_labeler::decision::{Decision, DecisionPolicy, DecisionTier};
use zone_labeler::model::ZoneId;
use zone_labeler::scoring::{ScoredCandidate, ZoneScores};
use zone_labeler::ZoneLabel;

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

struct Fixture {
    entries: Vec<(ZoneLabel, Vec<String>, f64)>,
}

impl Fixture {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    fn entry(mut self, label: ZoneLabel, text: &str, score: f64) -> Self {
        self.entries.push((label, tokens(text), score));
        self
    }

    fn decide(&self, zone_text: &str) -> Decision {
        let candidates: Vec<ScoredCandidate<'_>> = self
            .entries
            .iter()
            .map(|(label, entry_tokens, score)| ScoredCandidate {
                label: *label,
                entry_tokens,
                score: *score,
            })
            .collect();
        let scores = ZoneScores {
            zone: ZoneId(0),
            tokens: tokens(zone_text),
            alignment: candidates.clone(),
            overlap: candidates,
        };
        DecisionPolicy::new(DecisionThresholds::default()).decide(&scores)
    }
}

fn accepted(tier: DecisionTier, label: ZoneLabel) -> Decision {
    Decision::Accepted { tier, label }
}

#[test]
fn test_exact_match_accepted_by_first_tier() {
    let decision = Fixture::new()
        .entry(ZoneLabel::MetTitle, "a study of zones", 4.0)
        .entry(ZoneLabel::BodyContent, "zones are everywhere in a study", 2.0)
        .decide("a study of zones");

    assert_eq!(
        decision,
        accepted(DecisionTier::LengthNormalizedAlignment, ZoneLabel::MetTitle)
    );
}

#[test]
fn test_short_zone_inside_long_entry_falls_to_second_tier() {
    let decision = Fixture::new()
        .entry(ZoneLabel::MetBibInfo, "journal of science 2020 volume 12 issue", 3.0)
        .decide("journal of science");

    assert_eq!(
        decision,
        accepted(DecisionTier::ZoneNormalizedAlignment, ZoneLabel::MetBibInfo)
    );
}

#[test]
fn test_slightly_longer_entry_still_accepted_by_first_tier() {
    let decision = Fixture::new()
        .entry(ZoneLabel::MetBibInfo, "journal of science 2020", 3.0)
        .decide("journal of science");

    assert_eq!(
        decision,
        accepted(DecisionTier::LengthNormalizedAlignment, ZoneLabel::MetBibInfo)
    );
}

#[test]
fn test_equal_normalized_scores_prefer_longer_entry() {
    let decision = Fixture::new()
        .entry(ZoneLabel::MetTitle, "a b", 2.0)
        .entry(ZoneLabel::MetAbstract, "a b c d", 4.0)
        .decide("a b c d");

    assert_eq!(
        decision,
        accepted(DecisionTier::LengthNormalizedAlignment, ZoneLabel::MetAbstract)
    );
}

#[test]
fn test_earlier_tier_wins_over_later_ones() {
    // Tier 3 would pick BodyContent (two entries of 0.3 each), tier 1 picks
    // the title first.
    let decision = Fixture::new()
        .entry(ZoneLabel::BodyContent, "x1 x2 x3 x4 x5 x6 x7 x8 x9 x10", 3.0)
        .entry(ZoneLabel::BodyContent, "y1 y2 y3 y4 y5 y6 y7 y8 y9 y10", 3.0)
        .entry(ZoneLabel::MetTitle, "t1 t2 t3 t4 t5 t6 t7 t8 t9 t10", 9.0)
        .decide("t1 t2 t3 t4 t5 t6 t7 t8 t9 t10");

    assert_eq!(
        decision,
        accepted(DecisionTier::LengthNormalizedAlignment, ZoneLabel::MetTitle)
    );
}

#[test]
fn test_cumulative_tier_sums_per_label() {
    let decision = Fixture::new()
        .entry(ZoneLabel::BodyContent, "x1 x2 x3 x4 x5 x6 x7 x8 x9 x10", 3.0)
        .entry(ZoneLabel::BodyContent, "y1 y2 y3 y4 y5 y6 y7 y8 y9 y10", 3.0)
        .entry(ZoneLabel::MetTitle, "t1 t2 t3 t4 t5 t6 t7 t8 t9 t10", 2.0)
        .decide("z1 z2 z3 z4 z5 z6 z7 z8 z9 z10");

    assert_eq!(
        decision,
        accepted(DecisionTier::CumulativeAlignment, ZoneLabel::BodyContent)
    );
}

#[test]
fn test_cumulative_tie_goes_to_lower_ordinal() {
    let decision = Fixture::new()
        .entry(ZoneLabel::BodyContent, "x1 x2 x3 x4 x5 x6 x7 x8 x9 x10", 3.0)
        .entry(ZoneLabel::BodyContent, "y1 y2 y3 y4 y5 y6 y7 y8 y9 y10", 3.0)
        .entry(ZoneLabel::MetAbstract, "a1 a2 a3 a4 a5 a6 a7 a8 a9 a10", 3.0)
        .entry(ZoneLabel::MetAbstract, "b1 b2 b3 b4 b5 b6 b7 b8 b9 b10", 3.0)
        .decide("z1 z2 z3 z4 z5 z6 z7 z8 z9 z10");

    assert_eq!(
        decision,
        accepted(DecisionTier::CumulativeAlignment, ZoneLabel::MetAbstract)
    );
}

#[test]
fn test_exact_token_overlap_needs_more_than_one_token() {
    let decision = Fixture::new()
        .entry(ZoneLabel::MetKeywords, "genomics proteomics metabolomics", 0.0)
        .entry(ZoneLabel::MetTitle, "proteomics", 0.0)
        .decide("proteomics and genomics today");
    assert_eq!(
        decision,
        accepted(DecisionTier::ExactTokenOverlap, ZoneLabel::MetKeywords)
    );

    let decision = Fixture::new()
        .entry(ZoneLabel::MetTitle, "proteomics", 0.0)
        .decide("proteomics and genomics today");
    assert_eq!(decision, Decision::Unmatched);
}

#[test]
fn test_normalized_token_overlap_ignores_punctuation() {
    let decision = Fixture::new()
        .entry(ZoneLabel::MetAffiliation, "alpha beta,", 0.0)
        .decide("(alpha) beta,");

    assert_eq!(
        decision,
        accepted(DecisionTier::NormalizedTokenOverlap, ZoneLabel::MetAffiliation)
    );
}

#[test]
fn test_punctuation_only_tokens_never_match() {
    let decision = Fixture::new()
        .entry(ZoneLabel::MetAffiliation, "– ( y", 0.0)
        .decide("«» ( x1");

    assert_eq!(decision, Decision::Unmatched);
}

#[test]
fn test_empty_pool_and_empty_zone_are_unmatched() {
    assert_eq!(Fixture::new().decide("anything at all"), Decision::Unmatched);

    let decision = Fixture::new()
        .entry(ZoneLabel::MetTitle, "a title", 0.0)
        .decide("");
    assert_eq!(decision, Decision::Unmatched);
    assert_eq!(decision.label(), None);
    assert_eq!(decision.tier(), None);
}
