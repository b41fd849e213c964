use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_SIGNIFICANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-zA-Z,;.!?]").expect("valid punctuation pattern"));

/// Expands typographic ligatures (ﬁ, ﬂ, ﬀ, ...) through NFKC.
pub fn clean_ligatures(s: &str) -> String {
    s.nfkc().collect()
}

/// Collapses letter-spaced lines such as "A b s t r a c t".
pub fn remove_orphan_spaces(s: &str) -> String {
    s.split('\n')
        .map(collapse_spaced_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_spaced_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() < 5 {
        return line.to_string();
    }
    let spaced = chars.iter().skip(1).step_by(2).all(|c| *c == ' ');
    if !spaced {
        return line.to_string();
    }
    chars.iter().step_by(2).collect()
}

pub fn tokenize(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

/// Token sequence used for both zone text and candidate entries.
pub fn normalized_tokens(s: &str) -> Vec<String> {
    let lowered = s.to_lowercase();
    tokenize(&remove_orphan_spaces(&clean_ligatures(&lowered)))
}

pub fn strip_punctuation(token: &str) -> String {
    NON_SIGNIFICANT.replace_all(token, "").into_owned()
}
