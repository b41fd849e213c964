//! Metadata read back out of labeled zones.

use crate::label::ZoneLabel;
use crate::model::{Document, ZoneId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ABSTRACT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Abstract[-:.]?").expect("valid abstract prefix regex"));

static JOURNAL_VOLUME_ISSUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^([A-Z][^0-9]*)[,;: \d]* (volume|vol|v)[.,;: ]+(\d{1,3})[.,;: ]*",
        r"(issue|num|no|number|n)[.,;: ]+(\d{1,3})",
        r"(?:[^\d\-\x{00AD}\x{2010}-\x{2015}\x{207B}\x{208B}\x{2212}]|$)",
    ))
    .expect("valid journal/volume/issue regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JournalVolumeIssue {
    pub journal: String,
    pub volume: String,
    pub issue: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnhancedMetadata {
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
}

fn zones_labeled(doc: &Document, label: ZoneLabel, first_page_only: bool) -> Vec<ZoneId> {
    let pages = if first_page_only {
        &doc.pages()[..doc.pages().len().min(1)]
    } else {
        doc.pages()
    };
    pages
        .iter()
        .flat_map(|page| doc.page(*page).zones().iter().copied())
        .filter(|zone| doc.label(*zone) == Some(label))
        .collect()
}

/// Abstract text from the first page, stopping at the keywords line.
pub fn extract_abstract(doc: &Document) -> Option<String> {
    let mut collected = String::new();
    for zone in zones_labeled(doc, ZoneLabel::MetAbstract, true) {
        for line in doc.zone_text(zone).split('\n') {
            let lower = line.to_lowercase();
            if lower.starts_with("keywords") || lower.starts_with("key words") {
                break;
            }
            collected.push('\n');
            collected.push_str(line);
        }
    }

    let text = collected.trim();
    if text.is_empty() {
        return None;
    }
    let text = match ABSTRACT_PREFIX.find(text) {
        Some(prefix) => text[prefix.end()..].trim(),
        None => text,
    };
    Some(text.to_string())
}

/// First bibliographic line of the form "Journal Name, vol. 12, no. 3".
pub fn extract_journal_volume_issue(doc: &Document) -> Option<JournalVolumeIssue> {
    zones_labeled(doc, ZoneLabel::MetBibInfo, false)
        .into_iter()
        .flat_map(|zone| {
            doc.zone_text(zone)
                .split('\n')
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .find_map(|line| {
            let caps = JOURNAL_VOLUME_ISSUE.captures(&line)?;
            let journal = caps[1].trim().replace("Published as: ", "");
            let journal = journal.strip_suffix(',').unwrap_or(&journal).to_string();
            Some(JournalVolumeIssue {
                journal,
                volume: caps[3].to_string(),
                issue: caps[5].to_string(),
            })
        })
}

pub fn enhance(doc: &Document) -> EnhancedMetadata {
    let jvi = extract_journal_volume_issue(doc);
    EnhancedMetadata {
        abstract_text: extract_abstract(doc),
        journal: jvi.as_ref().map(|j| j.journal.clone()),
        volume: jvi.as_ref().map(|j| j.volume.clone()),
        issue: jvi.map(|j| j.issue),
    }
}
