mod common;

use common::{row, DocumentBuilder};
use pretty_assertions::assert_eq;
use zone_labeler::enhance::{enhance, extract_abstract, extract_journal_volume_issue, EnhancedMetadata, JournalVolumeIssue};
use zone_labeler::ZoneLabel;

#[test]
fn test_abstract_prefix_and_keywords_are_dropped() {
    let doc = DocumentBuilder::new("abstract")
        .labeled_zone(
            row(0),
            "Abstract: We present a method\nfor labeling zones.\nKeywords: zones, labels",
            ZoneLabel::MetAbstract,
        )
        .build();

    assert_eq!(
        extract_abstract(&doc).as_deref(),
        Some("We present a method\nfor labeling zones.")
    );
}

#[test]
fn test_abstract_joins_first_page_zones_only() {
    let doc = DocumentBuilder::new("pages")
        .labeled_zone(row(0), "ABSTRACT First part.", ZoneLabel::MetAbstract)
        .labeled_zone(row(1), "Body text.", ZoneLabel::BodyContent)
        .labeled_zone(row(2), "Second part.", ZoneLabel::MetAbstract)
        .page()
        .labeled_zone(row(0), "Not on the first page.", ZoneLabel::MetAbstract)
        .build();

    assert_eq!(
        extract_abstract(&doc).as_deref(),
        Some("First part.\nSecond part.")
    );
}

#[test]
fn test_missing_abstract() {
    let doc = DocumentBuilder::new("none")
        .labeled_zone(row(0), "Body text.", ZoneLabel::BodyContent)
        .labeled_zone(row(1), "Keywords: nothing before", ZoneLabel::MetAbstract)
        .build();
    assert_eq!(extract_abstract(&doc), None);
}

#[test]
fn test_journal_volume_issue() {
    let doc = DocumentBuilder::new("bib")
        .labeled_zone(row(0), "Received 5 March 2020", ZoneLabel::MetDates)
        .labeled_zone(
            row(1),
            "Open access\nJournal of Document Engineering, vol. 12, no. 3, pp. 101-110",
            ZoneLabel::MetBibInfo,
        )
        .build();

    assert_eq!(
        extract_journal_volume_issue(&doc),
        Some(JournalVolumeIssue {
            journal: "Journal of Document Engineering".to_string(),
            volume: "12".to_string(),
            issue: "3".to_string(),
        })
    );
}

#[test]
fn test_issue_followed_by_range_is_rejected() {
    let doc = DocumentBuilder::new("range")
        .labeled_zone(row(0), "Genome Biology volume 7 issue 45-50", ZoneLabel::MetBibInfo)
        .build();
    assert_eq!(extract_journal_volume_issue(&doc), None);
}

#[test]
fn test_enhance_collects_everything() {
    let doc = DocumentBuilder::new("all")
        .labeled_zone(row(0), "Genome Biology Volume 7 Issue 4", ZoneLabel::MetBibInfo)
        .labeled_zone(row(1), "Abstract. Short.", ZoneLabel::MetAbstract)
        .build();

    let metadata = enhance(&doc);
    assert_eq!(
        metadata,
        EnhancedMetadata {
            abstract_text: Some("Short.".to_string()),
            journal: Some("Genome Biology".to_string()),
            volume: Some("7".to_string()),
            issue: Some("4".to_string()),
        }
    );

    let json = serde_json::to_value(&metadata).unwrap();
    assert_eq!(json["abstract"], "Short.");
    assert_eq!(json["issue"], "4");
}
