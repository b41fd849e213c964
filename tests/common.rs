#![allow(dead_code)]

use zone_labeler::geo::Rect;
use zone_labeler::ground_truth::{Author, GroundTruth};
use zone_labeler::label::ZoneLabel;
use zone_labeler::model::{Document, PageId, ZoneId};

pub const PAGE: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 600.0,
    y1: 800.0,
};

/// Lays `text` out inside `bounds`: one line per `\n`, one single-chunk word
/// per whitespace-separated token.
pub fn add_text_zone(doc: &mut Document, page: PageId, bounds: Rect, text: &str) -> ZoneId {
    let zone = doc.add_zone(page, bounds);
    let lines: Vec<&str> = text.split('\n').collect();
    let line_height = bounds.height() / lines.len().max(1) as f64;

    for (line_idx, line_text) in lines.iter().enumerate() {
        let y0 = bounds.y0 + line_idx as f64 * line_height;
        let line_bounds = Rect::new(bounds.x0, y0, bounds.x1, y0 + line_height);
        let line = doc.add_line(zone, line_bounds);

        let char_width = bounds.width() / line_text.chars().count().max(1) as f64;
        let mut x = bounds.x0;
        for word_text in line_text.split_whitespace() {
            let width = word_text.chars().count() as f64 * char_width;
            let word_bounds = Rect::new(x, y0, x + width, y0 + line_height);
            let word = doc.add_word(line, word_bounds);
            doc.add_chunk(word, word_bounds, word_text);
            x += width + char_width;
        }
    }
    zone
}

pub struct DocumentBuilder {
    doc: Document,
    page: Option<PageId>,
}

impl DocumentBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            doc: Document::with_name(name),
            page: None,
        }
    }

    pub fn page(mut self) -> Self {
        self.page = Some(self.doc.add_page(PAGE));
        self
    }

    fn current_page(&mut self) -> PageId {
        match self.page {
            Some(page) => page,
            None => {
                let page = self.doc.add_page(PAGE);
                self.page = Some(page);
                page
            }
        }
    }

    pub fn zone(mut self, bounds: Rect, text: &str) -> Self {
        let page = self.current_page();
        add_text_zone(&mut self.doc, page, bounds, text);
        self
    }

    pub fn labeled_zone(mut self, bounds: Rect, text: &str, label: ZoneLabel) -> Self {
        let page = self.current_page();
        let zone = add_text_zone(&mut self.doc, page, bounds, text);
        self.doc.set_label(zone, Some(label));
        self
    }

    pub fn build(self) -> Document {
        self.doc
    }
}

/// Full-width zone `index` rows down the page.
pub fn row(index: usize) -> Rect {
    let y0 = 20.0 + index as f64 * 60.0;
    Rect::new(20.0, y0, 580.0, y0 + 40.0)
}

/// Zones of the page in page order.
pub fn page_zones(doc: &Document, page_idx: usize) -> Vec<ZoneId> {
    doc.page(doc.pages()[page_idx]).zones().to_vec()
}

pub fn labels(doc: &Document) -> Vec<Option<ZoneLabel>> {
    doc.zones().map(|zone| doc.label(zone)).collect()
}

pub fn sample_ground_truth() -> GroundTruth {
    let author = |given: &str, surname: &str| Author {
        given_names: given.to_string(),
        surname: surname.to_string(),
        email: None,
    };
    GroundTruth {
        title: Some("Zone Labeling for Scholarly Articles".to_string()),
        abstract_text: Some(
            "We present a method that assigns semantic labels to page zones.".to_string(),
        ),
        journal_title: Some("Journal of Document Engineering".to_string()),
        volume: Some("12".to_string()),
        issue: Some("3".to_string()),
        first_page: Some("101".to_string()),
        last_page: Some("110".to_string()),
        authors: vec![author("Jane", "Smith"), author("John", "Doe")],
        affiliations: vec!["Department of Computer Science, University of Somewhere".to_string()],
        paragraphs: vec![
            "Scanned articles arrive as geometry only.".to_string(),
            "Each zone is compared with every metadata field.".to_string(),
        ],
        references: vec![
            "Smith J. Zones. 2001.".to_string(),
            "Doe J. Labels. 2003.".to_string(),
        ],
        ..GroundTruth::default()
    }
}

/// Unlabeled geometry matching [`sample_ground_truth`]: nine zones stacked on
/// the first page, a page number on the second. Zone 6 matches nothing.
pub fn sample_article(name: &str) -> Document {
    DocumentBuilder::new(name)
        .zone(row(0), "Journal of Document Engineering")
        .zone(row(1), "Zone Labeling for Scholarly Articles")
        .zone(row(2), "Jane Smith John Doe")
        .zone(row(3), "Department of Computer Science, University of Somewhere")
        .zone(
            row(4),
            "Abstract We present a method that assigns\nsemantic labels to page zones.",
        )
        .zone(row(5), "Scanned articles arrive as geometry only.")
        .zone(row(6), "zzz qqq")
        .zone(row(7), "Each zone is compared with every metadata field.")
        .zone(
            row(8),
            "References\nSmith J. Zones. 2001.\nDoe J. Labels. 2003.",
        )
        .page()
        .zone(row(0), "102")
        .build()
}

pub const SAMPLE_LABELS: [Option<ZoneLabel>; 10] = [
    Some(ZoneLabel::MetBibInfo),
    Some(ZoneLabel::MetTitle),
    Some(ZoneLabel::MetAuthor),
    Some(ZoneLabel::MetAffiliation),
    Some(ZoneLabel::MetAbstract),
    Some(ZoneLabel::BodyContent),
    Some(ZoneLabel::BodyContent),
    Some(ZoneLabel::BodyContent),
    Some(ZoneLabel::References),
    Some(ZoneLabel::OthPageNumber),
];
