//! Text → label pairs derived from a ground-truth record.

use crate::config::LabelingConfig;
use crate::error::LabelingError;
use crate::ground_truth::GroundTruth;
use crate::label::ZoneLabel;
use crate::logging::{LabelingObserver, CANDIDATE_POOL};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

/// Insertion-ordered candidate entries. The first label registered for a
/// text wins unless overridden explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePool {
    entries: IndexMap<String, ZoneLabel>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, text: &str) -> Option<ZoneLabel> {
        self.entries.get(text).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ZoneLabel)> {
        self.entries.iter().map(|(text, label)| (text.as_str(), *label))
    }

    /// Ignores blank text and texts already present. Returns whether the
    /// entry was added.
    pub fn put_if_present(&mut self, text: &str, label: ZoneLabel) -> bool {
        if text.trim().is_empty() || self.entries.contains_key(text) {
            return false;
        }
        self.entries.insert(text.to_string(), label);
        true
    }

    /// Joins the non-empty parts with single spaces and registers the result.
    pub fn put_joined<I, S>(&mut self, parts: I, label: ZoneLabel) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = parts
            .into_iter()
            .filter(|part| !part.as_ref().is_empty())
            .map(|part| part.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.put_if_present(&joined, label)
    }

    pub fn put_override(&mut self, text: &str, label: ZoneLabel) {
        self.entries.insert(text.to_string(), label);
    }

    fn put_optional(&mut self, text: Option<&String>, label: ZoneLabel) -> bool {
        text.map_or(false, |text| self.put_if_present(text, label))
    }

    pub fn from_ground_truth(
        gt: &GroundTruth,
        config: &LabelingConfig,
        observer: &dyn LabelingObserver,
    ) -> Self {
        let mut pool = Self::new();

        if let Some(abstract_text) = &gt.abstract_text {
            pool.put_if_present(&format!("Abstract {abstract_text}"), ZoneLabel::MetAbstract);
        }
        pool.put_if_present("Abstract", ZoneLabel::MetAbstract);

        pool.put_optional(gt.title.as_ref(), ZoneLabel::MetTitle);
        pool.put_optional(gt.subtitle.as_ref(), ZoneLabel::MetTitle);

        for field in [&gt.journal_title, &gt.publisher, &gt.publisher_id, &gt.issn] {
            pool.put_optional(field.as_ref(), ZoneLabel::MetBibInfo);
        }

        pool.put_optional(gt.permissions.as_ref(), ZoneLabel::MetCopyright);
        pool.put_optional(gt.license.as_ref(), ZoneLabel::MetCopyright);

        pool.put_joined(&gt.article_types, ZoneLabel::MetType);

        let dates = gt
            .received
            .iter()
            .chain(gt.accepted.iter())
            .chain(gt.publication_dates.iter());
        for parts in dates {
            for date in parts.produce_dates() {
                pool.put_if_present(&date, ZoneLabel::MetDates);
            }
        }

        pool.put_optional(gt.access_uri.as_ref(), ZoneLabel::MetAccessData);
        pool.put_joined(&gt.keywords, ZoneLabel::MetKeywords);

        if let Some(doi) = &gt.doi {
            pool.put_if_present(&format!("DOI {doi}"), ZoneLabel::MetBibInfo);
        }
        if let Some(volume) = &gt.volume {
            pool.put_if_present(&format!("volume {volume}"), ZoneLabel::MetBibInfo);
            pool.put_if_present(&format!("vol {volume}"), ZoneLabel::MetBibInfo);
        }
        if let Some(issue) = &gt.issue {
            pool.put_if_present(&format!("number {issue}"), ZoneLabel::MetBibInfo);
        }
        pool.put_if_present("journal", ZoneLabel::MetBibInfo);
        pool.put_if_present("et al", ZoneLabel::MetBibInfo);

        if let (Some(first), Some(last)) = (&gt.first_page, &gt.last_page) {
            pool.put_page_range(first, last, config.max_page_span);
        }
        pool.put_if_present("page of", ZoneLabel::OthPageNumber);

        pool.put_joined(&gt.editors, ZoneLabel::MetEditor);

        let author_names: Vec<String> = gt
            .authors
            .iter()
            .map(|author| author.display_name().trim().to_string())
            .collect();
        pool.put_joined(&author_names, ZoneLabel::MetAuthor);

        pool.put_joined(&gt.affiliations, ZoneLabel::MetAffiliation);

        let correspondence = gt
            .authors
            .iter()
            .filter_map(|author| author.email.as_deref())
            .chain(gt.correspondence.iter().map(String::as_str));
        pool.put_joined(correspondence, ZoneLabel::MetCorrespondence);
        pool.put_optional(gt.author_notes.as_ref(), ZoneLabel::MetCorrespondence);

        for section in [
            &gt.paragraphs,
            &gt.appendix_paragraphs,
            &gt.section_titles,
            &gt.appendix_titles,
        ] {
            pool.put_joined(section, ZoneLabel::BodyContent);
        }

        pool.put_joined(&gt.figures, ZoneLabel::BodyFigure);

        for table in &gt.tables {
            pool.put_optional(table.caption.as_ref(), ZoneLabel::BodyTable);
            pool.put_optional(table.body.as_ref(), ZoneLabel::BodyTable);
            pool.put_joined(&table.footnotes, ZoneLabel::BodyTable);
        }

        pool.put_optional(gt.financial_disclosure.as_ref(), ZoneLabel::BodyAcknowledgment);
        pool.put_optional(gt.conflict.as_ref(), ZoneLabel::BodyConflictStmt);
        pool.put_optional(gt.copyright.as_ref(), ZoneLabel::MetCopyright);
        pool.put_optional(gt.acknowledgment.as_ref(), ZoneLabel::BodyAcknowledgment);
        pool.put_optional(gt.back_notes.as_ref(), ZoneLabel::BodyConflictStmt);
        pool.put_optional(gt.glossary.as_ref(), ZoneLabel::BodyGlossary);

        for equation in &gt.equations {
            pool.put_optional(equation.label.as_ref(), ZoneLabel::BodyEquation);
            pool.put_optional(equation.body.as_ref(), ZoneLabel::BodyEquation);
        }

        pool.put_joined(&gt.references, ZoneLabel::References);
        pool.put_override("references", ZoneLabel::References);

        let bib_tokens = pool.bib_info_tokens();
        pool.put_override(&bib_tokens, ZoneLabel::MetBibInfo);

        for (text, label) in pool.iter() {
            observer.candidate_built(text, label);
        }
        debug!(target: CANDIDATE_POOL, entries = pool.len(), "Built candidate pool");

        pool
    }

    fn put_page_range(&mut self, first: &str, last: &str, max_span: u64) {
        self.put_if_present(&format!("pages {first} {last}"), ZoneLabel::MetBibInfo);
        self.put_if_present(&format!("pp {first} {last}"), ZoneLabel::MetBibInfo);
        self.put_if_present(first, ZoneLabel::OthPageNumber);
        self.put_if_present(last, ZoneLabel::OthPageNumber);

        match parse_page_range(first, last) {
            Ok((f, l)) if l.saturating_sub(f) > max_span => {
                warn!(
                    target: CANDIDATE_POOL,
                    first_page = f,
                    last_page = l,
                    max_span,
                    "Page range too long, skipping intermediate pages"
                );
            }
            Ok((f, l)) => {
                for page in f.saturating_add(1)..l {
                    self.put_if_present(&page.to_string(), ZoneLabel::OthPageNumber);
                }
            }
            Err(err) => {
                warn!(target: CANDIDATE_POOL, error = %err, "Skipping page range expansion");
            }
        }
    }

    /// Space-split tokens of every bibliographic entry, first-seen order.
    fn bib_info_tokens(&self) -> String {
        let tokens: IndexSet<&str> = self
            .entries
            .iter()
            .filter(|(_, label)| **label == ZoneLabel::MetBibInfo)
            .flat_map(|(text, _)| text.split(' '))
            .filter(|token| !token.is_empty())
            .collect();
        tokens.into_iter().collect::<Vec<_>>().join(" ")
    }
}

fn parse_page_range(first: &str, last: &str) -> Result<(u64, u64), LabelingError> {
    let parse = |field: &'static str, value: &str| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| LabelingError::UnparseableField {
                field,
                value: value.to_string(),
            })
    };
    Ok((parse("first_page", first)?, parse("last_page", last)?))
}
