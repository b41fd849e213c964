//! Structured metadata record of a document, authored independently of its
//! geometry.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub given_names: String,
    pub surname: String,
    pub email: Option<String>,
}

impl Author {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_names, self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub caption: Option<String>,
    pub body: Option<String>,
    pub footnotes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Equation {
    pub label: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParts {
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_number(month: &str) -> Option<usize> {
    let month = month.trim();
    if let Ok(n) = month.parse::<usize>() {
        return (1..=12).contains(&n).then_some(n);
    }
    let lower = month.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.to_lowercase().starts_with(&lower))
        .map(|idx| idx + 1)
}

impl DateParts {
    pub fn new(day: impl Into<String>, month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            day: Some(day.into()),
            month: Some(month.into()),
            year: Some(year.into()),
        }
    }

    /// Every textual rendering a date is likely to take in print. Needs all
    /// three parts; a day or month that cannot be read only yields the parts
    /// as given.
    pub fn produce_dates(&self) -> Vec<String> {
        let (Some(day), Some(month), Some(year)) = (&self.day, &self.month, &self.year) else {
            return Vec::new();
        };
        let (day, month, year) = (day.trim(), month.trim(), year.trim());
        if day.is_empty() || month.is_empty() || year.is_empty() {
            return Vec::new();
        }

        let parsed = day
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .zip(month_number(month));
        let Some((d, m)) = parsed else {
            return vec![format!("{day} {month} {year}")];
        };

        let full = MONTHS[m - 1];
        let short = &full[..3];
        vec![
            format!("{d} {full} {year}"),
            format!("{full} {d} {year}"),
            format!("{d} {short} {year}"),
            format!("{short} {d} {year}"),
            format!("{d:02}.{m:02}.{year}"),
            format!("{year}-{m:02}-{d:02}"),
            format!("{d:02}/{m:02}/{year}"),
        ]
    }
}

/// Ground-truth metadata. Every field may be missing from the JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTruth {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub journal_title: Option<String>,
    pub publisher: Option<String>,
    pub publisher_id: Option<String>,
    pub issn: Option<String>,
    pub permissions: Option<String>,
    pub license: Option<String>,
    pub article_types: Vec<String>,
    pub received: Option<DateParts>,
    pub accepted: Option<DateParts>,
    pub publication_dates: Vec<DateParts>,
    pub access_uri: Option<String>,
    pub keywords: Vec<String>,
    pub doi: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub first_page: Option<String>,
    pub last_page: Option<String>,
    pub editors: Vec<String>,
    pub authors: Vec<Author>,
    pub affiliations: Vec<String>,
    pub correspondence: Vec<String>,
    pub author_notes: Option<String>,
    pub paragraphs: Vec<String>,
    pub appendix_paragraphs: Vec<String>,
    pub section_titles: Vec<String>,
    pub appendix_titles: Vec<String>,
    pub figures: Vec<String>,
    pub tables: Vec<Table>,
    pub financial_disclosure: Option<String>,
    pub conflict: Option<String>,
    pub copyright: Option<String>,
    pub acknowledgment: Option<String>,
    pub back_notes: Option<String>,
    pub glossary: Option<String>,
    pub equations: Vec<Equation>,
    pub references: Vec<String>,
}

impl GroundTruth {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
