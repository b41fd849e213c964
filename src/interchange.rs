//! Owned, nested form of the document tree.
//!
//! Records are what the geometry extractor hands us and what the labeled
//! output is written as. They are also how subtrees move between arenas:
//! reading a subtree into a record copies it by value, inserting a record
//! rebuilds it with fresh handles and parent links.

use crate::error::Result;
use crate::geo::Rect;
use crate::label::ZoneLabel;
use crate::model::{Document, LineId, PageId, WordId, ZoneId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pages: Vec<PageRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub bounds: Rect,
    #[serde(default)]
    pub zones: Vec<ZoneRecord>,
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub bounds: Rect,
    #[serde(default)]
    pub label: Option<ZoneLabel>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub bounds: Rect,
    #[serde(default)]
    pub words: Vec<WordRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub bounds: Rect,
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub bounds: Rect,
    pub text: String,
}

impl Document {
    pub fn from_record(record: &DocumentRecord) -> Self {
        let mut doc = Document::new();
        if let Some(name) = &record.name {
            doc.set_name(name.clone());
        }
        for page in &record.pages {
            doc.insert_page_record(page);
        }
        doc
    }

    pub fn to_record(&self) -> DocumentRecord {
        DocumentRecord {
            name: self.name().map(str::to_string),
            pages: self.pages().iter().map(|p| self.page_record(*p)).collect(),
        }
    }

    pub fn page_record(&self, page: PageId) -> PageRecord {
        let node = self.page(page);
        PageRecord {
            bounds: node.bounds,
            zones: node.zones().iter().map(|z| self.zone_record(*z)).collect(),
            chunks: self.chunk_records(node.chunks()),
        }
    }

    pub fn zone_record(&self, zone: ZoneId) -> ZoneRecord {
        let node = self.zone(zone);
        ZoneRecord {
            bounds: node.bounds,
            label: node.label,
            lines: node.lines().iter().map(|l| self.line_record(*l)).collect(),
            chunks: self.chunk_records(node.chunks()),
        }
    }

    pub fn line_record(&self, line: LineId) -> LineRecord {
        let node = self.line(line);
        LineRecord {
            bounds: node.bounds,
            words: node.words().iter().map(|w| self.word_record(*w)).collect(),
        }
    }

    pub fn word_record(&self, word: WordId) -> WordRecord {
        let node = self.word(word);
        WordRecord {
            bounds: node.bounds,
            chunks: self.chunk_records(node.chunks()),
        }
    }

    fn chunk_records(&self, chunks: &[crate::model::ChunkId]) -> Vec<ChunkRecord> {
        chunks
            .iter()
            .map(|c| {
                let chunk = self.chunk(*c);
                ChunkRecord {
                    bounds: *chunk.bounds(),
                    text: chunk.text().to_string(),
                }
            })
            .collect()
    }

    pub fn insert_page_record(&mut self, record: &PageRecord) -> PageId {
        let page = self.add_page(record.bounds);
        for zone in &record.zones {
            self.insert_zone_record(page, zone);
        }
        for chunk in &record.chunks {
            self.add_page_chunk(page, chunk.bounds, chunk.text.clone());
        }
        page
    }

    pub fn insert_zone_record(&mut self, page: PageId, record: &ZoneRecord) -> ZoneId {
        let zone = self.add_zone(page, record.bounds);
        self.set_label(zone, record.label);
        for line in &record.lines {
            self.insert_line_record(zone, line);
        }
        for chunk in &record.chunks {
            self.add_zone_chunk(zone, chunk.bounds, chunk.text.clone());
        }
        zone
    }

    pub fn insert_line_record(&mut self, zone: ZoneId, record: &LineRecord) -> LineId {
        let line = self.add_line(zone, record.bounds);
        for word in &record.words {
            self.insert_word_record(line, word);
        }
        line
    }

    pub fn insert_word_record(&mut self, line: LineId, record: &WordRecord) -> WordId {
        let word = self.add_word(line, record.bounds);
        for chunk in &record.chunks {
            self.add_chunk(word, chunk.bounds, chunk.text.clone());
        }
        word
    }
}

/// Reads a geometry file and names the document after the file when the
/// record carries no name of its own.
pub fn read_document(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path)?;
    let record: DocumentRecord = serde_json::from_str(&raw)?;
    let mut doc = Document::from_record(&record);
    if doc.name().is_none() {
        if let Some(file_name) = path.file_name() {
            doc.set_name(file_name.to_string_lossy().into_owned());
        }
    }
    Ok(doc)
}

pub fn write_document(doc: &Document, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&doc.to_record())?;
    fs::write(path, json)?;
    Ok(())
}
