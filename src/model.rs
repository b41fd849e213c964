//! Arena-backed geometric document tree.
//!
//! A [`Document`] owns one arena per tree level. Nodes refer to their children
//! and to their parent through typed handles, so ownership is always the
//! child lists and a parent link is only a lookup that [`crate::tree::set_parents`]
//! can rebuild at any time.

use crate::geo::Rect;
use crate::label::ZoneLabel;
use uuid::Uuid;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// Typed handle for pages
    PageId
);
handle!(
    /// Typed handle for zones
    ZoneId
);
handle!(
    /// Typed handle for lines
    LineId
);
handle!(
    /// Typed handle for words
    WordId
);
handle!(
    /// Typed handle for chunks
    ChunkId
);

/// The node a chunk is bound into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChunkOwner {
    Word(WordId),
    Zone(ZoneId),
    Page(PageId),
}

#[derive(Debug, Clone)]
pub struct Page {
    pub bounds: Rect,
    pub(crate) zones: Vec<ZoneId>,
    pub(crate) chunks: Vec<ChunkId>,
}

impl Page {
    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    /// Chunks not yet bound into any zone.
    pub fn chunks(&self) -> &[ChunkId] {
        &self.chunks
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub bounds: Rect,
    pub label: Option<ZoneLabel>,
    pub(crate) lines: Vec<LineId>,
    pub(crate) chunks: Vec<ChunkId>,
    pub(crate) parent: Option<PageId>,
}

impl Zone {
    pub fn lines(&self) -> &[LineId] {
        &self.lines
    }

    /// Chunks bound to the zone but not to any of its lines.
    pub fn chunks(&self) -> &[ChunkId] {
        &self.chunks
    }

    pub fn parent(&self) -> Option<PageId> {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub bounds: Rect,
    pub(crate) words: Vec<WordId>,
    pub(crate) parent: Option<ZoneId>,
}

impl Line {
    pub fn words(&self) -> &[WordId] {
        &self.words
    }

    pub fn parent(&self) -> Option<ZoneId> {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub struct Word {
    pub bounds: Rect,
    pub(crate) chunks: Vec<ChunkId>,
    pub(crate) parent: Option<LineId>,
}

impl Word {
    pub fn chunks(&self) -> &[ChunkId] {
        &self.chunks
    }

    pub fn parent(&self) -> Option<LineId> {
        self.parent
    }
}

/// Leaf of the tree. Text and bounds are fixed at creation.
#[derive(Debug, Clone)]
pub struct Chunk {
    bounds: Rect,
    text: String,
    pub(crate) parent: Option<ChunkOwner>,
}

impl Chunk {
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<ChunkOwner> {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    name: Option<String>,
    pub(crate) pages: Vec<PageId>,
    pub(crate) page_nodes: Vec<Page>,
    pub(crate) zone_nodes: Vec<Zone>,
    pub(crate) line_nodes: Vec<Line>,
    pub(crate) word_nodes: Vec<Word>,
    pub(crate) chunk_nodes: Vec<Chunk>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            pages: Vec::new(),
            page_nodes: Vec::new(),
            zone_nodes: Vec::new(),
            line_nodes: Vec::new(),
            word_nodes: Vec::new(),
            chunk_nodes: Vec::new(),
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.name = Some(name.into());
        doc
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn pages(&self) -> &[PageId] {
        &self.pages
    }

    pub fn page(&self, id: PageId) -> &Page {
        &self.page_nodes[id.index()]
    }

    pub fn page_mut(&mut self, id: PageId) -> &mut Page {
        &mut self.page_nodes[id.index()]
    }

    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zone_nodes[id.index()]
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> &mut Zone {
        &mut self.zone_nodes[id.index()]
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.line_nodes[id.index()]
    }

    pub fn line_mut(&mut self, id: LineId) -> &mut Line {
        &mut self.line_nodes[id.index()]
    }

    pub fn word(&self, id: WordId) -> &Word {
        &self.word_nodes[id.index()]
    }

    pub fn word_mut(&mut self, id: WordId) -> &mut Word {
        &mut self.word_nodes[id.index()]
    }

    pub fn chunk(&self, id: ChunkId) -> &Chunk {
        &self.chunk_nodes[id.index()]
    }

    /// Raw ownership lists. Callers that reorder or re-home children should run
    /// [`crate::tree::set_parents`] afterwards.
    pub fn page_zones_mut(&mut self, id: PageId) -> &mut Vec<ZoneId> {
        &mut self.page_nodes[id.index()].zones
    }

    pub fn zone_lines_mut(&mut self, id: ZoneId) -> &mut Vec<LineId> {
        &mut self.zone_nodes[id.index()].lines
    }

    pub fn line_words_mut(&mut self, id: LineId) -> &mut Vec<WordId> {
        &mut self.line_nodes[id.index()].words
    }

    pub fn word_chunks_mut(&mut self, id: WordId) -> &mut Vec<ChunkId> {
        &mut self.word_nodes[id.index()].chunks
    }

    pub fn add_page(&mut self, bounds: Rect) -> PageId {
        let id = PageId(self.page_nodes.len() as u32);
        self.page_nodes.push(Page {
            bounds,
            zones: Vec::new(),
            chunks: Vec::new(),
        });
        self.pages.push(id);
        id
    }

    pub fn add_zone(&mut self, page: PageId, bounds: Rect) -> ZoneId {
        let id = ZoneId(self.zone_nodes.len() as u32);
        self.zone_nodes.push(Zone {
            bounds,
            label: None,
            lines: Vec::new(),
            chunks: Vec::new(),
            parent: Some(page),
        });
        self.page_nodes[page.index()].zones.push(id);
        id
    }

    pub fn add_line(&mut self, zone: ZoneId, bounds: Rect) -> LineId {
        let id = LineId(self.line_nodes.len() as u32);
        self.line_nodes.push(Line {
            bounds,
            words: Vec::new(),
            parent: Some(zone),
        });
        self.zone_nodes[zone.index()].lines.push(id);
        id
    }

    pub fn add_word(&mut self, line: LineId, bounds: Rect) -> WordId {
        let id = WordId(self.word_nodes.len() as u32);
        self.word_nodes.push(Word {
            bounds,
            chunks: Vec::new(),
            parent: Some(line),
        });
        self.line_nodes[line.index()].words.push(id);
        id
    }

    pub fn add_chunk(&mut self, word: WordId, bounds: Rect, text: impl Into<String>) -> ChunkId {
        let id = self.push_chunk(bounds, text.into(), ChunkOwner::Word(word));
        self.word_nodes[word.index()].chunks.push(id);
        id
    }

    pub fn add_zone_chunk(&mut self, zone: ZoneId, bounds: Rect, text: impl Into<String>) -> ChunkId {
        let id = self.push_chunk(bounds, text.into(), ChunkOwner::Zone(zone));
        self.zone_nodes[zone.index()].chunks.push(id);
        id
    }

    pub fn add_page_chunk(&mut self, page: PageId, bounds: Rect, text: impl Into<String>) -> ChunkId {
        let id = self.push_chunk(bounds, text.into(), ChunkOwner::Page(page));
        self.page_nodes[page.index()].chunks.push(id);
        id
    }

    fn push_chunk(&mut self, bounds: Rect, text: String, owner: ChunkOwner) -> ChunkId {
        let id = ChunkId(self.chunk_nodes.len() as u32);
        self.chunk_nodes.push(Chunk {
            bounds,
            text,
            parent: Some(owner),
        });
        id
    }

    pub fn label(&self, zone: ZoneId) -> Option<ZoneLabel> {
        self.zone(zone).label
    }

    pub fn set_label(&mut self, zone: ZoneId, label: Option<ZoneLabel>) {
        self.zone_mut(zone).label = label;
    }

    /// All zones in document order (page by page).
    pub fn zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.pages
            .iter()
            .flat_map(move |page| self.page(*page).zones.iter().copied())
    }

    pub fn zone_count(&self) -> usize {
        self.pages.iter().map(|page| self.page(*page).zones.len()).sum()
    }

    pub fn word_text(&self, word: WordId) -> String {
        self.word(word)
            .chunks
            .iter()
            .map(|chunk| self.chunk(*chunk).text())
            .collect()
    }

    pub fn line_text(&self, line: LineId) -> String {
        self.line(line)
            .words
            .iter()
            .map(|word| self.word_text(*word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn zone_text(&self, zone: ZoneId) -> String {
        self.zone(zone)
            .lines
            .iter()
            .map(|line| self.line_text(*line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
