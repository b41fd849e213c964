//! Consistency operations over the document tree: parent-link repair,
//! validation, geometric ordering, deep cloning, structural equality and
//! chunk lookups.

use crate::error::{NodeKind, TreeError};
use crate::geo::Rect;
use crate::logging::TREE_OPS;
use crate::model::{ChunkId, ChunkOwner, Document, LineId, PageId, WordId, ZoneId};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Geometry tolerance used by the structural equality checks.
pub const SIMILARITY_TOLERANCE: f64 = 0.001;

// -----------------------------------------------------------------------------
// Parent links

struct Claims {
    zones: Vec<bool>,
    lines: Vec<bool>,
    words: Vec<bool>,
    chunks: Vec<bool>,
}

impl Claims {
    fn new(doc: &Document) -> Self {
        Self {
            zones: vec![false; doc.zone_nodes.len()],
            lines: vec![false; doc.line_nodes.len()],
            words: vec![false; doc.word_nodes.len()],
            chunks: vec![false; doc.chunk_nodes.len()],
        }
    }
}

fn claim(seen: &mut [bool], kind: NodeKind, index: usize) -> Result<(), TreeError> {
    match seen.get_mut(index) {
        None => Err(TreeError::DanglingHandle { kind, index }),
        Some(true) => Err(TreeError::SharedChild { kind, index }),
        Some(slot) => {
            *slot = true;
            Ok(())
        }
    }
}

/// Points every node's parent link at the node that lists it as a child.
/// Child order is left untouched and running it twice changes nothing.
pub fn set_parents(doc: &mut Document) -> Result<(), TreeError> {
    let mut claims = Claims::new(doc);
    for idx in 0..doc.pages.len() {
        let page = doc.pages[idx];
        relink_page(doc, page, &mut claims)?;
    }
    Ok(())
}

/// Same as [`set_parents`] restricted to one page.
pub fn set_page_parents(doc: &mut Document, page: PageId) -> Result<(), TreeError> {
    let mut claims = Claims::new(doc);
    relink_page(doc, page, &mut claims)
}

fn relink_page(doc: &mut Document, page: PageId, claims: &mut Claims) -> Result<(), TreeError> {
    let Document {
        page_nodes,
        zone_nodes,
        line_nodes,
        word_nodes,
        chunk_nodes,
        ..
    } = doc;

    let page_node = page_nodes.get(page.index()).ok_or(TreeError::DanglingHandle {
        kind: NodeKind::Page,
        index: page.index(),
    })?;

    for &zone_id in &page_node.zones {
        claim(&mut claims.zones, NodeKind::Zone, zone_id.index())?;
        let zone = &mut zone_nodes[zone_id.index()];
        zone.parent = Some(page);

        for &line_id in &zone.lines {
            claim(&mut claims.lines, NodeKind::Line, line_id.index())?;
            let line = &mut line_nodes[line_id.index()];
            line.parent = Some(zone_id);

            for &word_id in &line.words {
                claim(&mut claims.words, NodeKind::Word, word_id.index())?;
                let word = &mut word_nodes[word_id.index()];
                word.parent = Some(line_id);

                for &chunk_id in &word.chunks {
                    claim(&mut claims.chunks, NodeKind::Chunk, chunk_id.index())?;
                    chunk_nodes[chunk_id.index()].parent = Some(ChunkOwner::Word(word_id));
                }
            }
        }

        for &chunk_id in &zone.chunks {
            claim(&mut claims.chunks, NodeKind::Chunk, chunk_id.index())?;
            chunk_nodes[chunk_id.index()].parent = Some(ChunkOwner::Zone(zone_id));
        }
    }

    for &chunk_id in &page_node.chunks {
        claim(&mut claims.chunks, NodeKind::Chunk, chunk_id.index())?;
        chunk_nodes[chunk_id.index()].parent = Some(ChunkOwner::Page(page));
    }

    Ok(())
}

/// Repairs parent links and rejects trees with non-finite geometry anywhere
/// below the document.
pub fn validate(doc: &mut Document) -> Result<(), TreeError> {
    set_parents(doc)?;

    let non_finite = |kind: NodeKind, index: usize| TreeError::NonFiniteBounds { kind, index };

    for &page in doc.pages() {
        let page_node = doc.page(page);
        if !page_node.bounds.is_finite() {
            return Err(non_finite(NodeKind::Page, page.index()));
        }
        for &chunk in page_node.chunks() {
            if !doc.chunk(chunk).bounds().is_finite() {
                return Err(non_finite(NodeKind::Chunk, chunk.index()));
            }
        }
        for &zone in page_node.zones() {
            let zone_node = doc.zone(zone);
            if !zone_node.bounds.is_finite() {
                return Err(non_finite(NodeKind::Zone, zone.index()));
            }
            for &chunk in zone_node.chunks() {
                if !doc.chunk(chunk).bounds().is_finite() {
                    return Err(non_finite(NodeKind::Chunk, chunk.index()));
                }
            }
            for &line in zone_node.lines() {
                if !doc.line(line).bounds.is_finite() {
                    return Err(non_finite(NodeKind::Line, line.index()));
                }
                for &word in doc.line(line).words() {
                    if !doc.word(word).bounds.is_finite() {
                        return Err(non_finite(NodeKind::Word, word.index()));
                    }
                    for &chunk in doc.word(word).chunks() {
                        if !doc.chunk(chunk).bounds().is_finite() {
                            return Err(non_finite(NodeKind::Chunk, chunk.index()));
                        }
                    }
                }
            }
        }
    }

    debug!(
        target: TREE_OPS,
        document_id = %doc.id,
        pages = doc.pages().len(),
        zones = doc.zone_count(),
        "Validated document tree"
    );
    Ok(())
}

// -----------------------------------------------------------------------------
// Ordering

/// Orders items top-to-bottom, then left-to-right. Items whose `y0` lies
/// within `tolerance` of the first item of their row are treated as one row
/// and ordered by exact `x0`. Sorting an already sorted slice is a no-op.
pub fn sort_by_row_then_column<T: Copy>(
    items: &mut [T],
    tolerance: f64,
    bounds_of: impl Fn(&T) -> Rect,
) {
    sort_banded(items, tolerance, |item| {
        let b = bounds_of(item);
        (b.y0, b.x0)
    });
}

/// Orders items left-to-right, then top-to-bottom, banding `x0` by `tolerance`.
pub fn sort_by_column_then_row<T: Copy>(
    items: &mut [T],
    tolerance: f64,
    bounds_of: impl Fn(&T) -> Rect,
) {
    sort_banded(items, tolerance, |item| {
        let b = bounds_of(item);
        (b.x0, b.y0)
    });
}

// Banding keeps the comparator a total order, which a plain "equal within
// tolerance" comparison is not.
fn sort_banded<T: Copy>(items: &mut [T], tolerance: f64, keys: impl Fn(&T) -> (f64, f64)) {
    let mut keyed: Vec<(f64, f64, T)> = items
        .iter()
        .map(|item| {
            let (primary, secondary) = keys(item);
            (primary, secondary, *item)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut banded: Vec<(usize, f64, T)> = Vec::with_capacity(keyed.len());
    let mut band = 0;
    let mut band_start: Option<f64> = None;
    for (primary, secondary, item) in keyed {
        match band_start {
            Some(start) if primary - start <= tolerance => {}
            Some(_) => {
                band += 1;
                band_start = Some(primary);
            }
            None => band_start = Some(primary),
        }
        banded.push((band, secondary, item));
    }
    banded.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));

    for (slot, (_, _, item)) in items.iter_mut().zip(banded) {
        *slot = item;
    }
}

pub fn sort_zones_row_then_column(doc: &mut Document, page: PageId, tolerance: f64) {
    let mut zones = std::mem::take(doc.page_zones_mut(page));
    sort_by_row_then_column(&mut zones, tolerance, |z| doc.zone(*z).bounds);
    *doc.page_zones_mut(page) = zones;
}

pub fn sort_zones_column_then_row(doc: &mut Document, page: PageId, tolerance: f64) {
    let mut zones = std::mem::take(doc.page_zones_mut(page));
    sort_by_column_then_row(&mut zones, tolerance, |z| doc.zone(*z).bounds);
    *doc.page_zones_mut(page) = zones;
}

fn by_x(a: &Rect, b: &Rect) -> Ordering {
    a.x0.total_cmp(&b.x0)
}

pub fn sort_lines(doc: &mut Document, zone: ZoneId) {
    let mut lines = std::mem::take(doc.zone_lines_mut(zone));
    lines.sort_by(|a, b| {
        let (a, b) = (&doc.line(*a).bounds, &doc.line(*b).bounds);
        a.y0.total_cmp(&b.y0).then_with(|| by_x(a, b))
    });
    *doc.zone_lines_mut(zone) = lines;
}

pub fn sort_words(doc: &mut Document, line: LineId) {
    let mut words = std::mem::take(doc.line_words_mut(line));
    words.sort_by(|a, b| by_x(&doc.word(*a).bounds, &doc.word(*b).bounds));
    *doc.line_words_mut(line) = words;
}

pub fn sort_chunks(doc: &mut Document, word: WordId) {
    let mut chunks = std::mem::take(doc.word_chunks_mut(word));
    chunks.sort_by(|a, b| by_x(doc.chunk(*a).bounds(), doc.chunk(*b).bounds()));
    *doc.word_chunks_mut(word) = chunks;
}

pub fn sort_zone_recursively(doc: &mut Document, zone: ZoneId) {
    sort_lines(doc, zone);
    for line in doc.zone(zone).lines().to_vec() {
        sort_words(doc, line);
        for word in doc.line(line).words().to_vec() {
            sort_chunks(doc, word);
        }
    }
}

pub fn sort_page_recursively(doc: &mut Document, page: PageId) {
    for zone in doc.page(page).zones().to_vec() {
        sort_zone_recursively(doc, zone);
    }
}

pub fn sort_document_recursively(doc: &mut Document) {
    for page in doc.pages().to_vec() {
        sort_page_recursively(doc, page);
    }
}

// -----------------------------------------------------------------------------
// Deep clone

/// Independent copy of the whole document with freshly linked parents.
pub fn deep_clone(doc: &Document) -> Document {
    Document::from_record(&doc.to_record())
}

pub fn deep_clone_all(docs: &[Document]) -> Vec<Document> {
    docs.iter().map(deep_clone).collect()
}

pub fn clone_page_into(src: &Document, page: PageId, dst: &mut Document) -> PageId {
    dst.insert_page_record(&src.page_record(page))
}

pub fn clone_zone_into(src: &Document, zone: ZoneId, dst: &mut Document, dst_page: PageId) -> ZoneId {
    dst.insert_zone_record(dst_page, &src.zone_record(zone))
}

pub fn clone_line_into(src: &Document, line: LineId, dst: &mut Document, dst_zone: ZoneId) -> LineId {
    dst.insert_line_record(dst_zone, &src.line_record(line))
}

pub fn clone_word_into(src: &Document, word: WordId, dst: &mut Document, dst_line: LineId) -> WordId {
    dst.insert_word_record(dst_line, &src.word_record(word))
}

// -----------------------------------------------------------------------------
// Counting and lookups

pub fn count_chunks_in_line(doc: &Document, line: LineId) -> usize {
    doc.line(line)
        .words()
        .iter()
        .map(|word| doc.word(*word).chunks().len())
        .sum()
}

pub fn count_chunks_in_zone(doc: &Document, zone: ZoneId) -> usize {
    doc.zone(zone)
        .lines()
        .iter()
        .map(|line| count_chunks_in_line(doc, *line))
        .sum()
}

/// Visits every word-bound chunk of a page with its zone, line and word.
fn for_each_bound_chunk(
    doc: &Document,
    page: PageId,
    mut visit: impl FnMut(ChunkId, ZoneId, LineId, WordId),
) {
    for &zone in doc.page(page).zones() {
        for &line in doc.zone(zone).lines() {
            for &word in doc.line(line).words() {
                for &chunk in doc.word(word).chunks() {
                    visit(chunk, zone, line, word);
                }
            }
        }
    }
}

pub fn map_chunks_to_words(doc: &Document, page: PageId) -> HashMap<ChunkId, WordId> {
    let mut map = HashMap::new();
    for_each_bound_chunk(doc, page, |chunk, _, _, word| {
        map.insert(chunk, word);
    });
    map
}

pub fn map_chunks_to_lines(doc: &Document, page: PageId) -> HashMap<ChunkId, LineId> {
    let mut map = HashMap::new();
    for_each_bound_chunk(doc, page, |chunk, _, line, _| {
        map.insert(chunk, line);
    });
    map
}

pub fn map_chunks_to_zones(doc: &Document, page: PageId) -> HashMap<ChunkId, ZoneId> {
    let mut map = HashMap::new();
    for_each_bound_chunk(doc, page, |chunk, zone, _, _| {
        map.insert(chunk, zone);
    });
    map
}

pub fn contains(outer: &Rect, inner: &Rect, tolerance: f64) -> bool {
    outer.contains(inner, tolerance)
}

// -----------------------------------------------------------------------------
// Structural equality

fn pairwise<T: Copy>(left: &[T], right: &[T], mut equal: impl FnMut(T, T) -> bool) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| equal(*l, *r))
}

pub fn chunks_equal(a: &Document, ca: ChunkId, b: &Document, cb: ChunkId) -> bool {
    let (left, right) = (a.chunk(ca), b.chunk(cb));
    left.text() == right.text()
        && left
            .bounds()
            .is_similar_to(right.bounds(), SIMILARITY_TOLERANCE)
}

pub fn words_equal(a: &Document, wa: WordId, b: &Document, wb: WordId) -> bool {
    pairwise(a.word(wa).chunks(), b.word(wb).chunks(), |l, r| {
        chunks_equal(a, l, b, r)
    })
}

pub fn lines_equal(a: &Document, la: LineId, b: &Document, lb: LineId) -> bool {
    pairwise(a.line(la).words(), b.line(lb).words(), |l, r| {
        words_equal(a, l, b, r)
    })
}

pub fn zones_equal(a: &Document, za: ZoneId, b: &Document, zb: ZoneId) -> bool {
    pairwise(a.zone(za).lines(), b.zone(zb).lines(), |l, r| {
        lines_equal(a, l, b, r)
    })
}

pub fn pages_equal(a: &Document, pa: PageId, b: &Document, pb: PageId) -> bool {
    pairwise(a.page(pa).zones(), b.page(pb).zones(), |l, r| {
        zones_equal(a, l, b, r)
    })
}

/// Page `i` of `a` is compared with page `i` of `b`.
pub fn documents_equal(a: &Document, b: &Document) -> bool {
    pairwise(a.pages(), b.pages(), |l, r| pages_equal(a, l, b, r))
}
