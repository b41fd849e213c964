mod common;

use common::{add_text_zone, page_zones, row, DocumentBuilder, PAGE};
use pretty_assertions::assert_eq;
use zone_labeler::error::{NodeKind, TreeError};
use zone_labeler::geo::Rect;
use zone_labeler::label::ZoneLabel;
use zone_labeler::model::{ChunkOwner, Document, PageId, ZoneId};
use zone_labeler::tree::*;

fn zone_origins(doc: &Document) -> Vec<(f64, f64)> {
    page_zones(doc, 0)
        .into_iter()
        .map(|zone| (doc.zone(zone).bounds.x0, doc.zone(zone).bounds.y0))
        .collect()
}

fn two_column_page() -> Document {
    DocumentBuilder::new("columns")
        .zone(Rect::new(300.0, 100.0, 580.0, 140.0), "right top")
        .zone(Rect::new(20.0, 160.3, 280.0, 200.0), "left bottom")
        .zone(Rect::new(20.0, 100.4, 280.0, 140.0), "left top")
        .zone(Rect::new(300.0, 160.0, 580.0, 200.0), "right bottom")
        .build()
}

#[test]
fn test_set_parents_links_every_level() {
    let mut doc = DocumentBuilder::new("links").zone(row(0), "one two\nthree").build();
    let page = doc.pages()[0];
    let zone = page_zones(&doc, 0)[0];
    let line = doc.zone(zone).lines()[1];
    let word = doc.line(line).words()[0];
    let chunk = doc.word(word).chunks()[0];

    set_parents(&mut doc).unwrap();
    set_parents(&mut doc).unwrap();

    assert_eq!(doc.zone(zone).parent(), Some(page));
    assert_eq!(doc.line(line).parent(), Some(zone));
    assert_eq!(doc.word(word).parent(), Some(line));
    assert_eq!(doc.chunk(chunk).parent(), Some(ChunkOwner::Word(word)));
    assert_eq!(doc.zone(zone).lines().len(), 2);
}

#[test]
fn test_set_parents_rejects_shared_child() {
    let mut doc = DocumentBuilder::new("shared").zone(row(0), "alpha").build();
    let zone = page_zones(&doc, 0)[0];
    let second = doc.add_page(PAGE);
    doc.page_zones_mut(second).push(zone);

    assert_eq!(
        set_parents(&mut doc),
        Err(TreeError::SharedChild {
            kind: NodeKind::Zone,
            index: zone.index(),
        })
    );
}

#[test]
fn test_set_parents_rejects_dangling_handle() {
    let mut doc = DocumentBuilder::new("dangling").zone(row(0), "alpha").build();
    let page = doc.pages()[0];
    doc.page_zones_mut(page).push(ZoneId(99));

    assert_eq!(
        set_parents(&mut doc),
        Err(TreeError::DanglingHandle {
            kind: NodeKind::Zone,
            index: 99,
        })
    );
}

#[test]
fn test_set_page_parents_relinks_only_that_page() {
    let mut doc = DocumentBuilder::new("moved")
        .zone(row(0), "first page")
        .page()
        .zone(row(0), "second page")
        .build();
    let first = doc.pages()[0];
    let second = doc.pages()[1];
    let moved = page_zones(&doc, 1)[0];
    doc.page_zones_mut(second).clear();
    doc.page_zones_mut(first).push(moved);

    set_page_parents(&mut doc, second).unwrap();
    assert_eq!(doc.zone(moved).parent(), Some(second));

    set_page_parents(&mut doc, first).unwrap();
    assert_eq!(doc.zone(moved).parent(), Some(first));
    let line = doc.zone(moved).lines()[0];
    assert_eq!(doc.line(line).parent(), Some(moved));
}

#[test]
fn test_set_page_parents_rejects_foreign_page() {
    let mut doc = DocumentBuilder::new("foreign").zone(row(0), "alpha").build();

    assert_eq!(
        set_page_parents(&mut doc, PageId(7)),
        Err(TreeError::DanglingHandle {
            kind: NodeKind::Page,
            index: 7,
        })
    );
}

#[test]
fn test_set_page_parents_rejects_chunk_shared_within_page() {
    let mut doc = DocumentBuilder::new("shared chunk")
        .zone(row(0), "alpha beta")
        .page()
        .zone(row(0), "untouched")
        .build();
    let page = doc.pages()[0];
    let zone = page_zones(&doc, 0)[0];
    let line = doc.zone(zone).lines()[0];
    let alpha = doc.line(line).words()[0];
    let beta = doc.line(line).words()[1];
    let chunk = doc.word(alpha).chunks()[0];
    doc.word_chunks_mut(beta).push(chunk);

    assert_eq!(
        set_page_parents(&mut doc, page),
        Err(TreeError::SharedChild {
            kind: NodeKind::Chunk,
            index: chunk.index(),
        })
    );
    let second = doc.pages()[1];
    assert_eq!(set_page_parents(&mut doc, second), Ok(()));
}

#[test]
fn test_validate_rejects_non_finite_bounds() {
    let mut doc = DocumentBuilder::new("nan").zone(row(0), "alpha").build();
    let page = doc.pages()[0];
    let broken = doc.add_zone(page, Rect::new(0.0, f64::NAN, 10.0, 10.0));

    assert_eq!(
        validate(&mut doc),
        Err(TreeError::NonFiniteBounds {
            kind: NodeKind::Zone,
            index: broken.index(),
        })
    );
}

#[test]
fn test_validate_accepts_well_formed_document() {
    let mut doc = two_column_page();
    assert!(validate(&mut doc).is_ok());
}

#[test]
fn test_row_then_column_bands_nearby_tops() {
    let mut doc = two_column_page();
    let page = doc.pages()[0];

    sort_zones_row_then_column(&mut doc, page, 1.0);

    assert_eq!(
        zone_origins(&doc),
        vec![(20.0, 100.4), (300.0, 100.0), (20.0, 160.3), (300.0, 160.0)]
    );
}

#[test]
fn test_column_then_row_orders_columns_first() {
    let mut doc = two_column_page();
    let page = doc.pages()[0];

    sort_zones_column_then_row(&mut doc, page, 1.0);

    assert_eq!(
        zone_origins(&doc),
        vec![(20.0, 100.4), (20.0, 160.3), (300.0, 100.0), (300.0, 160.0)]
    );
}

#[test]
fn test_sorting_is_idempotent() {
    let mut doc = two_column_page();
    let page = doc.pages()[0];

    sort_zones_row_then_column(&mut doc, page, 1.0);
    let once = page_zones(&doc, 0);
    sort_zones_row_then_column(&mut doc, page, 1.0);
    assert_eq!(page_zones(&doc, 0), once);

    sort_zones_column_then_row(&mut doc, page, 1.0);
    let once = page_zones(&doc, 0);
    sort_zones_column_then_row(&mut doc, page, 1.0);
    assert_eq!(page_zones(&doc, 0), once);
}

#[test]
fn test_generic_sort_over_plain_rects() {
    let mut rects = vec![
        Rect::new(50.0, 10.3, 60.0, 20.0),
        Rect::new(0.0, 30.0, 10.0, 40.0),
        Rect::new(0.0, 10.0, 10.0, 20.0),
    ];
    sort_by_row_then_column(&mut rects, 1.0, |r| *r);
    let origins: Vec<(f64, f64)> = rects.iter().map(|r| (r.x0, r.y0)).collect();
    assert_eq!(origins, vec![(0.0, 10.0), (50.0, 10.3), (0.0, 30.0)]);
}

#[test]
fn test_sort_zone_recursively_orders_lines_and_words() {
    let mut doc = Document::with_name("recursive");
    let page = doc.add_page(PAGE);
    let zone = doc.add_zone(page, row(0));
    let lower = doc.add_line(zone, Rect::new(20.0, 40.0, 580.0, 60.0));
    let upper = doc.add_line(zone, Rect::new(20.0, 20.0, 580.0, 40.0));
    let right = doc.add_word(upper, Rect::new(100.0, 20.0, 150.0, 40.0));
    let left = doc.add_word(upper, Rect::new(20.0, 20.0, 80.0, 40.0));
    doc.add_chunk(right, Rect::new(100.0, 20.0, 150.0, 40.0), "world");
    doc.add_chunk(left, Rect::new(20.0, 20.0, 80.0, 40.0), "hello");
    let word = doc.add_word(lower, Rect::new(20.0, 40.0, 80.0, 60.0));
    doc.add_chunk(word, Rect::new(20.0, 40.0, 80.0, 60.0), "again");

    sort_zone_recursively(&mut doc, zone);

    assert_eq!(doc.zone(zone).lines(), &[upper, lower]);
    assert_eq!(doc.zone_text(zone), "hello world\nagain");
}

#[test]
fn test_deep_clone_is_equal_and_isolated() {
    let original = DocumentBuilder::new("clone")
        .labeled_zone(row(0), "A Title", ZoneLabel::MetTitle)
        .zone(row(1), "body text here")
        .build();

    let mut copy = deep_clone(&original);
    assert!(documents_equal(&original, &copy));
    assert_eq!(copy.label(page_zones(&copy, 0)[0]), Some(ZoneLabel::MetTitle));

    let copy_zone = page_zones(&copy, 0)[1];
    copy.set_label(copy_zone, Some(ZoneLabel::BodyContent));
    let copy_page = copy.pages()[0];
    add_text_zone(&mut copy, copy_page, row(2), "extra");

    assert_eq!(original.label(page_zones(&original, 0)[1]), None);
    assert_eq!(original.zone_count(), 2);
    assert!(!documents_equal(&original, &copy));
}

#[test]
fn test_deep_clone_all_keeps_order() {
    let docs = vec![
        DocumentBuilder::new("a").zone(row(0), "first").build(),
        DocumentBuilder::new("b").zone(row(0), "second").build(),
    ];
    let copies = deep_clone_all(&docs);
    assert_eq!(copies.len(), 2);
    assert!(documents_equal(&docs[0], &copies[0]));
    assert!(documents_equal(&docs[1], &copies[1]));
    assert!(!documents_equal(&docs[0], &copies[1]));
}

#[test]
fn test_clone_zone_into_other_document() {
    let src = DocumentBuilder::new("src").zone(row(0), "moving zone\ntwo lines").build();
    let zone = page_zones(&src, 0)[0];

    let mut dst = Document::with_name("dst");
    let dst_page = dst.add_page(PAGE);
    let copied = clone_zone_into(&src, zone, &mut dst, dst_page);

    assert!(zones_equal(&src, zone, &dst, copied));
    assert_eq!(dst.zone(copied).parent(), Some(dst_page));
    let line = dst.zone(copied).lines()[0];
    assert_eq!(dst.line(line).parent(), Some(copied));
    assert_eq!(dst.zone_text(copied), "moving zone\ntwo lines");
}

#[test]
fn test_clone_page_into_copies_every_zone() {
    let src = DocumentBuilder::new("src")
        .zone(row(0), "first")
        .zone(row(1), "second zone")
        .build();
    let mut dst = Document::new();
    let copied = clone_page_into(&src, src.pages()[0], &mut dst);

    assert!(pages_equal(&src, src.pages()[0], &dst, copied));
    assert_eq!(dst.page(copied).zones().len(), 2);
}

#[test]
fn test_chunk_counts_and_maps() {
    let doc = DocumentBuilder::new("counts")
        .zone(row(0), "one two three\nfour")
        .zone(row(1), "five six")
        .build();
    let page = doc.pages()[0];
    let zones = page_zones(&doc, 0);

    assert_eq!(count_chunks_in_zone(&doc, zones[0]), 4);
    assert_eq!(count_chunks_in_zone(&doc, zones[1]), 2);
    let first_line = doc.zone(zones[0]).lines()[0];
    assert_eq!(count_chunks_in_line(&doc, first_line), 3);

    let to_zones = map_chunks_to_zones(&doc, page);
    assert_eq!(to_zones.len(), 6);
    assert_eq!(to_zones.values().filter(|z| **z == zones[1]).count(), 2);

    let to_lines = map_chunks_to_lines(&doc, page);
    assert_eq!(to_lines.values().filter(|l| **l == first_line).count(), 3);

    let to_words = map_chunks_to_words(&doc, page);
    assert_eq!(to_words.len(), 6);
    for (chunk, word) in to_words {
        assert!(doc.word(word).chunks().contains(&chunk));
    }
}

#[test]
fn test_containment() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    let inner = Rect::new(10.0, 10.0, 50.0, 50.0);
    let poking_out = Rect::new(10.0, 10.0, 100.5, 50.0);

    assert!(contains(&outer, &outer, 0.0));
    assert!(contains(&inner, &inner, 0.0));
    assert!(contains(&outer, &inner, 0.0));
    assert!(!contains(&inner, &outer, 0.0));
    assert!(!contains(&outer, &poking_out, 0.0));
    assert!(contains(&outer, &poking_out, 1.0));
}

#[test]
fn test_structural_equality_detects_text_and_geometry() {
    let a = DocumentBuilder::new("a").zone(row(0), "same words").build();
    let b = DocumentBuilder::new("b").zone(row(0), "same words").build();
    let c = DocumentBuilder::new("c").zone(row(0), "other words").build();
    let d = DocumentBuilder::new("d").zone(row(1), "same words").build();

    assert!(documents_equal(&a, &b));
    assert!(!documents_equal(&a, &c));
    assert!(!documents_equal(&a, &d));

    let (za, zb) = (page_zones(&a, 0)[0], page_zones(&b, 0)[0]);
    let (la, lb) = (a.zone(za).lines()[0], b.zone(zb).lines()[0]);
    assert!(lines_equal(&a, la, &b, lb));
    let (wa, wb) = (a.line(la).words()[1], b.line(lb).words()[1]);
    assert!(words_equal(&a, wa, &b, wb));
    assert!(chunks_equal(&a, a.word(wa).chunks()[0], &b, b.word(wb).chunks()[0]));

    let two_pages = {
        let mut doc = deep_clone(&a);
        doc.add_page(PAGE);
        doc
    };
    assert!(!documents_equal(&a, &two_pages));
}
