//! Nearest zone in each direction, per page.

use crate::geo::Rect;
use crate::model::{Document, PageId};
use ordered_float::OrderedFloat;
use rstar::{RTree, RTreeObject, AABB};
use std::cmp::Reverse;

// Wrapper for a zone's bounds to implement RTreeObject
#[derive(Debug, Clone, Copy)]
struct SpatialZone {
    index: usize,
    bounds: Rect,
}

impl RTreeObject for SpatialZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.x0, self.bounds.y0],
            [self.bounds.x1, self.bounds.y1],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Above,
    Below,
}

/// Page-local zone indices of the nearest neighbor in each direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub above: Option<usize>,
    pub below: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct NeighborTable {
    neighbors: Vec<Neighbors>,
}

impl NeighborTable {
    pub fn for_page(doc: &Document, page: PageId, tolerance: f64) -> Self {
        let bounds: Vec<Rect> = doc
            .page(page)
            .zones()
            .iter()
            .map(|zone| doc.zone(*zone).bounds)
            .collect();
        Self::from_bounds(&bounds, tolerance)
    }

    pub fn from_bounds(bounds: &[Rect], tolerance: f64) -> Self {
        let Some(extent) = Rect::union_all(bounds) else {
            return Self::default();
        };
        let rtree = RTree::bulk_load(
            bounds
                .iter()
                .enumerate()
                .map(|(index, bounds)| SpatialZone {
                    index,
                    bounds: *bounds,
                })
                .collect(),
        );

        let neighbors = (0..bounds.len())
            .map(|index| {
                let find = |direction| nearest(&rtree, &extent, bounds, index, direction, tolerance);
                Neighbors {
                    left: find(Direction::Left),
                    right: find(Direction::Right),
                    above: find(Direction::Above),
                    below: find(Direction::Below),
                }
            })
            .collect();

        Self { neighbors }
    }

    pub fn get(&self, index: usize) -> Neighbors {
        self.neighbors.get(index).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

fn search_region(zone: &Rect, extent: &Rect, direction: Direction, eps: f64) -> AABB<[f64; 2]> {
    match direction {
        Direction::Left => AABB::from_corners([extent.x0, zone.y0], [zone.x0 + eps, zone.y1]),
        Direction::Right => AABB::from_corners([zone.x1 - eps, zone.y0], [extent.x1, zone.y1]),
        Direction::Above => AABB::from_corners([zone.x0, extent.y0], [zone.x1, zone.y0 + eps]),
        Direction::Below => AABB::from_corners([zone.x0, zone.y1 - eps], [zone.x1, extent.y1]),
    }
}

/// Gap and shared extent of `other` as seen from `zone`, or `None` when it
/// does not lie in `direction`. The shared extent must be positive, so a zone
/// with zero height has no left or right neighbors and one with zero width
/// has none above or below.
fn placement(zone: &Rect, other: &Rect, direction: Direction, eps: f64) -> Option<(f64, f64)> {
    let (overlap, gap) = match direction {
        Direction::Left if other.x1 <= zone.x0 + eps => (zone.vertical_overlap(other), zone.x0 - other.x1),
        Direction::Right if other.x0 >= zone.x1 - eps => (zone.vertical_overlap(other), other.x0 - zone.x1),
        Direction::Above if other.y1 <= zone.y0 + eps => (zone.horizontal_overlap(other), zone.y0 - other.y1),
        Direction::Below if other.y0 >= zone.y1 - eps => (zone.horizontal_overlap(other), other.y0 - zone.y1),
        _ => return None,
    };
    (overlap > 0.0).then_some((gap, overlap))
}

fn nearest(
    rtree: &RTree<SpatialZone>,
    extent: &Rect,
    bounds: &[Rect],
    index: usize,
    direction: Direction,
    eps: f64,
) -> Option<usize> {
    let zone = &bounds[index];
    rtree
        .locate_in_envelope_intersecting(&search_region(zone, extent, direction, eps))
        .filter(|candidate| candidate.index != index)
        .filter_map(|candidate| {
            placement(zone, &candidate.bounds, direction, eps)
                .map(|(gap, overlap)| (candidate.index, gap, overlap))
        })
        .min_by_key(|(candidate, gap, overlap)| {
            (OrderedFloat(*gap), Reverse(OrderedFloat(*overlap)), *candidate)
        })
        .map(|(candidate, _, _)| candidate)
}
