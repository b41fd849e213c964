use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// `self` contains `inner` when every edge of `inner` lies inside `self`,
    /// allowing each edge to stick out by at most `tolerance`.
    pub fn contains(&self, inner: &Rect, tolerance: f64) -> bool {
        self.x0 <= inner.x0 + tolerance
            && self.y0 <= inner.y0 + tolerance
            && self.x1 >= inner.x1 - tolerance
            && self.y1 >= inner.y1 - tolerance
    }

    pub fn is_similar_to(&self, other: &Rect, tolerance: f64) -> bool {
        (self.x0 - other.x0).abs() <= tolerance
            && (self.y0 - other.y0).abs() <= tolerance
            && (self.width() - other.width()).abs() <= tolerance
            && (self.height() - other.height()).abs() <= tolerance
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Bounding box of all rects, `None` for an empty iterator.
    pub fn union_all<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc: Option<Rect>, r| match acc {
            Some(a) => Some(a.union(r)),
            None => Some(*r),
        })
    }

    /// Length of the shared y-range, negative when the rects are apart.
    pub fn vertical_overlap(&self, other: &Rect) -> f64 {
        self.y1.min(other.y1) - self.y0.max(other.y0)
    }

    /// Length of the shared x-range, negative when the rects are apart.
    pub fn horizontal_overlap(&self, other: &Rect) -> f64 {
        self.x1.min(other.x1) - self.x0.max(other.x0)
    }
}
