pub use kurbo::{Point, Rect};

use crate::foundation::math::{ceil_to_i32, floor_to_i32};

/// Destination quadrilateral, corners in drawing order.
///
/// Corners are given in destination pixel space where pixel `(x, y)` covers
/// `[x, x+1) x [y, y+1)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Axis-aligned quad covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            top_left: Point::new(rect.x0, rect.y0),
            top_right: Point::new(rect.x1, rect.y0),
            bottom_right: Point::new(rect.x1, rect.y1),
            bottom_left: Point::new(rect.x0, rect.y1),
        }
    }

    /// Corners in polygon order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Smallest axis-aligned rectangle containing all four corners.
    pub fn bounds(&self) -> Rect {
        let [a, b, c, d] = self.corners();
        Rect::from_points(a, b).union_pt(c).union_pt(d)
    }

    /// `true` when a pair of opposite edges crosses (the polygon is not simple).
    pub fn is_self_intersecting(&self) -> bool {
        let [a, b, c, d] = self.corners();
        segments_cross(a, b, c, d) || segments_cross(b, c, d, a)
    }

    /// `true` when every corner is finite.
    pub fn is_finite(&self) -> bool {
        self.corners()
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Integer pixel rectangle touched by this quad on a `width` x `height` canvas.
    ///
    /// The rectangle is grown by `pad` pixels on every side and clamped to the canvas.
    /// Returns `None` when nothing of the quad lands on the canvas.
    pub fn pixel_bounds(&self, width: u32, height: u32, pad: i32) -> Option<PixelRect> {
        let b = self.bounds();
        let canvas = PixelRect::new(0, 0, to_i32(width), to_i32(height));
        let x0 = floor_to_i32(b.x0).saturating_sub(pad);
        let y0 = floor_to_i32(b.y0).saturating_sub(pad);
        let x1 = ceil_to_i32(b.x1).saturating_add(pad);
        let y1 = ceil_to_i32(b.y1).saturating_add(pad);
        let rect = PixelRect::from_edges(x0, y0, x1, y1)?;
        rect.intersect(canvas)
    }
}

/// Integer, half-open pixel rectangle `[x, x+width) x [y, y+height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from exclusive edges; `None` if the result would be empty.
    pub fn from_edges(x0: i32, y0: i32, x1: i32, y1: i32) -> Option<Self> {
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Exclusive right edge.
    pub fn right(self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        u64::from(self.width.unsigned_abs()) * u64::from(self.height.unsigned_abs())
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        Self::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a - o).cross(b - o)
}

// Proper crossing only: shared endpoints and collinear overlaps do not count.
fn segments_cross(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
