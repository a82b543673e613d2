//! Per-row horizontal extents of a destination quad.
//!
//! The rasterizer asks, for each destination row, which columns can possibly be covered by
//! the warped image. `Variable` traces the quad outline so rotated or perspective
//! placements do not pay for their empty bounding-box corners; `Fixed` is the plain
//! rectangle used when the outline cannot be traced.

use std::sync::Arc;

use crate::foundation::core::{Point, Quad};
use crate::foundation::error::{WarpError, WarpResult};
use crate::foundation::math::{ceil_to_i32, floor_to_i32};

/// Chain vertex as `(y, x)`.
pub type EdgePoint = (f64, f64);

/// Inclusive column limits per destination row.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanBounds {
    /// Every row spans `[min_x, max_x]`.
    Fixed { min_x: i32, max_x: i32 },
    /// Rows span the quad outline, clamped to `[min_x, max_x]`.
    ///
    /// Both chains run from the top-most to the bottom-most quad vertex.
    Variable {
        left: Arc<[EdgePoint]>,
        right: Arc<[EdgePoint]>,
        min_x: i32,
        max_x: i32,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn pick(self, a: f64, b: f64) -> f64 {
        match self {
            Side::Left => a.min(b),
            Side::Right => a.max(b),
        }
    }
}

impl ScanBounds {
    pub fn fixed(min_x: i32, max_x: i32) -> Self {
        Self::Fixed { min_x, max_x }
    }

    /// Trace `quad` into left and right edge chains.
    ///
    /// Fails with [`WarpError::DegenerateQuad`] for self-intersecting, non-finite or
    /// zero-height quads; callers substitute [`ScanBounds::fixed`].
    pub fn variable(quad: &Quad, min_x: i32, max_x: i32) -> WarpResult<Self> {
        if !quad.is_finite() {
            return Err(WarpError::degenerate("quad has non-finite corners"));
        }
        if quad.is_self_intersecting() {
            return Err(WarpError::degenerate("opposite quad edges cross"));
        }

        let pts = quad.corners();
        let top = extreme_index(&pts, |a, b| a.y < b.y);
        let bottom = extreme_index(&pts, |a, b| a.y > b.y);
        if pts[top].y == pts[bottom].y {
            return Err(WarpError::degenerate("quad has zero height"));
        }

        let forward = walk(&pts, top, bottom, 1);
        let backward = walk(&pts, top, bottom, 3);

        // Screen space is y-down: a positive shoelace sum means the corners run clockwise
        // on screen, so walking forward from the top vertex follows the right-hand outline.
        let (left, right) = if shoelace(&pts) > 0.0 {
            (backward, forward)
        } else {
            (forward, backward)
        };

        Ok(Self::Variable {
            left: dedup_rows(left, Side::Left).into(),
            right: dedup_rows(right, Side::Right).into(),
            min_x,
            max_x,
        })
    }

    pub fn min_x(&self) -> i32 {
        match self {
            Self::Fixed { min_x, .. } | Self::Variable { min_x, .. } => *min_x,
        }
    }

    pub fn max_x(&self) -> i32 {
        match self {
            Self::Fixed { max_x, .. } | Self::Variable { max_x, .. } => *max_x,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Copy narrowed to `[new_min_x, new_max_x]`. Never widens.
    pub fn derive(&self, new_min_x: i32, new_max_x: i32) -> Self {
        match self {
            Self::Fixed { min_x, max_x } => Self::Fixed {
                min_x: (*min_x).max(new_min_x),
                max_x: (*max_x).min(new_max_x),
            },
            Self::Variable {
                left,
                right,
                min_x,
                max_x,
            } => Self::Variable {
                left: Arc::clone(left),
                right: Arc::clone(right),
                min_x: (*min_x).max(new_min_x),
                max_x: (*max_x).min(new_max_x),
            },
        }
    }

    /// Outline x positions at height `y`, each clamped to `[min_x, max_x]`.
    ///
    /// A side with no edge crossing `y` collapses to `min_x` (left) or `max_x` (right).
    pub fn endpoints(&self, y: f64) -> (f64, f64) {
        let (lo, hi) = (f64::from(self.min_x()), f64::from(self.max_x()));
        match self {
            Self::Fixed { .. } => (lo, hi),
            Self::Variable { left, right, .. } => {
                let l = chain_x(left, y, Side::Left).unwrap_or(lo);
                let r = chain_x(right, y, Side::Right).unwrap_or(hi);
                (l.clamp(lo, hi.max(lo)), r.clamp(lo, hi.max(lo)))
            }
        }
    }

    /// Inclusive pixel columns of row `y` (covering `[y, y+1)`) that may be inside the quad.
    ///
    /// `None` when the row misses the quad or the `[min_x, max_x]` window.
    pub fn span(&self, y: i32) -> Option<(i32, i32)> {
        let (min_x, max_x) = (self.min_x(), self.max_x());
        let (l, r) = match self {
            Self::Fixed { .. } => (min_x, max_x),
            Self::Variable { left, right, .. } => {
                let top = left.first()?.0;
                let bottom = left.last()?.0;
                let (y0, y1) = (f64::from(y), f64::from(y) + 1.0);
                if y1 <= top || y0 >= bottom {
                    return None;
                }
                let (yt, yb) = (y0.max(top), y1.min(bottom));
                let xl = band_x(left, yt, yb, Side::Left)?;
                let xr = band_x(right, yt, yb, Side::Right)?;
                (floor_to_i32(xl), ceil_to_i32(xr).saturating_sub(1))
            }
        };
        let (l, r) = (l.max(min_x), r.min(max_x));
        (l <= r).then_some((l, r))
    }
}

fn extreme_index(pts: &[Point; 4], better: impl Fn(Point, Point) -> bool) -> usize {
    let mut best = 0;
    for (i, p) in pts.iter().enumerate().skip(1) {
        if better(*p, pts[best]) {
            best = i;
        }
    }
    best
}

fn walk(pts: &[Point; 4], from: usize, to: usize, step: usize) -> Vec<EdgePoint> {
    let mut out = Vec::with_capacity(4);
    let mut i = from;
    out.push((pts[i].y, pts[i].x));
    while i != to {
        i = (i + step) % 4;
        out.push((pts[i].y, pts[i].x));
    }
    out
}

fn shoelace(pts: &[Point; 4]) -> f64 {
    (0..4)
        .map(|i| {
            let (a, b) = (pts[i], pts[(i + 1) % 4]);
            a.x * b.y - b.x * a.y
        })
        .sum()
}

// Consecutive vertices on one row collapse into the outermost x for that side.
fn dedup_rows(chain: Vec<EdgePoint>, side: Side) -> Vec<EdgePoint> {
    let mut out: Vec<EdgePoint> = Vec::with_capacity(chain.len());
    for (y, x) in chain {
        match out.last_mut() {
            Some(last) if last.0 == y => last.1 = side.pick(last.1, x),
            _ => out.push((y, x)),
        }
    }
    out
}

// Outermost crossing of the chain with the horizontal line at `y`.
fn chain_x(chain: &[EdgePoint], y: f64, side: Side) -> Option<f64> {
    let mut found: Option<f64> = None;
    for seg in chain.windows(2) {
        let ((y0, x0), (y1, x1)) = (seg[0], seg[1]);
        if y < y0.min(y1) || y > y0.max(y1) {
            continue;
        }
        let x = if y1 == y0 {
            side.pick(x0, x1)
        } else {
            x0 + (x1 - x0) * (y - y0) / (y1 - y0)
        };
        found = Some(found.map_or(x, |f| side.pick(f, x)));
    }
    found
}

// Outermost chain x over the band `[yt, yb]`: both band edges plus any vertex inside it.
fn band_x(chain: &[EdgePoint], yt: f64, yb: f64, side: Side) -> Option<f64> {
    let mut x = side.pick(chain_x(chain, yt, side)?, chain_x(chain, yb, side)?);
    for &(vy, vx) in chain {
        if vy > yt && vy < yb {
            x = side.pick(x, vx);
        }
    }
    Some(x)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/scan_bounds.rs"]
mod tests;
