use kurbo::Affine;

use crate::foundation::core::{Point, Quad};
use crate::foundation::error::{WarpError, WarpResult};
use crate::foundation::math::{adjugate3, det3, mul3, mul3v};

const SINGULAR_EPS: f64 = 1e-10;

/// Homogeneous 3x3 projective transform, stored together with its inverse.
///
/// Row-major, column-vector convention: `p' = M * (x, y, 1)`, normalized by `w`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    forward: [[f64; 3]; 3],
    inverse: [[f64; 3]; 3],
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        forward: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        inverse: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Projective transform taking `src[i]` to `dst[i]` for all four corners.
    ///
    /// Fails with [`WarpError::DegenerateQuad`] when three points of either quad are
    /// collinear (or coincide). Non-convex quads are accepted.
    pub fn from_quad_to_quad(src: [Point; 4], dst: [Point; 4]) -> WarpResult<Self> {
        let src_basis = basis_to_points(src).map_err(|e| prefix(e, "source"))?;
        let dst_basis = basis_to_points(dst).map_err(|e| prefix(e, "destination"))?;
        Ok(Self {
            forward: normalized(mul3(&dst_basis, &adjugate3(&src_basis))),
            inverse: normalized(mul3(&src_basis, &adjugate3(&dst_basis))),
        })
    }

    /// Transform placing a `width` x `height` source image onto `quad`.
    pub fn from_rect_to_quad(width: u32, height: u32, quad: &Quad) -> WarpResult<Self> {
        Self::from_quad_to_quad(source_corners(width, height), quad.corners())
    }

    /// Affine fit through `top_left`, `top_right` and `bottom_left` only.
    ///
    /// `bottom_right` is ignored, so the source lands on a parallelogram.
    pub fn affine_from_corners(width: u32, height: u32, quad: &Quad) -> WarpResult<Self> {
        if width == 0 || height == 0 {
            return Err(WarpError::degenerate("source image is empty"));
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let ex = (quad.top_right - quad.top_left) / w;
        let ey = (quad.bottom_left - quad.top_left) / h;
        let affine = Affine::new([ex.x, ex.y, ey.x, ey.y, quad.top_left.x, quad.top_left.y]);
        let det = affine.determinant();
        if !det.is_finite() || det.abs() <= SINGULAR_EPS {
            return Err(WarpError::degenerate(
                "top_left, top_right and bottom_left are collinear",
            ));
        }
        Ok(Self {
            forward: affine_rows(affine),
            inverse: affine_rows(affine.inverse()),
        })
    }

    pub fn forward(&self) -> &[[f64; 3]; 3] {
        &self.forward
    }

    pub fn inverse(&self) -> &[[f64; 3]; 3] {
        &self.inverse
    }

    /// Map a source-image point into destination space.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        project(&self.forward, p)
    }

    /// Map a destination point back into source-image space.
    ///
    /// Evaluated once per destination sample. Points on the vanishing line come back
    /// non-finite; callers bounds-check with comparisons that reject NaN.
    #[inline]
    pub fn apply_inverse(&self, p: Point) -> Point {
        project(&self.inverse, p)
    }
}

/// Corners of a `width` x `height` image in quad order.
pub fn source_corners(width: u32, height: u32) -> [Point; 4] {
    let (w, h) = (f64::from(width), f64::from(height));
    [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ]
}

#[inline]
fn project(m: &[[f64; 3]; 3], p: Point) -> Point {
    let [x, y, w] = mul3v(m, [p.x, p.y, 1.0]);
    Point::new(x / w, y / w)
}

// Matrix taking the projective basis (e1, e2, e3, (1,1,1)) onto the four points.
fn basis_to_points(p: [Point; 4]) -> WarpResult<[[f64; 3]; 3]> {
    let [a, b, c, d] = p;
    let m = [[a.x, b.x, c.x], [a.y, b.y, c.y], [1.0, 1.0, 1.0]];

    let scale = p
        .iter()
        .fold(1.0_f64, |acc, q| acc.max(q.x.abs()).max(q.y.abs()));
    let det = det3(&m);
    if !det.is_finite() || det.abs() <= SINGULAR_EPS * scale * scale {
        return Err(WarpError::degenerate(
            "first three corners are collinear or coincide",
        ));
    }

    let adj = adjugate3(&m);
    let k = mul3v(&adj, [d.x, d.y, 1.0]).map(|v| v / det);
    if k.iter().any(|v| !v.is_finite() || v.abs() <= SINGULAR_EPS) {
        return Err(WarpError::degenerate(
            "fourth corner is collinear with two others",
        ));
    }

    Ok([
        [m[0][0] * k[0], m[0][1] * k[1], m[0][2] * k[2]],
        [m[1][0] * k[0], m[1][1] * k[1], m[1][2] * k[2]],
        [m[2][0] * k[0], m[2][1] * k[1], m[2][2] * k[2]],
    ])
}

fn normalized(m: [[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let s = m[2][2];
    if s == 0.0 || !s.is_finite() {
        return m;
    }
    m.map(|row| row.map(|v| v / s))
}

fn affine_rows(a: Affine) -> [[f64; 3]; 3] {
    let [a0, a1, a2, a3, a4, a5] = a.as_coeffs();
    [[a0, a2, a4], [a1, a3, a5], [0.0, 0.0, 1.0]]
}

fn prefix(err: WarpError, which: &str) -> WarpError {
    match err {
        WarpError::DegenerateQuad(msg) => WarpError::degenerate(format!("{which} quad: {msg}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/matrix.rs"]
mod tests;
