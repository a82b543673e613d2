//! Source resampling for one destination pixel.
//!
//! All modes evaluate the inverse transform at points inside the destination pixel
//! `[x, x+1) x [y, y+1)` and read source pixel `(floor(u), floor(v))`, so source pixel
//! centers sit at half-integer coordinates. Points mapping outside the source contribute
//! nothing.

use crate::foundation::core::Point;
use crate::geometry::matrix::Matrix;
use crate::pixels::argb::unpack_argb;
use crate::pixels::buffer::PixelView;
use crate::raster::composite::Sample;
use crate::raster::options::Interpolation;

/// Reads the source through the inverse transform.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sampler<'a> {
    src: PixelView<'a>,
    matrix: Matrix,
    interpolation: Interpolation,
    width: f64,
    height: f64,
    has_alpha: bool,
}

impl<'a> Sampler<'a> {
    pub(crate) fn new(src: PixelView<'a>, matrix: Matrix, interpolation: Interpolation) -> Self {
        Self {
            src,
            matrix,
            interpolation,
            width: f64::from(src.width()),
            height: f64::from(src.height()),
            has_alpha: src.has_alpha(),
        }
    }

    /// Filtered `[a, r, g, b]` for destination pixel `(x, y)`, or `None` if nothing of
    /// the source lands on it.
    #[inline]
    pub(crate) fn sample(&self, x: i32, y: i32) -> Option<Sample> {
        match self.interpolation {
            Interpolation::NearestNeighbor => self.nearest(x, y),
            Interpolation::Bilinear => self.box_filter(x, y, 2),
            Interpolation::Bicubic => self.box_filter(x, y, 4),
            Interpolation::CubicConvolution => self.cubic(x, y),
        }
    }

    #[inline]
    fn source_point(&self, x: f64, y: f64) -> Point {
        self.matrix.apply_inverse(Point::new(x, y))
    }

    // Comparisons are written so NaN fails them.
    #[inline]
    fn fetch(&self, p: Point) -> Option<u32> {
        if !(p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height) {
            return None;
        }
        Some(self.src.pixel(p.x as usize, p.y as usize))
    }

    fn nearest(&self, x: i32, y: i32) -> Option<Sample> {
        let p = self.source_point(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let [a, r, g, b] = unpack_argb(self.fetch(p)?);
        Some([if self.has_alpha { a } else { 255 }, r, g, b])
    }

    // Unweighted mean over an n x n grid of sub-samples. Without source alpha the
    // in-bounds fraction becomes the alpha, which softens the quad boundary.
    fn box_filter(&self, x: i32, y: i32, n: u32) -> Option<Sample> {
        let step = 1.0 / f64::from(n);
        let (x0, y0) = (f64::from(x) + step * 0.5, f64::from(y) + step * 0.5);
        let mut sum = [0u32; 4];
        let mut samples = 0u32;
        for j in 0..n {
            let sy = y0 + f64::from(j) * step;
            for i in 0..n {
                let sx = x0 + f64::from(i) * step;
                let Some(px) = self.fetch(self.source_point(sx, sy)) else {
                    continue;
                };
                for (acc, c) in sum.iter_mut().zip(unpack_argb(px)) {
                    *acc += c;
                }
                samples += 1;
            }
        }
        if samples == 0 {
            return None;
        }
        let a = if self.has_alpha {
            sum[0] / samples
        } else {
            255 * samples / (n * n)
        };
        Some([a, sum[1] / samples, sum[2] / samples, sum[3] / samples])
    }

    // Catmull-Rom over the 4x4 neighbourhood, clamped to the source edge, weighted by
    // alpha so transparent neighbours do not bleed their colour.
    fn cubic(&self, x: i32, y: i32) -> Option<Sample> {
        let p = self.source_point(f64::from(x) + 0.5, f64::from(y) + 0.5);
        self.fetch(p)?;

        let (fx, fy) = (p.x - 0.5, p.y - 0.5);
        let (ix, iy) = (fx.floor(), fy.floor());
        let wx = catmull_rom_weights(fx - ix);
        let wy = catmull_rom_weights(fy - iy);
        let max_x = self.src.width() as i64 - 1;
        let max_y = self.src.height() as i64 - 1;

        let mut acc = [0.0f64; 4];
        for (j, wyj) in wy.iter().enumerate() {
            let sy = (iy as i64 - 1 + j as i64).clamp(0, max_y) as usize;
            for (i, wxi) in wx.iter().enumerate() {
                let sx = (ix as i64 - 1 + i as i64).clamp(0, max_x) as usize;
                let [a, r, g, b] = unpack_argb(self.src.pixel(sx, sy));
                let a = if self.has_alpha { f64::from(a) } else { 255.0 };
                let w = wxi * wyj;
                acc[0] += w * a;
                acc[1] += w * a * f64::from(r);
                acc[2] += w * a * f64::from(g);
                acc[3] += w * a * f64::from(b);
            }
        }

        let a = acc[0].clamp(0.0, 255.0);
        if a <= 0.0 {
            return Some([0, 0, 0, 0]);
        }
        let channel = |v: f64| (v / acc[0]).round().clamp(0.0, 255.0) as u32;
        Some([a.round() as u32, channel(acc[1]), channel(acc[2]), channel(acc[3])])
    }
}

/// Catmull-Rom (`a = -0.5`) weights for taps at offsets -1, 0, 1, 2 from `floor(x)`.
pub(crate) fn catmull_rom_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/raster/sample.rs"]
mod tests;
