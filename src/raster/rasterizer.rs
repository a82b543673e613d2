use crate::foundation::core::PixelRect;
use crate::geometry::scan_bounds::ScanBounds;
use crate::raster::composite::source_over;
use crate::raster::sample::Sampler;

/// Mutable window onto destination pixels, addressed in absolute canvas coordinates.
///
/// Backed either by the destination buffer itself (`rect` = whole canvas) or by a
/// tile-sized staging copy.
pub(crate) struct RasterTarget<'a> {
    data: &'a mut [u32],
    rect: PixelRect,
    stride: usize,
    has_alpha: bool,
}

impl<'a> RasterTarget<'a> {
    pub(crate) fn new(data: &'a mut [u32], rect: PixelRect, stride: usize, has_alpha: bool) -> Self {
        Self {
            data,
            rect,
            stride,
            has_alpha,
        }
    }
}

/// Composite the warped source into `target` over `area`, row span by row span.
///
/// Returns the number of destination pixels visited (sampled, whether or not anything
/// landed on them).
pub(crate) fn rasterize(
    target: &mut RasterTarget<'_>,
    sampler: &Sampler<'_>,
    bounds: &ScanBounds,
    area: PixelRect,
) -> u64 {
    let Some(area) = area.intersect(target.rect) else {
        return 0;
    };
    let (last_x, has_alpha) = (area.right() - 1, target.has_alpha);
    let mut visited = 0u64;

    for y in area.y..area.bottom() {
        let Some((l, r)) = bounds.span(y) else {
            continue;
        };
        let (l, r) = (l.max(area.x), r.min(last_x));
        if l > r {
            continue;
        }
        let row = (y - target.rect.y) as usize * target.stride;
        for x in l..=r {
            visited += 1;
            let Some(s) = sampler.sample(x, y) else {
                continue;
            };
            let i = row + (x - target.rect.x) as usize;
            target.data[i] = source_over(target.data[i], s, has_alpha);
        }
    }
    visited
}

#[cfg(test)]
#[path = "../../tests/unit/raster/rasterizer.rs"]
mod tests;
