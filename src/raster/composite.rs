use crate::foundation::math::clamp255;
use crate::pixels::argb::{alpha, pack_argb, unpack_argb};

/// Straight-alpha sample `[a, r, g, b]`, each channel in `0..=255`.
pub type Sample = [u32; 4];

/// Source-over `src` onto the packed destination pixel `dst`, integer math throughout.
///
/// An opaque sample replaces the destination and a fully transparent one leaves it
/// untouched. Destinations without alpha read as opaque.
#[inline]
pub fn source_over(dst: u32, src: Sample, dst_has_alpha: bool) -> u32 {
    let [sa, sr, sg, sb] = src;
    if sa >= 255 {
        return pack_argb(255, clamp255(sr), clamp255(sg), clamp255(sb));
    }
    if sa == 0 {
        return dst;
    }

    let da = if dst_has_alpha { alpha(dst) } else { 255 };
    let src_w = sa * 255;
    let dst_w = da * (255 - sa);
    let res_a = src_w + dst_w;
    if res_a == 0 {
        return dst;
    }

    let [_, dr, dg, db] = unpack_argb(dst);
    let mix = |s: u32, d: u32| clamp255((s * src_w + d * dst_w) / res_a);
    pack_argb(
        clamp255(res_a / 255),
        mix(sr, dr),
        mix(sg, dg),
        mix(sb, db),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
