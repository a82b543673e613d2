//! Packed `0xAARRGGBB` helpers.

/// Pack straight-alpha channels into `0xAARRGGBB`. Channels are masked to 8 bits.
#[inline]
pub const fn pack_argb(a: u32, r: u32, g: u32, b: u32) -> u32 {
    ((a & 0xff) << 24) | ((r & 0xff) << 16) | ((g & 0xff) << 8) | (b & 0xff)
}

/// Unpack `0xAARRGGBB` into `[a, r, g, b]`.
#[inline]
pub const fn unpack_argb(px: u32) -> [u32; 4] {
    [(px >> 24) & 0xff, (px >> 16) & 0xff, (px >> 8) & 0xff, px & 0xff]
}

/// Alpha byte of a packed pixel.
#[inline]
pub const fn alpha(px: u32) -> u32 {
    px >> 24
}

/// Force the alpha byte to 255.
#[inline]
pub const fn opaque(px: u32) -> u32 {
    px | 0xff00_0000
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/argb.rs"]
mod tests;
