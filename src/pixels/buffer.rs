use crate::foundation::error::{WarpError, WarpResult};
use crate::pixels::argb::{opaque, pack_argb, unpack_argb};

/// Channel layout of a packed `u32` raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// `0xAARRGGBB`, straight (non-premultiplied) alpha.
    #[default]
    Argb,
    /// `0x__RRGGBB`; the alpha byte is ignored and read as 255.
    Rgb,
}

impl PixelFormat {
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Argb)
    }
}

/// Owned packed-pixel raster with an explicit row stride (in pixels).
///
/// Used as the warp destination. Rows may be padded (`stride > width`), which lets a
/// buffer stand for a sub-image of a larger allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u32>,
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl PixelBuffer {
    /// Zero-filled (transparent black) buffer with `stride == width`.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self::filled(width, height, format, 0)
    }

    /// Buffer with every pixel set to `argb`.
    pub fn filled(width: u32, height: u32, format: PixelFormat, argb: u32) -> Self {
        let len = (width as usize).saturating_mul(height as usize);
        Self {
            data: vec![argb; len],
            width,
            height,
            stride: width as usize,
            format,
        }
    }

    /// Wrap existing pixel storage.
    ///
    /// `data` must hold at least `stride * (height - 1) + width` pixels.
    pub fn from_raw(
        data: Vec<u32>,
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> WarpResult<Self> {
        validate_geometry(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Build an `Argb` buffer from a straight-alpha RGBA8 image.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let data = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                pack_argb(a.into(), r.into(), g.into(), b.into())
            })
            .collect();
        Self {
            data,
            width: img.width(),
            height: img.height(),
            stride: img.width() as usize,
            format: PixelFormat::Argb,
        }
    }

    /// Copy into a straight-alpha RGBA8 image. `Rgb` buffers come out opaque.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        self.view().to_rgba_image()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn has_alpha(&self) -> bool {
        self.format.has_alpha()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        self.view().get(x, y)
    }

    pub fn set(&mut self, x: u32, y: u32, argb: u32) {
        if x < self.width && y < self.height {
            let i = y as usize * self.stride + x as usize;
            self.data[i] = argb;
        }
    }

    /// The visible `width` pixels of row `y`.
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.width as usize]
    }

    /// Raw storage including row padding.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u32> {
        self.data
    }

    /// Read-only view of the whole buffer.
    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
        }
    }
}

/// Borrowed, read-only packed-pixel raster.
///
/// Used as the warp source; `Copy` and `Sync`, so every worker reads the same pixels
/// without copying.
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    data: &'a [u32],
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> PixelView<'a> {
    pub fn new(
        data: &'a [u32],
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> WarpResult<Self> {
        validate_geometry(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// View of the `width` x `height` region at `(x, y)`, sharing this view's stride.
    pub fn sub_view(&self, x: u32, y: u32, width: u32, height: u32) -> WarpResult<PixelView<'a>> {
        let fits_x = x.checked_add(width).is_some_and(|r| r <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits_x || !fits_y {
            return Err(WarpError::validation(format!(
                "sub_view {width}x{height}+{x}+{y} exceeds {}x{} view",
                self.width, self.height
            )));
        }
        let start = (y as usize * self.stride + x as usize).min(self.data.len());
        PixelView::new(
            &self.data[start..],
            width,
            height,
            self.stride,
            self.format,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn has_alpha(&self) -> bool {
        self.format.has_alpha()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixel(x as usize, y as usize))
    }

    /// Pixel at `(x, y)`; the caller has already bounds-checked.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> u32 {
        self.data[y * self.stride + x]
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let has_alpha = self.has_alpha();
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let px = self.pixel(x as usize, y as usize);
            let px = if has_alpha { px } else { opaque(px) };
            let [a, r, g, b] = unpack_argb(px);
            image::Rgba([r as u8, g as u8, b as u8, a as u8])
        })
    }
}

fn validate_geometry(len: usize, width: u32, height: u32, stride: usize) -> WarpResult<()> {
    if stride < width as usize {
        return Err(WarpError::validation(format!(
            "stride {stride} is smaller than width {width}"
        )));
    }
    if width == 0 || height == 0 {
        return Ok(());
    }
    let needed = stride
        .checked_mul(height as usize - 1)
        .and_then(|v| v.checked_add(width as usize))
        .ok_or_else(|| WarpError::validation("pixel buffer size overflows usize"))?;
    if len < needed {
        return Err(WarpError::validation(format!(
            "pixel data holds {len} pixels, {width}x{height} at stride {stride} needs {needed}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/buffer.rs"]
mod tests;
