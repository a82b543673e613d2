//! quadwarp warps a raster image onto an arbitrary destination quadrilateral and
//! composites it into a packed-ARGB destination buffer.
//!
//! The API is context-oriented:
//!
//! - Create a [`WarpContext`] over a destination [`PixelBuffer`]
//! - Call [`WarpContext::warp`] with a source [`PixelView`] and four destination corners
//! - [`WarpContext::dispose`] (or drop) the context to shut its worker pool down
//!
//! Pixels are `0xAARRGGBB` `u32`s with straight (non-premultiplied) alpha. Pixel `(x, y)`
//! covers `[x, x+1) x [y, y+1)` in destination space.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod geometry;
pub(crate) mod pixels;
pub(crate) mod raster;
pub(crate) mod session;
pub(crate) mod tiles;

pub use crate::foundation::core::{PixelRect, Point, Quad, Rect};
pub use crate::foundation::error::{WarpError, WarpResult};

pub use crate::geometry::matrix::{Matrix, source_corners};
pub use crate::geometry::scan_bounds::{EdgePoint, ScanBounds};
pub use crate::pixels::argb::{alpha, opaque, pack_argb, unpack_argb};
pub use crate::pixels::buffer::{PixelBuffer, PixelFormat, PixelView};
pub use crate::raster::composite::{Sample, source_over};
pub use crate::raster::options::{
    AntialiasHint, Interpolation, QualityHint, RenderingHints, RenderingOptions,
};
pub use crate::session::context::{ContextOpts, WarpContext, WarpStats};
pub use crate::tiles::scheduler::{DEFAULT_CLAIM_WAIT, TileScheduler};
pub use crate::tiles::splitter::{DEFAULT_TILE_SIZE, Tile, TileGrid};
