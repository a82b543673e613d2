use crate::foundation::core::PixelRect;
use crate::foundation::error::{WarpError, WarpResult};
use crate::geometry::scan_bounds::ScanBounds;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 100;

/// Rectangular unit of parallel work.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Grid-derived id, unique per canvas and stable across warps.
    pub id: u32,
    pub rect: PixelRect,
    /// Outer scan bounds narrowed to this tile's columns.
    pub bounds: ScanBounds,
}

/// Fixed grid of `tile_size` squares aligned to multiples of `tile_size` in canvas space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tile_size: i32,
    columns: u32,
}

impl TileGrid {
    pub fn new(tile_size: u32, canvas_width: u32) -> WarpResult<Self> {
        if tile_size == 0 {
            return Err(WarpError::validation("tile_size must be >= 1"));
        }
        let tile_size = i32::try_from(tile_size)
            .map_err(|_| WarpError::validation("tile_size exceeds i32::MAX"))?;
        Ok(Self {
            tile_size,
            columns: canvas_width.div_ceil(tile_size.unsigned_abs()).max(1),
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size.unsigned_abs()
    }

    /// Id of the grid cell at column `col`, row `row`.
    pub fn tile_id(&self, col: u32, row: u32) -> u32 {
        row.wrapping_mul(self.columns).wrapping_add(col)
    }

    /// Cut `area` along grid lines. Tiles are emitted row-major; their union is exactly
    /// `area` and they never overlap.
    pub fn split(&self, area: PixelRect, bounds: &ScanBounds) -> Vec<Tile> {
        if area.is_empty() {
            return Vec::new();
        }
        let ts = self.tile_size;
        let first_col = area.x.div_euclid(ts);
        let first_row = area.y.div_euclid(ts);
        let last_col = (area.right() - 1).div_euclid(ts);
        let last_row = (area.bottom() - 1).div_euclid(ts);

        let cap = ((last_col - first_col + 1) * (last_row - first_row + 1)).max(0) as usize;
        let mut tiles = Vec::with_capacity(cap);
        for row in first_row..=last_row {
            let y0 = (row * ts).max(area.y);
            let y1 = ((row + 1) * ts).min(area.bottom());
            for col in first_col..=last_col {
                let x0 = (col * ts).max(area.x);
                let x1 = ((col + 1) * ts).min(area.right());
                let Some(rect) = PixelRect::from_edges(x0, y0, x1, y1) else {
                    continue;
                };
                tiles.push(Tile {
                    id: self.tile_id(col.unsigned_abs(), row.unsigned_abs()),
                    rect,
                    bounds: bounds.derive(x0, x1 - 1),
                });
            }
        }
        tiles
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tiles/splitter.rs"]
mod tests;
