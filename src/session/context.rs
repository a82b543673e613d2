use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::foundation::core::{PixelRect, Point, Quad};
use crate::foundation::error::{WarpError, WarpResult};
use crate::geometry::matrix::Matrix;
use crate::geometry::scan_bounds::ScanBounds;
use crate::pixels::buffer::{PixelBuffer, PixelView};
use crate::raster::options::{Interpolation, RenderingHints, RenderingOptions};
use crate::raster::rasterizer::{RasterTarget, rasterize};
use crate::raster::sample::Sampler;
use crate::tiles::scheduler::{DEFAULT_CLAIM_WAIT, TileScheduler};
use crate::tiles::splitter::{DEFAULT_TILE_SIZE, Tile, TileGrid};

/// Context configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContextOpts {
    /// Worker threads in the context's pool. `0` renders on the calling thread.
    pub workers: usize,
    /// Tile edge in pixels; must be >= 1.
    pub tile_size: u32,
    /// How long an idle worker parks before re-checking the tile queue.
    pub claim_wait: Duration,
    /// Upper bound on how long `dispose()` waits for pool threads to exit.
    pub dispose_timeout: Duration,
}

impl Default for ContextOpts {
    fn default() -> Self {
        Self {
            workers: 6,
            tile_size: DEFAULT_TILE_SIZE,
            claim_wait: DEFAULT_CLAIM_WAIT,
            dispose_timeout: Duration::from_secs(60 * 60),
        }
    }
}

impl ContextOpts {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }
}

/// What one `warp()` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WarpStats {
    pub tiles_total: u64,
    pub tiles_rendered: u64,
    /// Destination pixels inside the scan bounds that were sampled.
    pub pixels_visited: u64,
    /// The quad outline could not be traced; whole bounding-box rows were scanned.
    pub fixed_bounds_fallback: bool,
}

/// Warp-and-composite session over one destination buffer.
///
/// Owns the destination and, when `workers > 0`, a fixed rayon pool that every
/// [`warp`](Self::warp) fans out to. Calls on one context are serialized by `&mut self`.
pub struct WarpContext {
    destination: PixelBuffer,
    opts: ContextOpts,
    hints: RenderingHints,
    grid: TileGrid,
    pool: Option<WorkerPool>,
    disposed: bool,
}

impl std::fmt::Debug for WarpContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarpContext")
            .field("width", &self.destination.width())
            .field("height", &self.destination.height())
            .field("opts", &self.opts)
            .field("hints", &self.hints)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl WarpContext {
    pub fn create(destination: PixelBuffer, opts: ContextOpts) -> WarpResult<Self> {
        let grid = TileGrid::new(opts.tile_size, destination.width())?;
        let pool = match opts.workers {
            0 => None,
            n => Some(WorkerPool::build(n)?),
        };
        tracing::debug!(
            width = destination.width(),
            height = destination.height(),
            workers = opts.workers,
            tile_size = opts.tile_size,
            "warp context created"
        );
        Ok(Self {
            destination,
            opts,
            hints: RenderingHints::default(),
            grid,
            pool,
            disposed: false,
        })
    }

    pub fn options(&self) -> &ContextOpts {
        &self.opts
    }

    pub fn rendering_hints(&self) -> RenderingHints {
        self.hints
    }

    pub fn rendering_options(&self) -> RenderingOptions {
        self.hints.resolve()
    }

    pub fn set_interpolation_hint(&mut self, interpolation: Interpolation) -> WarpResult<()> {
        self.ensure_live()?;
        self.hints.interpolation = Some(interpolation);
        Ok(())
    }

    pub fn set_rendering_hints(&mut self, hints: RenderingHints) -> WarpResult<()> {
        self.ensure_live()?;
        self.hints = hints;
        Ok(())
    }

    pub fn destination(&self) -> &PixelBuffer {
        &self.destination
    }

    pub fn destination_mut(&mut self) -> &mut PixelBuffer {
        &mut self.destination
    }

    /// Dispose the context and hand back the destination.
    pub fn into_destination(mut self) -> PixelBuffer {
        self.dispose();
        let format = self.destination.format();
        std::mem::replace(&mut self.destination, PixelBuffer::new(0, 0, format))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Warp `src` onto the quad `top_left, top_right, bottom_right, bottom_left` and
    /// composite it source-over into the destination.
    ///
    /// Degenerate quads never fail: untraceable outlines scan the whole bounding box,
    /// a singular projective system falls back to an affine fit, and if that is singular
    /// too nothing is drawn.
    pub fn warp(
        &mut self,
        src: PixelView<'_>,
        top_left: Point,
        top_right: Point,
        bottom_right: Point,
        bottom_left: Point,
    ) -> WarpResult<WarpStats> {
        self.warp_quad(src, &Quad::new(top_left, top_right, bottom_right, bottom_left))
    }

    #[tracing::instrument(
        skip_all,
        fields(
            quad = ?quad,
            src_w = src.width(),
            src_h = src.height(),
            interpolation = ?self.hints.resolve().interpolation,
        )
    )]
    pub fn warp_quad(&mut self, src: PixelView<'_>, quad: &Quad) -> WarpResult<WarpStats> {
        self.ensure_live()?;
        let mut stats = WarpStats::default();

        if src.width() == 0 || src.height() == 0 {
            tracing::debug!("empty source; nothing to draw");
            return Ok(stats);
        }
        if !quad.is_finite() {
            tracing::warn!("quad has non-finite corners; nothing drawn");
            return Ok(stats);
        }
        let Some(area) = quad.pixel_bounds(self.destination.width(), self.destination.height(), 1)
        else {
            tracing::debug!("quad misses the destination");
            return Ok(stats);
        };

        let Some(matrix) = transform_for(&src, quad) else {
            return Ok(stats);
        };
        let bounds = match ScanBounds::variable(quad, area.x, area.right() - 1) {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(error = %e, "scanning full bounding box");
                stats.fixed_bounds_fallback = true;
                ScanBounds::fixed(area.x, area.right() - 1)
            }
        };

        let sampler = Sampler::new(src, matrix, self.hints.resolve().interpolation);
        let has_alpha = self.destination.has_alpha();
        let stride = self.destination.stride();

        match &self.pool {
            None => {
                let canvas = canvas_rect(&self.destination);
                let mut target = RasterTarget::new(self.destination.data_mut(), canvas, stride, has_alpha);
                stats.tiles_total = 1;
                stats.tiles_rendered = 1;
                stats.pixels_visited = rasterize(&mut target, &sampler, &bounds, area);
            }
            Some(pool) => {
                let tiles = self.grid.split(area, &bounds);
                stats.tiles_total = tiles.len() as u64;
                let fanout = pool.threads.min(tiles.len());
                tracing::debug!(tiles = tiles.len(), workers = fanout, "dispatching tiles");

                let scheduler = TileScheduler::new(tiles, self.opts.claim_wait);
                let band_rows = self.grid.tile_size() as usize;
                let bands = Bands::new(self.destination.data_mut(), stride, band_rows);
                let rendered = AtomicU64::new(0);
                let visited = AtomicU64::new(0);
                let job = TileJob {
                    sampler: &sampler,
                    bands: &bands,
                    stride,
                    has_alpha,
                };

                pool.pool.scope(|s| {
                    for _ in 0..fanout {
                        s.spawn(|_| {
                            while let Some(tile) = scheduler.claim() {
                                visited.fetch_add(job.render(&tile), Ordering::Relaxed);
                                rendered.fetch_add(1, Ordering::Relaxed);
                                scheduler.release(tile.id);
                            }
                        });
                    }
                });
                debug_assert!(scheduler.is_drained());

                stats.tiles_rendered = rendered.into_inner();
                stats.pixels_visited = visited.into_inner();
            }
        }

        tracing::debug!(
            tiles = stats.tiles_rendered,
            pixels = stats.pixels_visited,
            "warp finished"
        );
        Ok(stats)
    }

    /// Shut the worker pool down. Idempotent.
    ///
    /// No warp can be in flight here, so this only waits for the pool threads to exit,
    /// bounded by [`ContextOpts::dispose_timeout`].
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(pool) = self.pool.take() {
            pool.shutdown(self.opts.dispose_timeout);
        }
        tracing::debug!("warp context disposed");
    }

    fn ensure_live(&self) -> WarpResult<()> {
        if self.disposed {
            return Err(WarpError::Disposed);
        }
        Ok(())
    }
}

impl Drop for WarpContext {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn canvas_rect(buf: &PixelBuffer) -> PixelRect {
    PixelRect::new(
        0,
        0,
        i32::try_from(buf.width()).unwrap_or(i32::MAX),
        i32::try_from(buf.height()).unwrap_or(i32::MAX),
    )
}

fn transform_for(src: &PixelView<'_>, quad: &Quad) -> Option<Matrix> {
    let err = match Matrix::from_rect_to_quad(src.width(), src.height(), quad) {
        Ok(m) => return Some(m),
        Err(e) => e,
    };
    tracing::warn!(error = %err, "projective transform is singular; trying affine fit");
    match Matrix::affine_from_corners(src.width(), src.height(), quad) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = %e, "no usable transform; nothing drawn");
            None
        }
    }
}

/// Destination rows grouped into tile-high bands, each behind its own lock.
///
/// Tiles are aligned to the band grid, so a tile touches exactly one band and tiles in
/// the same band cover disjoint columns.
struct Bands<'a> {
    rows: usize,
    bands: Vec<Mutex<&'a mut [u32]>>,
}

impl<'a> Bands<'a> {
    fn new(data: &'a mut [u32], stride: usize, rows: usize) -> Self {
        let chunk = stride.saturating_mul(rows).max(1);
        Self {
            rows,
            bands: data.chunks_mut(chunk).map(Mutex::new).collect(),
        }
    }

    // Copy rows of `rect` between the band and a packed `rect.width`-stride buffer.
    fn transfer(&self, rect: PixelRect, stride: usize, staging: &mut [u32], load: bool) {
        let y0 = rect.y as usize;
        let band_idx = y0 / self.rows;
        let Some(band) = self.bands.get(band_idx) else {
            return;
        };
        let mut band = band.lock().unwrap_or_else(PoisonError::into_inner);
        let w = rect.width as usize;
        let local_y = y0 - band_idx * self.rows;
        for (r, packed) in staging.chunks_mut(w).enumerate() {
            let off = (local_y + r) * stride + rect.x as usize;
            let row = &mut band[off..off + w];
            if load {
                packed.copy_from_slice(row);
            } else {
                row.copy_from_slice(packed);
            }
        }
    }
}

struct TileJob<'s, 'b, 'd> {
    sampler: &'s Sampler<'s>,
    bands: &'b Bands<'d>,
    stride: usize,
    has_alpha: bool,
}

impl TileJob<'_, '_, '_> {
    // Rasterize into a private copy of the tile so the band lock is only held while
    // copying.
    fn render(&self, tile: &Tile) -> u64 {
        let rect = tile.rect;
        let mut staging = vec![0u32; rect.area() as usize];
        self.bands.transfer(rect, self.stride, &mut staging, true);
        let visited = {
            let mut target = RasterTarget::new(&mut staging, rect, rect.width as usize, self.has_alpha);
            rasterize(&mut target, self.sampler, &tile.bounds, rect)
        };
        if visited > 0 {
            self.bands.transfer(rect, self.stride, &mut staging, false);
        }
        tracing::trace!(tile = tile.id, visited, "tile rendered");
        visited
    }
}

/// Rayon pool plus a count of its live threads, so shutdown can wait for them.
struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
    live: Arc<(Mutex<usize>, Condvar)>,
}

impl WorkerPool {
    fn build(threads: usize) -> WarpResult<Self> {
        let live = Arc::new((Mutex::new(threads), Condvar::new()));
        let on_exit = Arc::clone(&live);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("quadwarp-worker-{i}"))
            .exit_handler(move |_| {
                let (count, exited) = &*on_exit;
                let mut n = count.lock().unwrap_or_else(PoisonError::into_inner);
                *n = n.saturating_sub(1);
                exited.notify_all();
            })
            .build()
            .map_err(|e| WarpError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))?;
        Ok(Self {
            pool,
            threads,
            live,
        })
    }

    fn shutdown(self, timeout: Duration) {
        let Self { pool, live, .. } = self;
        drop(pool);
        let (count, exited) = &*live;
        let guard = count.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, res) = exited
            .wait_timeout_while(guard, timeout, |n| *n > 0)
            .unwrap_or_else(PoisonError::into_inner);
        if res.timed_out() {
            tracing::warn!(remaining = *guard, "worker threads still running after dispose timeout");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/context.rs"]
mod tests;
