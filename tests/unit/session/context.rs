use super::*;
use crate::pixels::buffer::PixelFormat;

fn canvas(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::filled(w, h, PixelFormat::Argb, 0xff00_0000)
}

#[test]
fn default_opts() {
    let opts = ContextOpts::default();
    assert_eq!(opts.workers, 6);
    assert_eq!(opts.tile_size, 100);
    assert_eq!(opts.claim_wait, Duration::from_secs(1));
    assert_eq!(opts.dispose_timeout, Duration::from_secs(3600));
}

#[test]
fn opts_deserialize_with_defaults() {
    let opts: ContextOpts = serde_json::from_str(r#"{"workers":2}"#).unwrap();
    assert_eq!(opts.workers, 2);
    assert_eq!(opts.tile_size, 100);
}

#[test]
fn zero_tile_size_is_rejected() {
    let err = WarpContext::create(canvas(4, 4), ContextOpts::default().with_tile_size(0)).unwrap_err();
    assert!(matches!(err, WarpError::Validation(_)));
}

#[test]
fn disposed_context_rejects_operations() {
    let src = PixelBuffer::filled(1, 1, PixelFormat::Argb, 0xffff_ffff);
    let mut ctx = WarpContext::create(canvas(4, 4), ContextOpts::default().with_workers(2)).unwrap();
    ctx.dispose();
    ctx.dispose();
    assert!(ctx.is_disposed());

    let p = Point::new(0.0, 0.0);
    assert!(matches!(ctx.warp(src.view(), p, p, p, p), Err(WarpError::Disposed)));
    assert!(matches!(
        ctx.set_interpolation_hint(Interpolation::Bicubic),
        Err(WarpError::Disposed)
    ));
    assert!(matches!(
        ctx.set_rendering_hints(RenderingHints::default()),
        Err(WarpError::Disposed)
    ));
    // the destination stays readable
    assert_eq!(ctx.destination().get(0, 0), Some(0xff00_0000));
}

#[test]
fn interpolation_hint_takes_precedence() {
    let mut ctx = WarpContext::create(canvas(2, 2), ContextOpts::default().with_workers(0)).unwrap();
    assert_eq!(ctx.rendering_options().interpolation, Interpolation::Bilinear);
    ctx.set_rendering_hints(RenderingHints {
        quality: Some(crate::raster::options::QualityHint::Quality),
        ..RenderingHints::default()
    })
    .unwrap();
    assert_eq!(ctx.rendering_options().interpolation, Interpolation::Bicubic);
    ctx.set_interpolation_hint(Interpolation::NearestNeighbor).unwrap();
    assert_eq!(ctx.rendering_options().interpolation, Interpolation::NearestNeighbor);
}

#[test]
fn empty_source_draws_nothing() {
    let src = PixelBuffer::new(0, 0, PixelFormat::Argb);
    let mut ctx = WarpContext::create(canvas(4, 4), ContextOpts::default().with_workers(0)).unwrap();
    let stats = ctx
        .warp_quad(src.view(), &Quad::from_rect(crate::foundation::core::Rect::new(0.0, 0.0, 4.0, 4.0)))
        .unwrap();
    assert_eq!(stats, WarpStats::default());
}

#[test]
fn bands_move_tile_rows_in_and_out() {
    let mut data: Vec<u32> = (0..40).collect();
    let bands = Bands::new(&mut data, 8, 2);
    assert_eq!(bands.bands.len(), 3);

    let rect = PixelRect::new(3, 2, 2, 2);
    let mut staging = vec![0; 4];
    bands.transfer(rect, 8, &mut staging, true);
    assert_eq!(staging, vec![19, 20, 27, 28]);

    bands.transfer(rect, 8, &mut [1, 2, 3, 4], false);
    drop(bands);
    assert_eq!(&data[19..21], &[1, 2]);
    assert_eq!(&data[27..29], &[3, 4]);
}

#[test]
fn pool_threads_exit_on_shutdown() {
    let pool = WorkerPool::build(3).unwrap();
    let live = Arc::clone(&pool.live);
    pool.shutdown(Duration::from_secs(30));
    assert_eq!(*live.0.lock().unwrap(), 0);
}

#[test]
fn into_destination_disposes() {
    let ctx = WarpContext::create(canvas(3, 2), ContextOpts::default().with_workers(1)).unwrap();
    let dst = ctx.into_destination();
    assert_eq!((dst.width(), dst.height()), (3, 2));
}
