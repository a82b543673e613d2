use super::*;
use crate::foundation::core::{Quad, Rect};
use crate::pixels::buffer::{PixelBuffer, PixelFormat};

fn checker(format: PixelFormat) -> PixelBuffer {
    let data = vec![0xff10_2030, 0xff40_5060, 0xff70_8090, 0xffa0_b0c0];
    PixelBuffer::from_raw(data, 2, 2, 2, format).unwrap()
}

fn shifted(dx: f64) -> Matrix {
    let quad = Quad::from_rect(Rect::new(dx, 0.0, dx + 2.0, 2.0));
    Matrix::from_rect_to_quad(2, 2, &quad).unwrap()
}

#[test]
fn identity_reproduces_pixels_in_every_mode() {
    let src = checker(PixelFormat::Argb);
    for mode in [
        Interpolation::NearestNeighbor,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
        Interpolation::CubicConvolution,
    ] {
        let s = Sampler::new(src.view(), Matrix::IDENTITY, mode);
        for y in 0..2 {
            for x in 0..2 {
                let px = src.get(x, y).unwrap();
                assert_eq!(
                    s.sample(x as i32, y as i32),
                    Some(unpack_argb(px)),
                    "{mode:?} at ({x},{y})"
                );
            }
        }
    }
}

#[test]
fn outside_source_contributes_nothing() {
    let src = checker(PixelFormat::Argb);
    for mode in [
        Interpolation::NearestNeighbor,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
        Interpolation::CubicConvolution,
    ] {
        let s = Sampler::new(src.view(), Matrix::IDENTITY, mode);
        assert_eq!(s.sample(-1, 0), None);
        assert_eq!(s.sample(2, 1), None);
        assert_eq!(s.sample(0, 5), None);
    }
}

#[test]
fn nearest_treats_rgb_source_as_opaque() {
    let src = PixelBuffer::filled(1, 1, PixelFormat::Rgb, 0x0011_2233);
    let s = Sampler::new(src.view(), Matrix::IDENTITY, Interpolation::NearestNeighbor);
    assert_eq!(s.sample(0, 0), Some([255, 0x11, 0x22, 0x33]));
}

#[test]
fn box_filter_coverage_becomes_alpha_for_rgb_source() {
    let src = checker(PixelFormat::Rgb);
    let s = Sampler::new(src.view(), shifted(0.5), Interpolation::Bilinear);
    // half of the 2x2 sub-samples land on source column 1, half fall off the right edge
    assert_eq!(s.sample(2, 0), Some([127, 0x40, 0x50, 0x60]));

    let s = Sampler::new(src.view(), shifted(0.5), Interpolation::Bicubic);
    assert_eq!(s.sample(2, 1), Some([127, 0xa0, 0xb0, 0xc0]));
}

#[test]
fn box_filter_with_alpha_averages_in_bounds_samples_only() {
    let data = vec![0xff00_0000, 0x00ff_ffff];
    let src = PixelBuffer::from_raw(data, 2, 1, 2, PixelFormat::Argb).unwrap();
    let quad = Quad::from_rect(Rect::new(0.5, 0.0, 2.5, 1.0));
    let m = Matrix::from_rect_to_quad(2, 1, &quad).unwrap();
    let s = Sampler::new(src.view(), m, Interpolation::Bilinear);
    assert_eq!(s.sample(1, 0), Some([127, 127, 127, 127]));
    // right edge: only the transparent pixel is in range and the divisor shrinks to it
    assert_eq!(s.sample(2, 0), Some([0, 255, 255, 255]));
}

#[test]
fn cubic_convolution_skips_transparent_neighbours_colour() {
    let data = vec![0xffff_0000, 0x0000_ff00];
    let src = PixelBuffer::from_raw(data, 2, 1, 2, PixelFormat::Argb).unwrap();
    let s = Sampler::new(src.view(), shifted(0.5), Interpolation::CubicConvolution);
    let [a, r, g, _] = s.sample(1, 0).unwrap();
    assert!(a > 0 && a < 255);
    assert_eq!((r, g), (255, 0));
}

#[test]
fn catmull_rom_weights_are_a_partition_of_unity() {
    for t in [0.0, 0.1, 0.5, 0.9] {
        let w = catmull_rom_weights(t);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
    assert_eq!(catmull_rom_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
}
