use super::*;

#[test]
fn clamp255_saturates() {
    assert_eq!(clamp255(0), 0);
    assert_eq!(clamp255(255), 255);
    assert_eq!(clamp255(256), 255);
    assert_eq!(clamp255(u32::MAX), 255);
}

#[test]
fn float_rounding_saturates_and_handles_nan() {
    assert_eq!(floor_to_i32(-0.5), -1);
    assert_eq!(ceil_to_i32(-0.5), 0);
    assert_eq!(floor_to_i32(f64::NAN), 0);
    assert_eq!(ceil_to_i32(1e30), i32::MAX);
}

#[test]
fn adjugate_times_matrix_is_det_identity() {
    let m = [[2.0, 0.0, 1.0], [1.0, 3.0, 0.0], [0.0, 1.0, 4.0]];
    let det = det3(&m);
    let p = mul3(&adjugate3(&m), &m);
    for (r, row) in p.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            let expected = if r == c { det } else { 0.0 };
            assert!((v - expected).abs() < 1e-9, "p[{r}][{c}] = {v}");
        }
    }
}

#[test]
fn mul3v_applies_rows() {
    let m = [[1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
    assert_eq!(mul3v(&m, [1.0, 1.0, 1.0]), [6.0, 1.0, 2.0]);
}
