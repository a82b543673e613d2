use super::*;

fn unit_quad(w: f64, h: f64) -> Quad {
    Quad::from_rect(Rect::new(0.0, 0.0, w, h))
}

#[test]
fn bounds_cover_all_corners() {
    let q = Quad::new(
        Point::new(5.0, 1.0),
        Point::new(9.0, 4.0),
        Point::new(6.0, 9.5),
        Point::new(-2.0, 3.0),
    );
    assert_eq!(q.bounds(), Rect::new(-2.0, 1.0, 9.0, 9.5));
}

#[test]
fn convex_quad_is_simple() {
    assert!(!unit_quad(10.0, 10.0).is_self_intersecting());
}

#[test]
fn bowtie_is_self_intersecting() {
    // top_left-bottom_left crosses top_right-bottom_right
    let q = Quad::new(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 10.0),
        Point::new(10.0, 10.0),
    );
    assert!(q.is_self_intersecting());
}

#[test]
fn pixel_bounds_pads_and_clamps() {
    let q = Quad::from_rect(Rect::new(2.2, 3.0, 5.5, 7.0));
    assert_eq!(q.pixel_bounds(100, 100, 1), Some(PixelRect::new(1, 2, 6, 6)));

    let q = unit_quad(10.0, 10.0);
    assert_eq!(q.pixel_bounds(8, 6, 1), Some(PixelRect::new(0, 0, 8, 6)));
}

#[test]
fn pixel_bounds_off_canvas_is_none() {
    let q = Quad::from_rect(Rect::new(-50.0, -50.0, -20.0, -20.0));
    assert_eq!(q.pixel_bounds(10, 10, 1), None);
}

#[test]
fn pixel_rect_intersection_and_contains() {
    let a = PixelRect::new(0, 0, 10, 10);
    let b = PixelRect::new(5, 8, 10, 10);
    let i = a.intersect(b).unwrap();
    assert_eq!(i, PixelRect::new(5, 8, 5, 2));
    assert!(i.contains(5, 8));
    assert!(!i.contains(10, 8));
    assert_eq!(i.area(), 10);
    assert_eq!(a.intersect(PixelRect::new(20, 20, 1, 1)), None);
}
