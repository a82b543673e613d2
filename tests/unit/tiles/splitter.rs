use std::collections::HashSet;

use super::*;

fn assert_exact_cover(area: PixelRect, tiles: &[Tile]) {
    let mut seen = HashSet::new();
    for t in tiles {
        for y in t.rect.y..t.rect.bottom() {
            for x in t.rect.x..t.rect.right() {
                assert!(area.contains(x, y), "tile {} leaks ({x},{y})", t.id);
                assert!(seen.insert((x, y)), "({x},{y}) covered twice");
            }
        }
    }
    assert_eq!(seen.len() as u64, area.area());
}

#[test]
fn unaligned_area_is_covered_exactly() {
    let grid = TileGrid::new(100, 1000).unwrap();
    let area = PixelRect::new(37, 81, 250, 133);
    let tiles = grid.split(area, &ScanBounds::fixed(area.x, area.right() - 1));
    // columns 0..=2, rows 0..=2
    assert_eq!(tiles.len(), 9);
    assert_eq!(tiles[0].rect, PixelRect::new(37, 81, 63, 19));
    assert_exact_cover(area, &tiles);
}

#[test]
fn cover_holds_for_many_tile_sizes() {
    let area = PixelRect::new(3, 5, 41, 29);
    for ts in [1u32, 2, 7, 16, 40, 64, 1000] {
        let grid = TileGrid::new(ts, 64).unwrap();
        let tiles = grid.split(area, &ScanBounds::fixed(0, 63));
        assert_exact_cover(area, &tiles);
    }
}

#[test]
fn ids_are_unique_and_grid_derived() {
    let grid = TileGrid::new(10, 95).unwrap();
    let tiles = grid.split(PixelRect::new(0, 0, 95, 42), &ScanBounds::fixed(0, 94));
    let ids: HashSet<u32> = tiles.iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), tiles.len());
    // 10 columns per grid row
    let t = tiles.iter().find(|t| t.rect.x == 30 && t.rect.y == 20).unwrap();
    assert_eq!(t.id, grid.tile_id(3, 2));
    assert_eq!(t.id, 23);
}

#[test]
fn ids_are_stable_across_areas() {
    let grid = TileGrid::new(50, 500).unwrap();
    let a = grid.split(PixelRect::new(60, 60, 30, 30), &ScanBounds::fixed(0, 499));
    let b = grid.split(PixelRect::new(51, 55, 48, 40), &ScanBounds::fixed(0, 499));
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].id, b[0].id);
}

#[test]
fn tile_bounds_are_narrowed_to_tile_columns() {
    let grid = TileGrid::new(10, 100).unwrap();
    let tiles = grid.split(PixelRect::new(5, 0, 20, 5), &ScanBounds::fixed(5, 24));
    let mins: Vec<_> = tiles.iter().map(|t| t.bounds.min_x()).collect();
    let maxs: Vec<_> = tiles.iter().map(|t| t.bounds.max_x()).collect();
    assert_eq!(mins, vec![5, 10, 20]);
    assert_eq!(maxs, vec![9, 19, 24]);
}

#[test]
fn zero_tile_size_is_rejected() {
    assert!(TileGrid::new(0, 10).is_err());
}

#[test]
fn empty_area_has_no_tiles() {
    let grid = TileGrid::new(10, 10).unwrap();
    assert!(grid.split(PixelRect::new(0, 0, 0, 5), &ScanBounds::fixed(0, 9)).is_empty());
}
