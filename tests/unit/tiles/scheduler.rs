use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::*;
use crate::foundation::core::PixelRect;
use crate::geometry::scan_bounds::ScanBounds;

fn tile(id: u32) -> Tile {
    Tile {
        id,
        rect: PixelRect::new(id as i32, 0, 1, 1),
        bounds: ScanBounds::fixed(0, 0),
    }
}

#[test]
fn claims_in_order_and_drains() {
    let s = TileScheduler::new((0..3).map(tile), Duration::from_millis(5));
    assert_eq!(s.pending(), 3);

    let a = s.claim().unwrap();
    let b = s.claim().unwrap();
    assert_eq!((a.id, b.id), (0, 1));
    assert_eq!(s.claimed(), 2);

    s.release(a.id);
    let c = s.claim().unwrap();
    assert_eq!(c.id, 2);
    assert!(s.claim().is_none());

    s.release(b.id);
    s.release(c.id);
    assert!(s.is_drained());
}

#[test]
fn concurrent_workers_claim_each_tile_once() {
    let s = TileScheduler::new((0..500).map(tile), Duration::from_millis(5));
    let events: Mutex<HashMap<u32, usize>> = Mutex::new(HashMap::new());

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                while let Some(t) = s.claim() {
                    *events.lock().unwrap().entry(t.id).or_default() += 1;
                    s.release(t.id);
                }
            });
        }
    });

    let events = events.into_inner().unwrap();
    assert_eq!(events.len(), 500);
    assert!(events.values().all(|&n| n == 1));
    assert!(s.is_drained());
}

#[test]
fn same_id_waits_for_release() {
    let s = TileScheduler::new([tile(7), tile(7)], Duration::from_millis(5));
    let first = s.claim().unwrap();
    let in_flight = Mutex::new(true);

    thread::scope(|scope| {
        let waiter = scope.spawn(|| {
            let t = s.claim().unwrap();
            // the first claim must have been released before this one was granted
            assert!(!*in_flight.lock().unwrap());
            t.id
        });
        thread::sleep(Duration::from_millis(30));
        *in_flight.lock().unwrap() = false;
        s.release(first.id);
        assert_eq!(waiter.join().unwrap(), 7);
    });
    assert_eq!(s.claimed(), 1);
}

#[test]
fn empty_scheduler_returns_none() {
    let s = TileScheduler::new(Vec::new(), DEFAULT_CLAIM_WAIT);
    assert!(s.claim().is_none());
    assert!(s.is_drained());
}
