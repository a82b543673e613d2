//! Shared work queue handed to the warp workers.
//!
//! Pending tiles and the claimed-id set live under one mutex, so finding an unclaimed
//! tile and claiming it is a single step for every worker. A worker that finds only tiles
//! whose id is still claimed parks on the condvar for at most `wait` and retries; every
//! release wakes all parked workers.

use std::collections::{HashSet, VecDeque};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::tiles::splitter::Tile;

/// Default park time for a worker with nothing claimable.
pub const DEFAULT_CLAIM_WAIT: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Queue {
    pending: VecDeque<Tile>,
    claimed: HashSet<u32>,
}

#[derive(Debug)]
pub struct TileScheduler {
    queue: Mutex<Queue>,
    released: Condvar,
    wait: Duration,
}

impl TileScheduler {
    pub fn new(tiles: impl IntoIterator<Item = Tile>, wait: Duration) -> Self {
        Self {
            queue: Mutex::new(Queue {
                pending: tiles.into_iter().collect(),
                claimed: HashSet::new(),
            }),
            released: Condvar::new(),
            wait,
        }
    }

    // Tile bookkeeping stays consistent across a panicking worker: the panic surfaces
    // through the pool scope, so a poisoned lock is safe to keep using.
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the first pending tile whose id is not claimed and mark it claimed.
    ///
    /// Returns `None` once nothing is pending. Blocks in bounded waits while every
    /// pending tile shares an id with one already in flight.
    pub fn claim(&self) -> Option<Tile> {
        let mut q = self.lock();
        loop {
            if q.pending.is_empty() {
                return None;
            }
            let Queue { pending, claimed } = &mut *q;
            if let Some(pos) = pending.iter().position(|t| !claimed.contains(&t.id)) {
                let tile = pending.remove(pos)?;
                claimed.insert(tile.id);
                tracing::trace!(tile = tile.id, left = pending.len(), "tile claimed");
                return Some(tile);
            }
            q = self
                .released
                .wait_timeout(q, self.wait)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Return the claim on `id` after its tile has been written, waking parked workers.
    pub fn release(&self, id: u32) {
        let removed = self.lock().claimed.remove(&id);
        if !removed {
            tracing::warn!(tile = id, "released a tile that was not claimed");
        }
        self.released.notify_all();
    }

    /// Tiles not yet claimed.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Tiles claimed and not yet released.
    pub fn claimed(&self) -> usize {
        self.lock().claimed.len()
    }

    pub fn is_drained(&self) -> bool {
        let q = self.lock();
        q.pending.is_empty() && q.claimed.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tiles/scheduler.rs"]
mod tests;
