//! Per-road blocked flags.
//!
//! One `AtomicBool` per `RoadId`.  The set of blocked roads is *derived*
//! from the flags rather than stored beside them, so flag and membership
//! cannot drift apart.  Toggles take `&self` and are safe to interleave with
//! searches on other threads: a search reads each flag when it relaxes an
//! edge and holds no lock across iterations.

use std::sync::atomic::{AtomicBool, Ordering};

use fw_core::RoadId;

pub struct BlockingRegistry {
    flags: Vec<AtomicBool>,
}

impl BlockingRegistry {
    /// A registry for `road_count` roads, all unblocked.
    pub fn new(road_count: usize) -> Self {
        Self {
            flags: (0..road_count).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Set `road`'s flag.  Returns `true` if the state changed; setting the
    /// current state again is a no-op that returns `false`.
    ///
    /// # Panics
    ///
    /// If `road` is out of range for the graph this registry was built for.
    pub fn set_blocked(&self, road: RoadId, blocked: bool) -> bool {
        self.flags[road.index()].swap(blocked, Ordering::AcqRel) != blocked
    }

    /// Flip `road`'s flag and return the new state.
    pub fn toggle(&self, road: RoadId) -> bool {
        !self.flags[road.index()].fetch_xor(true, Ordering::AcqRel)
    }

    /// O(1) edge filter used by the router.  Out-of-range ids read as open.
    #[inline]
    pub fn is_blocked(&self, road: RoadId) -> bool {
        self.flags
            .get(road.index())
            .is_some_and(|f| f.load(Ordering::Acquire))
    }

    /// Blocked roads in ascending `RoadId` order.
    pub fn blocked(&self) -> impl Iterator<Item = RoadId> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| f.load(Ordering::Acquire))
            .map(|(i, _)| RoadId(i as u32))
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked().count()
    }
}
