use hashbrown::HashSet;

use crate::Coord2;

/// Cells whose view changed since the last drain, in first-change order.
#[derive(Clone, Debug, Default)]
pub struct ChangeFeed {
    order: Vec<Coord2>,
    queued: HashSet<Coord2>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `coords` unless it is already waiting.
    pub fn push(&mut self, coords: Coord2) {
        if self.queued.insert(coords) {
            self.order.push(coords);
        }
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.queued.contains(&coords)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Hands out every queued coordinate and leaves the feed empty.
    pub fn drain(&mut self) -> Vec<Coord2> {
        self.queued.clear();
        core::mem::take(&mut self.order)
    }
}
