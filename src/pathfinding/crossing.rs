use std::cmp::Ordering;

use crate::graph::HalfEdge;
use crate::math::segment::lerp;
use crate::math::Point3;

slotmap::new_key_type! {
    /// Identifier of a crossing explored during one search.
    pub(super) struct CrossingId;
}

/// Identity of a candidate crossing point: which edge, which subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) struct CrossingKey {
    pub edge: u64,
    pub subdivision: usize,
}

/// A point constrained to the segment `a -> b`.
///
/// Fixed points use `a == b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Waypoint {
    pub a: Point3,
    pub b: Point3,
    pub t: f64,
}

impl Waypoint {
    pub fn fixed(point: Point3) -> Self {
        Self {
            a: point,
            b: point,
            t: 0.0,
        }
    }

    pub fn position(&self) -> Point3 {
        lerp(&self.a, &self.b, self.t)
    }
}

/// One search state: a crossing into `node`, reached via `parent`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Crossing {
    /// `None` for the start and goal points.
    pub key: Option<CrossingKey>,
    pub waypoint: Waypoint,
    /// Triangle entered by this crossing.
    pub node: usize,
    /// Edge crossed to enter `node`.
    pub edge: Option<HalfEdge>,
    pub distance: f64,
    pub parent: Option<CrossingId>,
    /// Set on the state placed at the goal point.
    pub terminal: bool,
}

/// Priority queue entry. Ordered so that `BinaryHeap` pops the lowest
/// priority first.
#[derive(Debug, Clone, Copy)]
pub(super) struct OpenEntry {
    pub crossing: CrossingId,
    pub priority: f64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.crossing.cmp(&self.crossing))
    }
}
