//! Shortest paths over a [`NavMeshGraph`].
//!
//! The search runs A* over points on the edges between triangles rather
//! than over triangle centers. Every shared edge carries a fixed number of
//! evenly spaced crossing candidates, and the cost of a step is the straight
//! distance between consecutive crossings. The resulting polyline can then
//! be pulled taut by sliding each crossing along its edge.

mod crossing;
mod straighten;

use std::collections::{BinaryHeap, HashMap};

use slotmap::SlotMap;
use tracing::trace;

use crate::error::{QueryError, Result};
use crate::graph::{NavMeshGraph, NodeIndex};
use crate::math::Point3;

use crossing::{Crossing, CrossingId, CrossingKey, OpenEntry, Waypoint};
use straighten::straighten;

/// Upper bound for [`PathParams::straightening_iterations`].
pub const MAX_STRAIGHTENING_ITERATIONS: usize = 100;

/// Tuning for [`FindPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathParams {
    /// Crossing candidates per shared edge.
    pub subdivisions: usize,
    /// Straightening passes applied to the found path.
    pub straightening_iterations: usize,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            subdivisions: 3,
            straightening_iterations: 0,
        }
    }
}

impl PathParams {
    /// Creates validated path parameters.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidParameters`] if `subdivisions` is zero or
    /// `straightening_iterations` exceeds [`MAX_STRAIGHTENING_ITERATIONS`].
    pub fn new(subdivisions: usize, straightening_iterations: usize) -> Result<Self> {
        if subdivisions == 0 {
            return Err(QueryError::InvalidParameters(
                "edges need at least one crossing candidate".to_owned(),
            )
            .into());
        }
        if straightening_iterations > MAX_STRAIGHTENING_ITERATIONS {
            return Err(QueryError::InvalidParameters(format!(
                "{straightening_iterations} straightening iterations requested, at most \
                 {MAX_STRAIGHTENING_ITERATIONS} allowed"
            ))
            .into());
        }
        Ok(Self {
            subdivisions,
            straightening_iterations,
        })
    }
}

/// Finds a path between two points on a navigation graph.
///
/// The graph is only borrowed, so any number of searches may run at once.
pub struct FindPath<'a> {
    graph: &'a NavMeshGraph,
    index: Option<&'a NodeIndex>,
    params: PathParams,
}

impl<'a> FindPath<'a> {
    /// Creates a new `FindPath` operation.
    #[must_use]
    pub fn new(graph: &'a NavMeshGraph, params: PathParams) -> Self {
        Self {
            graph,
            index: None,
            params,
        }
    }

    /// Uses `index` to locate the start and goal triangles.
    #[must_use]
    pub fn with_index(mut self, index: &'a NodeIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Executes the search.
    ///
    /// Returns the waypoints from `start` to `end`, both included, or `None`
    /// if either point has no triangle below it or the two triangles are not
    /// connected. Points sharing a triangle yield `[start, end]`.
    #[must_use]
    pub fn execute(&self, start: &Point3, end: &Point3) -> Option<Vec<Point3>> {
        let start_node = self.locate(start)?;
        let goal_node = self.locate(end)?;
        if start_node == goal_node {
            return Some(vec![*start, *end]);
        }

        let subdivisions = self.params.subdivisions.max(1);
        let mut crossings: SlotMap<CrossingId, Crossing> = SlotMap::with_key();
        let mut best: HashMap<CrossingKey, CrossingId> = HashMap::new();
        let mut open = BinaryHeap::new();

        let root = crossings.insert(Crossing {
            key: None,
            waypoint: Waypoint::fixed(*start),
            node: start_node,
            edge: None,
            distance: 0.0,
            parent: None,
            terminal: false,
        });
        open.push(OpenEntry {
            crossing: root,
            priority: (end - start).norm(),
        });

        while let Some(OpenEntry { crossing: id, .. }) = open.pop() {
            let Some(&current) = crossings.get(id) else {
                continue;
            };
            if current.terminal {
                trace!(
                    explored = crossings.len(),
                    distance = current.distance,
                    "path found"
                );
                return Some(self.finish(&crossings, id));
            }
            if current.key.is_some_and(|key| best.get(&key) != Some(&id)) {
                continue;
            }

            let here = current.waypoint.position();
            if current.node == goal_node {
                let distance = current.distance + (end - here).norm();
                let goal = crossings.insert(Crossing {
                    key: None,
                    waypoint: Waypoint::fixed(*end),
                    node: goal_node,
                    edge: None,
                    distance,
                    parent: Some(id),
                    terminal: true,
                });
                open.push(OpenEntry {
                    crossing: goal,
                    priority: distance,
                });
                continue;
            }

            let Some(node) = self.graph.node(current.node) else {
                continue;
            };
            for (edge, neighbor) in node.half_edges().into_iter().zip(node.neighbors) {
                let Some(neighbor) = neighbor else {
                    continue;
                };
                if current.edge.is_some_and(|crossed| crossed.same_edge(&edge)) {
                    continue;
                }
                let edge = edge.canonical();
                let vertices = self.graph.vertices();
                let (Some(&a), Some(&b)) = (vertices.get(edge.a), vertices.get(edge.b)) else {
                    continue;
                };

                for subdivision in 0..subdivisions {
                    #[allow(clippy::cast_precision_loss)]
                    let t = (subdivision as f64 + 0.5) / subdivisions as f64;
                    let waypoint = Waypoint { a, b, t };
                    let point = waypoint.position();
                    let distance = current.distance + (point - here).norm();
                    let key = CrossingKey {
                        edge: edge.key(),
                        subdivision,
                    };
                    let known = best
                        .get(&key)
                        .and_then(|&known| crossings.get(known))
                        .map(|known| known.distance);
                    if known.is_some_and(|known| known <= distance) {
                        continue;
                    }

                    let next = crossings.insert(Crossing {
                        key: Some(key),
                        waypoint,
                        node: neighbor,
                        edge: Some(edge),
                        distance,
                        parent: Some(id),
                        terminal: false,
                    });
                    best.insert(key, next);
                    open.push(OpenEntry {
                        crossing: next,
                        priority: distance + (end - point).norm(),
                    });
                }
            }
        }

        trace!(
            start_node,
            goal_node,
            explored = crossings.len(),
            "no path between nodes"
        );
        None
    }

    fn locate(&self, point: &Point3) -> Option<usize> {
        let candidates = self.index.map(|index| index.candidates(point));
        self.graph.node_below(point, candidates)
    }

    /// Walks the parent chain back from `goal` and straightens the result.
    fn finish(&self, crossings: &SlotMap<CrossingId, Crossing>, goal: CrossingId) -> Vec<Point3> {
        let mut waypoints = Vec::new();
        let mut cursor = Some(goal);
        while let Some(crossing) = cursor.and_then(|id| crossings.get(id)) {
            waypoints.push(crossing.waypoint);
            cursor = crossing.parent;
        }
        waypoints.reverse();
        straighten(&mut waypoints, self.params.straightening_iterations);
        waypoints.iter().map(Waypoint::position).collect()
    }
}

/// Total length of a polyline.
#[must_use]
pub fn path_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}
