mod assemble;
mod index;

pub use assemble::AssembleGraph;
pub use index::NodeIndex;

use crate::error::{GraphError, Result};
use crate::math::triangle::{point_in_triangle_xz, triangle_normal_up};
use crate::math::{Point3, Vector3};

/// Height added to query points before searching for the surface below them.
const NODE_BELOW_LIFT: f64 = 0.5;

/// An unordered pair of vertex indices forming one side of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HalfEdge {
    pub a: usize,
    pub b: usize,
}

impl HalfEdge {
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Order-independent identity: the larger index in the high 32 bits, the
    /// smaller in the low 32 bits.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn key(&self) -> u64 {
        let (lo, hi) = (self.a.min(self.b) as u64, self.a.max(self.b) as u64);
        (hi << 32) | (lo & 0xFFFF_FFFF)
    }

    /// Returns `true` if both half-edges join the same two vertices.
    #[must_use]
    pub fn same_edge(&self, other: &HalfEdge) -> bool {
        self.key() == other.key()
    }

    /// The same edge with the smaller index first.
    #[must_use]
    pub fn canonical(&self) -> HalfEdge {
        HalfEdge::new(self.a.min(self.b), self.a.max(self.b))
    }
}

/// A triangle of the navigation mesh with links to the triangles that share
/// its edges.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    /// Indices into the graph's vertex array.
    pub vertices: [usize; 3],
    /// Neighbor across each half-edge, in [`GraphNode::half_edges`] order.
    pub neighbors: [Option<usize>; 3],
}

impl GraphNode {
    /// Creates an unlinked node.
    #[must_use]
    pub fn new(vertices: [usize; 3]) -> Self {
        Self {
            vertices,
            neighbors: [None; 3],
        }
    }

    /// The half-edges `v0-v1`, `v1-v2` and `v2-v0`.
    #[must_use]
    pub fn half_edges(&self) -> [HalfEdge; 3] {
        let [a, b, c] = self.vertices;
        [HalfEdge::new(a, b), HalfEdge::new(b, c), HalfEdge::new(c, a)]
    }

    /// Slot of the half-edge joining the same vertices as `edge`.
    #[must_use]
    pub fn edge_slot(&self, edge: &HalfEdge) -> Option<usize> {
        self.half_edges().iter().position(|e| e.same_edge(edge))
    }

    /// Neighbor across the edge joining vertices `a` and `b`.
    #[must_use]
    pub fn neighbor_by_edge(&self, a: usize, b: usize) -> Option<usize> {
        self.edge_slot(&HalfEdge::new(a, b))
            .and_then(|slot| self.neighbors[slot])
    }
}

/// The baked navigation mesh: shared vertices and linked triangle nodes.
///
/// Nodes refer to each other by index into [`NavMeshGraph::nodes`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavMeshGraph {
    vertices: Vec<Point3>,
    nodes: Vec<GraphNode>,
}

impl NavMeshGraph {
    /// Creates a graph from prebuilt parts and validates it.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if any index is out of range or a neighbor
    /// link is not mirrored.
    pub fn from_parts(vertices: Vec<Point3>, nodes: Vec<GraphNode>) -> Result<Self> {
        let graph = Self { vertices, nodes };
        graph.validate()?;
        Ok(graph)
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: usize) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World positions of a node's corners.
    #[must_use]
    pub fn triangle(&self, id: usize) -> Option<[Point3; 3]> {
        let node = self.nodes.get(id)?;
        let [a, b, c] = node.vertices;
        Some([
            *self.vertices.get(a)?,
            *self.vertices.get(b)?,
            *self.vertices.get(c)?,
        ])
    }

    /// Returns `true` if `point` lies inside node `id` when seen from above.
    ///
    /// Points on a corner are not contained.
    #[must_use]
    pub fn node_contains(&self, id: usize, point: &Point3) -> bool {
        self.triangle(id)
            .is_some_and(|[a, b, c]| point_in_triangle_xz(point, &a, &b, &c))
    }

    /// First node containing `point` when seen from above.
    #[must_use]
    pub fn node_containing(&self, point: &Point3) -> Option<usize> {
        (0..self.nodes.len()).find(|&id| self.node_contains(id, point))
    }

    /// The node whose surface lies closest below `point`.
    ///
    /// Among nodes containing the point from above, picks the smallest
    /// non-negative height over the node's plane, or failing that the
    /// smallest depth below it. `candidates` restricts the search, e.g. to
    /// [`NodeIndex::candidates`].
    #[must_use]
    pub fn node_below(&self, point: &Point3, candidates: Option<&[usize]>) -> Option<usize> {
        let lifted = point + Vector3::y() * NODE_BELOW_LIFT;
        match candidates {
            Some(ids) => self.closest_below(&lifted, ids.iter().copied()),
            None => self.closest_below(&lifted, 0..self.nodes.len()),
        }
    }

    fn closest_below(&self, point: &Point3, ids: impl Iterator<Item = usize>) -> Option<usize> {
        let mut above: Option<(usize, f64)> = None;
        let mut below: Option<(usize, f64)> = None;
        for id in ids {
            let Some([a, b, c]) = self.triangle(id) else {
                continue;
            };
            if !point_in_triangle_xz(point, &a, &b, &c) {
                continue;
            }
            let normal = triangle_normal_up(&a, &b, &c);
            let height = normal.dot(&(point - a)) * normal.y;
            if height >= 0.0 {
                if above.map_or(true, |(_, best)| height < best) {
                    above = Some((id, height));
                }
            } else if below.map_or(true, |(_, best)| height > best) {
                below = Some((id, height));
            }
        }
        above.or(below).map(|(id, _)| id)
    }

    /// The edge shared by nodes `a` and `b`, oriented as in `a`.
    ///
    /// Returns `None` if the nodes are identical, missing, or not adjacent.
    #[must_use]
    pub fn shared_edge(&self, a: usize, b: usize) -> Option<HalfEdge> {
        if a == b {
            return None;
        }
        let (node_a, node_b) = (self.nodes.get(a)?, self.nodes.get(b)?);
        node_a
            .half_edges()
            .into_iter()
            .find(|edge| node_b.edge_slot(edge).is_some())
    }

    /// Checks index ranges and that every neighbor link is mirrored.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] found.
    pub fn validate(&self) -> Result<()> {
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(&vertex) = node.vertices.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(GraphError::VertexOutOfRange {
                    node: id,
                    vertex,
                    count: self.vertices.len(),
                }
                .into());
            }
            for (edge, neighbor) in node.half_edges().iter().zip(node.neighbors) {
                let Some(neighbor) = neighbor else {
                    continue;
                };
                let Some(other) = self.nodes.get(neighbor) else {
                    return Err(GraphError::NodeOutOfRange {
                        node: id,
                        neighbor,
                        count: self.nodes.len(),
                    }
                    .into());
                };
                if other.neighbor_by_edge(edge.a, edge.b) != Some(id) {
                    return Err(GraphError::AsymmetricNeighbor {
                        node: id,
                        neighbor,
                        a: edge.a,
                        b: edge.b,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}
