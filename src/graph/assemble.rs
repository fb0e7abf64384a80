use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, warn};

use super::{GraphNode, NavMeshGraph};
use crate::error::{GraphError, Result};
use crate::math::Point3;

/// First triangle seen on an edge and whether a second one already claimed it.
struct EdgeOwner {
    node: usize,
    linked: bool,
}

/// Builds a linked [`NavMeshGraph`] from an indexed triangle list.
///
/// Triangles sharing an edge become neighbors. An edge used by more than two
/// triangles links only the first two; later ones treat it as a boundary.
pub struct AssembleGraph {
    vertices: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
}

impl AssembleGraph {
    /// Creates a new `AssembleGraph` operation.
    #[must_use]
    pub fn new(vertices: Vec<Point3>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Executes the assembly.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if a triangle references a
    /// vertex that does not exist.
    pub fn execute(self) -> Result<NavMeshGraph> {
        let count = self.vertices.len();
        if let Some((node, &vertex)) = self
            .triangles
            .iter()
            .enumerate()
            .find_map(|(id, t)| t.iter().find(|&&v| v >= count).map(|v| (id, v)))
        {
            return Err(GraphError::VertexOutOfRange {
                node,
                vertex,
                count,
            }
            .into());
        }

        let mut nodes: Vec<GraphNode> = self.triangles.into_iter().map(GraphNode::new).collect();
        let mut owners: HashMap<u64, EdgeOwner> = HashMap::with_capacity(nodes.len() * 2);
        let mut non_manifold = 0usize;

        for id in 0..nodes.len() {
            for (slot, edge) in nodes[id].half_edges().into_iter().enumerate() {
                match owners.entry(edge.key()) {
                    Entry::Vacant(entry) => {
                        entry.insert(EdgeOwner {
                            node: id,
                            linked: false,
                        });
                    }
                    Entry::Occupied(mut entry) => {
                        let owner = entry.get_mut();
                        if owner.node == id {
                            continue;
                        }
                        if owner.linked {
                            non_manifold += 1;
                            warn!(
                                node = id,
                                a = edge.a,
                                b = edge.b,
                                "edge shared by more than two triangles, leaving it unlinked"
                            );
                            continue;
                        }
                        owner.linked = true;
                        let other = owner.node;
                        nodes[id].neighbors[slot] = Some(other);
                        if let Some(other_slot) = nodes[other].edge_slot(&edge) {
                            nodes[other].neighbors[other_slot] = Some(id);
                        }
                    }
                }
            }
        }

        debug!(
            nodes = nodes.len(),
            vertices = count,
            non_manifold,
            "assembled navigation graph"
        );
        NavMeshGraph::from_parts(self.vertices, nodes)
    }
}
