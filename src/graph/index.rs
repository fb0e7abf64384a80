use std::collections::HashMap;

use super::NavMeshGraph;
use crate::math::{Point3, TOLERANCE};

/// Uniform grid over the horizontal footprints of graph nodes.
///
/// Speeds up point lookups by narrowing the nodes worth testing.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl NodeIndex {
    /// Buckets every node of `graph` into the cells its footprint overlaps.
    ///
    /// The cell size is the mean horizontal extent of the nodes.
    #[must_use]
    pub fn build(graph: &NavMeshGraph) -> Self {
        let footprints: Vec<(usize, [f64; 4])> = (0..graph.len())
            .filter_map(|id| graph.triangle(id).map(|t| (id, footprint(&t))))
            .collect();
        if footprints.is_empty() {
            return Self::default();
        }

        #[allow(clippy::cast_precision_loss)]
        let mean_extent = footprints
            .iter()
            .map(|(_, [x0, z0, x1, z1])| (x1 - x0).max(z1 - z0))
            .sum::<f64>()
            / footprints.len() as f64;
        let cell_size = mean_extent.max(TOLERANCE.sqrt());

        let mut index = Self {
            cell_size,
            cells: HashMap::new(),
        };
        for (id, [x0, z0, x1, z1]) in footprints {
            let (cx0, cz0) = index.cell_of(x0, z0);
            let (cx1, cz1) = index.cell_of(x1, z1);
            for cx in cx0..=cx1 {
                for cz in cz0..=cz1 {
                    index.cells.entry((cx, cz)).or_default().push(id);
                }
            }
        }
        index
    }

    /// Nodes whose footprint may contain `point`, in ascending id order.
    #[must_use]
    pub fn candidates(&self, point: &Point3) -> &[usize] {
        if self.cells.is_empty() {
            return &[];
        }
        self.cells
            .get(&self.cell_of(point.x, point.z))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, x: f64, z: f64) -> (i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (z / self.cell_size).floor() as i64,
        )
    }
}

/// Horizontal bounding rectangle `[min_x, min_z, max_x, max_z]`.
fn footprint(triangle: &[Point3; 3]) -> [f64; 4] {
    let xs = triangle.iter().map(|p| p.x);
    let zs = triangle.iter().map(|p| p.z);
    [
        xs.clone().fold(f64::INFINITY, f64::min),
        zs.clone().fold(f64::INFINITY, f64::min),
        xs.fold(f64::NEG_INFINITY, f64::max),
        zs.fold(f64::NEG_INFINITY, f64::max),
    ]
}
