mod decimate;
mod march;
mod merge;
mod shell;

pub use shell::extract_shell;

use tracing::{debug, trace};

use crate::math::polygon_xz::{circumference, exterior_angle_sum};
use crate::math::Point3;
use crate::scene::SceneQuery;
use crate::voxel::{VoxelGrid, VoxelSet};

/// A single boundary loop with its holes spliced in.
///
/// `indices` walks `vertices` as one closed polygon. Bridge vertices appear
/// twice.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    pub vertices: Vec<Point3>,
    pub indices: Vec<usize>,
}

/// Oriented and decimated polygons of an island before hole merging.
///
/// The outer boundary winds clockwise in the `(x, z)` plane, which is
/// counter-clockwise when viewed from above. Holes wind the other way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IslandPolygons {
    pub outer: Vec<Point3>,
    pub holes: Vec<Vec<Point3>>,
}

/// Turns one floor island into a merged boundary polygon.
pub struct GenerateOutline {
    grid: VoxelGrid,
}

impl GenerateOutline {
    /// Creates a new `GenerateOutline` operation on `grid`.
    #[must_use]
    pub fn new(grid: VoxelGrid) -> Self {
        Self { grid }
    }

    /// Traces, orients and simplifies the island's boundary loops.
    ///
    /// Returns `None` if the island has no closed boundary.
    pub fn polygons<S: SceneQuery + ?Sized>(
        &self,
        island: &VoxelSet,
        scene: &S,
    ) -> Option<IslandPolygons> {
        let shell = extract_shell(island);
        let mut polygons = march::trace_polygons(&shell, island, &self.grid);
        if polygons.is_empty() {
            trace!(voxels = island.len(), "island has no closed boundary");
            return None;
        }

        for polygon in &mut polygons {
            decimate::remove_collinear(polygon);
        }
        polygons.sort_by(|a, b| circumference(b).total_cmp(&circumference(a)));

        let voxel_size = self.grid.voxel_size();
        let mut polygons = polygons.into_iter();
        let mut outer = polygons.next()?;
        orient(&mut outer, false);
        decimate::simplify(&mut outer, false, scene, voxel_size);

        let holes = polygons
            .map(|mut hole| {
                orient(&mut hole, true);
                decimate::simplify(&mut hole, true, scene, voxel_size);
                hole
            })
            .collect();

        Some(IslandPolygons { outer, holes })
    }

    /// Executes the operation, returning the merged outline of the island.
    ///
    /// Returns `None` if the island has no closed boundary.
    pub fn execute<S: SceneQuery + ?Sized>(&self, island: &VoxelSet, scene: &S) -> Option<Outline> {
        let IslandPolygons { outer, holes } = self.polygons(island, scene)?;
        debug!(
            outer = outer.len(),
            holes = holes.len(),
            "outlined island"
        );
        Some(merge::merge_holes(outer, holes, scene, self.grid.voxel_size()))
    }
}

/// Reverses `polygon` if its winding does not match its role.
fn orient(polygon: &mut [Point3], is_hole: bool) {
    let sum = exterior_angle_sum(polygon);
    if (is_hole && sum < 0.0) || (!is_hole && sum > 0.0) {
        polygon.reverse();
    }
}
