use tracing::debug;

use super::{Voxel, VoxelGrid, VoxelSet};
use crate::math::{Point3, Vector3};
use crate::scene::SceneQuery;

/// Shrinks probe footprints so rays do not graze the edges of neighboring geometry.
const LENIENCY: f64 = 0.99;

/// Result of probing one column position with four downward rays.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FloorProbe {
    /// At least one ray missed.
    Miss,
    /// All rays hit but their heights spread by a voxel or more.
    Uneven { highest: f64 },
    /// All rays hit within one voxel height of each other.
    Floor { highest: f64 },
}

/// Finds floor voxels by sweeping each grid column from the top of the
/// scene downwards.
///
/// A column can yield several floor voxels when walkable surfaces are
/// stacked above each other.
pub struct Voxelize {
    grid: VoxelGrid,
}

impl Voxelize {
    /// Creates a new `Voxelize` operation over `grid`.
    #[must_use]
    pub fn new(grid: VoxelGrid) -> Self {
        Self { grid }
    }

    /// Executes the sweep, returning every floor voxel found.
    pub fn execute<S: SceneQuery + ?Sized>(&self, scene: &S) -> VoxelSet {
        let (columns_x, layers, columns_z) = self.grid.dimensions();
        let bottom = self.grid.bounds().min.y;
        let mut floor = VoxelSet::new();

        for x in 0..columns_x {
            for z in 0..columns_z {
                let mut cursor = Voxel::new(x, layers + 1, z);
                loop {
                    let center = self.grid.center(cursor);
                    if center.y < bottom {
                        break;
                    }
                    let highest = match self.probe(scene, &center) {
                        FloorProbe::Miss => break,
                        FloorProbe::Uneven { highest } => highest,
                        FloorProbe::Floor { highest } => {
                            cursor.y = self.grid.layer_at(highest);
                            if let Some(voxel) = self.free_candidate(scene, cursor) {
                                floor.insert(voxel);
                            }
                            highest
                        }
                    };
                    if highest < bottom {
                        break;
                    }
                    cursor.y = self.grid.layer_at(highest) - 2;
                }
            }
        }

        debug!(voxels = floor.len(), "voxelized scene");
        floor
    }

    /// Casts four shrunken corner rays straight down from `center`.
    fn probe<S: SceneQuery + ?Sized>(&self, scene: &S, center: &Point3) -> FloorProbe {
        let half = self.grid.voxel_size() * 0.5 * LENIENCY;
        let corners = [
            Vector3::new(half, 0.0, half),
            Vector3::new(-half, 0.0, -half),
            Vector3::new(half, 0.0, -half),
            Vector3::new(-half, 0.0, half),
        ];
        let down = -Vector3::y();

        let mut lowest = f64::INFINITY;
        let mut highest = f64::NEG_INFINITY;
        for corner in &corners {
            let Some(hit) = scene.raycast(&(center + corner), &down, f64::INFINITY, true) else {
                return FloorProbe::Miss;
            };
            lowest = lowest.min(hit.y);
            highest = highest.max(hit.y);
        }

        if highest - lowest > self.grid.voxel_size() - f64::EPSILON {
            FloorProbe::Uneven { highest }
        } else {
            FloorProbe::Floor { highest }
        }
    }

    /// Returns `candidate` if it is free of geometry, otherwise the voxel
    /// above it if that one is free.
    fn free_candidate<S: SceneQuery + ?Sized>(&self, scene: &S, candidate: Voxel) -> Option<Voxel> {
        let half_extents = Vector3::repeat(self.grid.voxel_size() * 0.5 * LENIENCY);
        [candidate, candidate.offset(0, 1, 0)]
            .into_iter()
            .find(|v| !scene.box_overlap(&self.grid.center(*v), &half_extents))
    }
}
