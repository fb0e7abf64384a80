use std::collections::VecDeque;

use tracing::debug;

use super::{edge_neighbors, VoxelSet};

/// Partitions floor voxels into connected walkable islands.
///
/// Two voxels are connected when they are edge neighbors horizontally and
/// differ by at most one layer vertically.
pub struct SplitSurfaces {
    voxels: VoxelSet,
}

impl SplitSurfaces {
    /// Creates a new `SplitSurfaces` operation that takes ownership of `voxels`.
    #[must_use]
    pub fn new(voxels: VoxelSet) -> Self {
        Self { voxels }
    }

    /// Drains the voxel set into islands. Island order is unspecified.
    #[must_use]
    pub fn execute(self) -> Vec<VoxelSet> {
        let mut remaining = self.voxels;
        let mut islands = Vec::new();

        while let Some(seed) = remaining.pop() {
            let mut island = VoxelSet::new();
            let mut queue = VecDeque::from([seed]);
            island.insert(seed);

            while let Some(voxel) = queue.pop_front() {
                for &(dx, dz) in edge_neighbors() {
                    while let Some(next) = remaining.find_near(voxel, dx, dz) {
                        remaining.remove(&next);
                        island.insert(next);
                        queue.push_back(next);
                    }
                }
            }
            islands.push(island);
        }

        debug!(islands = islands.len(), "split floor into islands");
        islands
    }
}
