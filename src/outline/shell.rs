use crate::voxel::{Voxel, VoxelSet};

/// Horizontal neighbors in ring order around a voxel. Consecutive entries
/// (including last and first) touch each other.
const RING: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Returns the boundary voxels of an island.
///
/// A voxel is interior when all eight horizontal neighbors are present
/// within one layer and no two touching neighbors differ by two layers.
#[must_use]
pub fn extract_shell(island: &VoxelSet) -> VoxelSet {
    let mut shell = island.clone();
    shell.filter(|voxel, all| is_interior(*voxel, all));
    shell
}

fn is_interior(voxel: Voxel, all: &VoxelSet) -> bool {
    let mut heights = [0; RING.len()];
    for (slot, &(dx, dz)) in heights.iter_mut().zip(RING.iter()) {
        let Some(neighbor) = all.find_near(voxel, dx, dz) else {
            return false;
        };
        *slot = neighbor.y - voxel.y;
    }
    (0..RING.len()).all(|i| (heights[i] - heights[(i + 1) % RING.len()]).abs() < 2)
}
