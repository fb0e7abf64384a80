mod grid;
mod set;
mod surfaces;
mod voxelize;

pub use grid::VoxelGrid;
pub use set::VoxelSet;
pub use surfaces::SplitSurfaces;
pub use voxelize::Voxelize;

/// One cell of the voxel grid, addressed by integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Voxel {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The voxel displaced by `(dx, dy, dz)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Horizontal neighbor offsets `(dx, dz)`: the four edge neighbors first,
/// then the four diagonals.
pub const HORIZONTAL_NEIGHBORS: [(i32, i32); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
];

/// The four edge-adjacent horizontal offsets.
#[must_use]
pub fn edge_neighbors() -> &'static [(i32, i32)] {
    &HORIZONTAL_NEIGHBORS[..4]
}

/// Vertical offsets at which a horizontal neighbor still counts as adjacent.
pub const VERTICAL_WINDOW: [i32; 3] = [-1, 0, 1];
