use super::Voxel;
use crate::error::{BakeError, Result};
use crate::math::Point3;
use crate::scene::Aabb;

/// A regular grid anchored at the minimum corner of the scene bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelGrid {
    bounds: Aabb,
    voxel_size: f64,
}

impl VoxelGrid {
    /// Creates a grid over `bounds` with cubic cells of `voxel_size`.
    ///
    /// # Errors
    ///
    /// Returns [`BakeError::InvalidParameters`] if `voxel_size` is not a
    /// positive finite number, or [`BakeError::EmptyScene`] if the bounds
    /// are degenerate.
    pub fn new(bounds: Aabb, voxel_size: f64) -> Result<Self> {
        if !voxel_size.is_finite() || voxel_size <= 0.0 {
            return Err(BakeError::InvalidParameters(format!(
                "voxel size must be positive and finite, got {voxel_size}"
            ))
            .into());
        }
        if bounds.is_degenerate() {
            return Err(BakeError::EmptyScene.into());
        }
        Ok(Self { bounds, voxel_size })
    }

    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[must_use]
    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Number of columns along x and z, and of layers along y.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn dimensions(&self) -> (i32, i32, i32) {
        let size = self.bounds.size();
        (
            (size.x / self.voxel_size).round() as i32,
            (size.y / self.voxel_size).ceil() as i32,
            (size.z / self.voxel_size).round() as i32,
        )
    }

    /// World position of the center of `voxel`.
    #[must_use]
    pub fn center(&self, voxel: Voxel) -> Point3 {
        self.world_point(f64::from(voxel.x), f64::from(voxel.y), f64::from(voxel.z))
    }

    /// World position of fractional grid coordinates, offset to cell centers.
    #[must_use]
    pub fn world_point(&self, x: f64, y: f64, z: f64) -> Point3 {
        let min = &self.bounds.min;
        Point3::new(
            min.x + (x + 0.5) * self.voxel_size,
            min.y + (y + 0.5) * self.voxel_size,
            min.z + (z + 0.5) * self.voxel_size,
        )
    }

    /// Layer index of the voxel whose lower half contains world height `y`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn layer_at(&self, y: f64) -> i32 {
        ((y - self.bounds.min.y) / self.voxel_size).round() as i32
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::NavError;

    fn grid() -> VoxelGrid {
        let bounds = Aabb::new(Point3::new(0.0, -1.0, 0.0), Point3::new(10.0, 0.0, 10.0));
        VoxelGrid::new(bounds, 0.5).unwrap()
    }

    #[test]
    fn dimensions_cover_bounds() {
        assert_eq!(grid().dimensions(), (20, 2, 20));
    }

    #[test]
    fn center_of_voxel() {
        let c = grid().center(Voxel::new(0, 2, 3));
        assert!((c.x - 0.25).abs() < 1e-12);
        assert!((c.y - 0.25).abs() < 1e-12);
        assert!((c.z - 1.75).abs() < 1e-12);
    }

    #[test]
    fn layer_snaps_to_floor_voxel() {
        assert_eq!(grid().layer_at(0.0), 2);
    }

    #[test]
    fn rejects_bad_size() {
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert!(matches!(
            VoxelGrid::new(bounds, 0.0),
            Err(NavError::Bake(BakeError::InvalidParameters(_)))
        ));
        assert!(matches!(
            VoxelGrid::new(bounds, f64::NAN),
            Err(NavError::Bake(BakeError::InvalidParameters(_)))
        ));
    }

    #[test]
    fn rejects_flat_bounds() {
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            VoxelGrid::new(bounds, 0.5),
            Err(NavError::Bake(BakeError::EmptyScene))
        ));
    }
}
