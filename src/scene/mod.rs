mod box_scene;

pub use box_scene::BoxScene;

use crate::math::{Point3, Vector3};

/// How far below a sample point floor support is searched for, in voxels.
pub const FLOOR_PROBE_DEPTH: f64 = 1.5;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from two corners.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Extent of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[must_use]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Returns `true` if the box has no volume or non-finite corners.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !size.iter().all(|s| s.is_finite() && *s > 0.0)
    }
}

/// The scene queries a bake needs from its host.
///
/// Implementations wrap whatever collision backend the host has. A bake calls
/// these from a single thread and never concurrently.
pub trait SceneQuery {
    /// Casts a ray and returns the closest hit point within `max_distance`.
    ///
    /// `direction` need not be normalized. With `ignore_backfaces`, geometry
    /// enclosing the ray origin is not reported.
    fn raycast(
        &self,
        origin: &Point3,
        direction: &Vector3,
        max_distance: f64,
        ignore_backfaces: bool,
    ) -> Option<Point3>;

    /// Returns `true` if an axis-aligned box overlaps any solid geometry.
    fn box_overlap(&self, center: &Point3, half_extents: &Vector3) -> bool;

    /// Axis-aligned bounds of all walkable geometry.
    fn bounds(&self) -> Aabb;

    /// Returns `true` if geometry lies on the straight segment `from -> to`.
    fn segment_blocked(&self, from: &Point3, to: &Point3) -> bool {
        let delta = to - from;
        let distance = delta.norm();
        if distance < crate::math::TOLERANCE {
            return false;
        }
        self.raycast(from, &delta, distance, false).is_some()
    }

    /// Returns `true` if there is floor within `FLOOR_PROBE_DEPTH` voxels below `point`.
    fn has_floor_below(&self, point: &Point3, voxel_size: f64) -> bool {
        self.raycast(
            point,
            &-Vector3::y(),
            voxel_size * FLOOR_PROBE_DEPTH,
            false,
        )
        .is_some()
    }

    /// Checks floor support at every whole voxel step from `from` towards `to`.
    ///
    /// Samples `from + k * voxel_size` for `k` in `0..floor(len / voxel_size)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn floor_along(&self, from: &Point3, to: &Point3, voxel_size: f64) -> bool {
        let delta = to - from;
        let distance = delta.norm();
        if distance < crate::math::TOLERANCE {
            return true;
        }
        let dir = delta / distance;
        let steps = (distance / voxel_size).floor() as usize;
        (0..steps).all(|k| {
            #[allow(clippy::cast_precision_loss)]
            let sample = from + dir * (k as f64 * voxel_size);
            self.has_floor_below(&sample, voxel_size)
        })
    }
}
