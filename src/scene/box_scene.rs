use parry3d_f64::bounding_volume::{self, BoundingVolume};
use parry3d_f64::na;
use parry3d_f64::query::{Ray, RayCast};

use super::{Aabb, SceneQuery};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A scene made of solid axis-aligned boxes.
///
/// Every box is both walkable (its top face is floor) and an obstacle.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    boxes: Vec<bounding_volume::Aabb>,
}

fn to_parry(p: &Point3) -> na::Point3<f64> {
    na::Point3::new(p.x, p.y, p.z)
}

fn from_parry(p: &na::Point3<f64>) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

impl BoxScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a solid box spanning `min` to `max`.
    pub fn add_box(&mut self, min: Point3, max: Point3) {
        self.boxes
            .push(bounding_volume::Aabb::new(to_parry(&min), to_parry(&max)));
    }

    /// Builder form of [`BoxScene::add_box`].
    #[must_use]
    pub fn with_box(mut self, min: Point3, max: Point3) -> Self {
        self.add_box(min, max);
        self
    }

    /// Number of boxes in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if the scene holds no boxes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl SceneQuery for BoxScene {
    fn raycast(
        &self,
        origin: &Point3,
        direction: &Vector3,
        max_distance: f64,
        ignore_backfaces: bool,
    ) -> Option<Point3> {
        let dir = direction.try_normalize(TOLERANCE)?;
        let ray = Ray::new(
            to_parry(origin),
            na::Vector3::new(dir.x, dir.y, dir.z),
        );
        let origin_p = to_parry(origin);
        self.boxes
            .iter()
            .filter(|b| !(ignore_backfaces && b.contains_local_point(&origin_p)))
            .filter_map(|b| b.cast_local_ray(&ray, max_distance, false))
            .min_by(f64::total_cmp)
            .map(|toi| from_parry(&ray.point_at(toi)))
    }

    fn box_overlap(&self, center: &Point3, half_extents: &Vector3) -> bool {
        let query = bounding_volume::Aabb::new(
            to_parry(&(center - half_extents)),
            to_parry(&(center + half_extents)),
        );
        self.boxes.iter().any(|b| b.intersects(&query))
    }

    fn bounds(&self) -> Aabb {
        let mut iter = self.boxes.iter();
        let Some(first) = iter.next() else {
            return Aabb::new(Point3::origin(), Point3::origin());
        };
        let merged = iter.fold(*first, |acc, b| acc.merged(b));
        Aabb::new(from_parry(&merged.mins), from_parry(&merged.maxs))
    }
}
