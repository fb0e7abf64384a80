mod ear;

use tracing::{debug, trace};

use crate::math::Point3;
use crate::outline::Outline;
use crate::scene::SceneQuery;

/// Triangles of one island, indexed into a shared vertex array.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriangleSurface {
    /// Vertex positions, local to this surface.
    pub positions: Vec<Point3>,
    /// Vertex index triples, shifted by the index offset.
    pub triangles: Vec<[usize; 3]>,
}

/// Ear-clipping triangulation of a merged outline.
///
/// Ears whose closing diagonal passes through geometry or over a gap are
/// avoided while any other ear exists. Among valid ears the one with the
/// shortest diagonal is clipped first.
pub struct Triangulate {
    voxel_size: f64,
    index_offset: usize,
}

impl Triangulate {
    /// Creates a new `Triangulate` operation.
    #[must_use]
    pub fn new(voxel_size: f64) -> Self {
        Self {
            voxel_size,
            index_offset: 0,
        }
    }

    /// Shifts every emitted index by `offset`.
    #[must_use]
    pub fn with_index_offset(mut self, offset: usize) -> Self {
        self.index_offset = offset;
        self
    }

    /// Executes the triangulation.
    ///
    /// Returns `None` if the outline has fewer than three indices.
    pub fn execute<S: SceneQuery + ?Sized>(
        &self,
        outline: &Outline,
        scene: &S,
    ) -> Option<TriangleSurface> {
        if outline.indices.len() < 3 {
            return None;
        }
        let positions = &outline.vertices;
        let mut remaining = outline.indices.clone();
        let mut triangles = Vec::with_capacity(remaining.len() - 2);

        while remaining.len() > 3 {
            let ear = ear::find_ear(positions, &remaining, |a, c| {
                !scene.segment_blocked(c, a) && scene.floor_along(c, a, self.voxel_size)
            })
            .or_else(|| {
                trace!(remaining = remaining.len(), "no clear ear, using loose ear");
                ear::find_ear(positions, &remaining, |_, _| true)
            });
            let Some(i) = ear else {
                debug!(
                    remaining = remaining.len(),
                    "ear clipping stalled, closing with final triangle"
                );
                break;
            };

            let n = remaining.len();
            triangles.push(self.shift([
                remaining[(i + n - 1) % n],
                remaining[i],
                remaining[(i + 1) % n],
            ]));
            remaining.remove(i);
        }
        triangles.push(self.shift([remaining[0], remaining[1], remaining[2]]));

        Some(TriangleSurface {
            positions: positions.clone(),
            triangles,
        })
    }

    fn shift(&self, triangle: [usize; 3]) -> [usize; 3] {
        triangle.map(|i| i + self.index_offset)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::triangle::is_degenerate_xz;
    use crate::math::Vector3;
    use crate::scene::{Aabb, BoxScene};

    /// A scene with floor everywhere and no obstacles.
    struct OpenFloor;

    impl SceneQuery for OpenFloor {
        fn raycast(&self, origin: &Point3, direction: &Vector3, max_distance: f64, _: bool) -> Option<Point3> {
            (direction.y < 0.0 && origin.y > 0.0 && origin.y <= max_distance)
                .then(|| Point3::new(origin.x, 0.0, origin.z))
        }

        fn box_overlap(&self, _: &Point3, _: &Vector3) -> bool {
            false
        }

        fn bounds(&self) -> Aabb {
            Aabb::new(Point3::new(-100.0, -1.0, -100.0), Point3::new(100.0, 0.0, 100.0))
        }
    }

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.25, z)
    }

    fn outline(vertices: Vec<Point3>) -> Outline {
        let indices = (0..vertices.len()).collect();
        Outline { vertices, indices }
    }

    #[test]
    fn square_gives_two_triangles() {
        let square = outline(vec![p(0.0, 0.0), p(0.0, 4.0), p(4.0, 4.0), p(4.0, 0.0)]);
        let surface = Triangulate::new(0.5).execute(&square, &OpenFloor).unwrap();
        assert_eq!(surface.triangles.len(), 2);
    }

    #[test]
    fn simple_polygon_gives_n_minus_two() {
        // Clockwise L shape.
        let l_shape = outline(vec![
            p(0.0, 0.0),
            p(0.0, 4.0),
            p(2.0, 4.0),
            p(2.0, 2.0),
            p(4.0, 2.0),
            p(4.0, 0.0),
        ]);
        let surface = Triangulate::new(0.5).execute(&l_shape, &OpenFloor).unwrap();
        assert_eq!(surface.triangles.len(), 4);
        for t in &surface.triangles {
            let [a, b, c] = t.map(|i| surface.positions[i]);
            assert!(!is_degenerate_xz(&a, &b, &c));
        }
    }

    #[test]
    fn index_offset_shifts_triangles() {
        let square = outline(vec![p(0.0, 0.0), p(0.0, 4.0), p(4.0, 4.0), p(4.0, 0.0)]);
        let surface = Triangulate::new(0.5)
            .with_index_offset(10)
            .execute(&square, &OpenFloor)
            .unwrap();
        assert!(surface.triangles.iter().flatten().all(|&i| (10..14).contains(&i)));
    }

    #[test]
    fn too_few_indices() {
        let line = outline(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        assert!(Triangulate::new(0.5).execute(&line, &OpenFloor).is_none());
    }

    #[test]
    fn shortest_diagonal_is_clipped_first() {
        // Clockwise right trapezoid: the short diagonal runs from (0, 0) to (2, 2).
        let trapezoid = outline(vec![p(0.0, 0.0), p(0.0, 2.0), p(2.0, 2.0), p(6.0, 0.0)]);
        let surface = Triangulate::new(0.5).execute(&trapezoid, &OpenFloor).unwrap();
        assert_eq!(surface.triangles[0], [0, 1, 2]);
    }

    #[test]
    fn bridged_hole_covers_ring() {
        let scene = BoxScene::new()
            .with_box(Point3::new(-1.0, -1.0, -1.0), Point3::new(11.0, 0.0, 11.0))
            .with_box(Point3::new(4.0, 0.0, 4.0), Point3::new(6.0, 2.0, 6.0));
        let merged = Outline {
            vertices: vec![
                p(0.0, 10.0),
                p(10.0, 10.0),
                p(10.0, 0.0),
                p(0.0, 0.0),
                p(3.9, 3.9),
                p(6.1, 3.9),
                p(6.1, 6.1),
                p(3.9, 6.1),
            ],
            indices: vec![0, 1, 2, 3, 4, 5, 6, 7, 4, 3],
        };
        let surface = Triangulate::new(0.5).execute(&merged, &scene).unwrap();
        assert_eq!(surface.triangles.len(), 8);
        // No triangle covers the pillar center.
        let center = Point3::new(5.0, 0.25, 5.0);
        for t in &surface.triangles {
            let [a, b, c] = t.map(|i| surface.positions[i]);
            assert!(!crate::math::triangle::point_in_triangle_xz(&center, &a, &b, &c));
        }
    }
}
