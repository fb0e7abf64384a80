use crate::math::polygon_xz::turn_angle_xz;
use crate::math::{segment::lerp, Point3};
use crate::scene::SceneQuery;

fn corner(polygon: &[Point3], i: usize) -> (&Point3, &Point3, &Point3) {
    let n = polygon.len();
    (&polygon[(i + n - 1) % n], &polygon[i], &polygon[(i + 1) % n])
}

/// Removes vertices whose horizontal turning angle is exactly zero.
pub(super) fn remove_collinear(polygon: &mut Vec<Point3>) {
    while polygon.len() > 3 {
        let Some(i) = (0..polygon.len()).find(|&i| {
            let (a, b, c) = corner(polygon, i);
            turn_angle_xz(a, b, c) == 0.0
        }) else {
            break;
        };
        polygon.remove(i);
    }
}

/// Removes vertices whose chord stays clear of geometry and over floor.
///
/// The outer boundary winds clockwise in the `(x, z)` plane and may only
/// lose reflex corners, so it never grows over unwalkable ground. Holes wind
/// the other way and lose their convex corners instead. Collinear vertices
/// are always candidates.
pub(super) fn simplify<S: SceneQuery + ?Sized>(
    polygon: &mut Vec<Point3>,
    is_hole: bool,
    scene: &S,
    voxel_size: f64,
) {
    while polygon.len() > 3 {
        let removable = (0..polygon.len()).find(|&i| {
            let (a, b, c) = corner(polygon, i);
            let alpha = turn_angle_xz(a, b, c);
            if alpha != 0.0 {
                let convex = if is_hole { alpha > 0.0 } else { alpha < 0.0 };
                if convex != is_hole {
                    return false;
                }
            }
            !scene.segment_blocked(c, a)
                && scene.has_floor_below(&lerp(c, a, 0.5), voxel_size)
                && scene.floor_along(c, a, voxel_size)
        });
        let Some(i) = removable else {
            break;
        };
        polygon.remove(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::BoxScene;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.25, z)
    }

    fn floor() -> BoxScene {
        BoxScene::new().with_box(Point3::new(-5.0, -1.0, -5.0), Point3::new(15.0, 0.0, 15.0))
    }

    #[test]
    fn collinear_vertices_go() {
        let mut poly = vec![p(0.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(2.0, 2.0), p(2.0, 0.0), p(1.0, 0.0)];
        remove_collinear(&mut poly);
        assert_eq!(poly, vec![p(0.0, 0.0), p(0.0, 2.0), p(2.0, 2.0), p(2.0, 0.0)]);
    }

    #[test]
    fn triangle_is_left_alone() {
        let mut poly = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        remove_collinear(&mut poly);
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn outer_loses_notch_but_keeps_corners() {
        // Clockwise square with a one-unit notch pushed into its south edge.
        let mut poly = vec![
            p(0.0, 0.0),
            p(0.0, 4.0),
            p(4.0, 4.0),
            p(4.0, 0.0),
            p(2.5, 0.0),
            p(2.0, 1.0),
            p(1.5, 0.0),
        ];
        simplify(&mut poly, false, &floor(), 0.5);
        assert_eq!(poly.len(), 4);
        assert!(!poly.contains(&p(2.0, 1.0)));
    }

    #[test]
    fn blocked_chord_keeps_vertex() {
        let scene = floor().with_box(Point3::new(1.8, 0.0, -0.5), Point3::new(2.2, 2.0, 0.5));
        let mut poly = vec![
            p(0.0, 0.0),
            p(0.0, 4.0),
            p(4.0, 4.0),
            p(4.0, 0.0),
            p(2.5, 0.0),
            p(2.0, 1.0),
            p(1.5, 0.0),
        ];
        simplify(&mut poly, false, &scene, 0.5);
        assert!(poly.contains(&p(2.0, 1.0)));
    }

    #[test]
    fn hole_loses_convex_corner() {
        // Counter-clockwise hole with an obstacle only inside the square part.
        let scene = floor().with_box(Point3::new(4.1, 0.0, 4.1), Point3::new(5.9, 2.0, 5.9));
        let mut poly = vec![
            p(4.0, 4.0),
            p(6.0, 4.0),
            p(6.0, 6.0),
            p(5.0, 8.0),
            p(4.0, 6.0),
        ];
        simplify(&mut poly, true, &scene, 0.5);
        assert!(!poly.contains(&p(5.0, 8.0)));
        assert_eq!(poly.len(), 4);
    }
}
