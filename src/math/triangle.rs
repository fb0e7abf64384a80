use super::{xz, Point2, Point3, Vector3};

/// Upward-facing unit normal of triangle `abc`.
///
/// Degenerate triangles report the world up axis.
#[must_use]
pub fn triangle_normal_up(a: &Point3, b: &Point3, c: &Point3) -> Vector3 {
    let n = (a - b).cross(&(b - c));
    let n = if n.y < 0.0 { -n } else { n };
    n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::y)
}

/// Returns `true` if `p1` and `p2` lie on the same side of the line `a -> b`.
///
/// Points on the line count as being on both sides.
#[must_use]
pub fn same_side(p1: &Point2, p2: &Point2, a: &Point2, b: &Point2) -> bool {
    let ab = b - a;
    let cp1 = ab.x * (p1.y - a.y) - ab.y * (p1.x - a.x);
    let cp2 = ab.x * (p2.y - a.y) - ab.y * (p2.x - a.x);
    cp1 * cp2 >= 0.0
}

/// 2D point-in-triangle test, inclusive of edges.
///
/// A point coinciding with one of the corners is reported as outside.
#[must_use]
pub fn point_in_triangle_2d(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    if (a - p).norm() < f64::EPSILON
        || (b - p).norm() < f64::EPSILON
        || (c - p).norm() < f64::EPSILON
    {
        return false;
    }
    same_side(p, c, a, b) && same_side(p, a, b, c) && same_side(p, b, c, a)
}

/// Horizontal point-in-triangle test on 3D points.
#[must_use]
pub fn point_in_triangle_xz(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> bool {
    point_in_triangle_2d(&xz(p), &xz(a), &xz(b), &xz(c))
}

/// 3D point-in-triangle test.
///
/// The point must lie within `max_plane_distance` of the triangle's plane
/// and inside its horizontal projection. Corner-coincident points are
/// reported as outside.
#[must_use]
pub fn point_in_triangle(
    p: &Point3,
    a: &Point3,
    b: &Point3,
    c: &Point3,
    max_plane_distance: f64,
) -> bool {
    if (a - p).norm() < f64::EPSILON
        || (b - p).norm() < f64::EPSILON
        || (c - p).norm() < f64::EPSILON
    {
        return false;
    }
    let plane_distance = triangle_normal_up(a, b, c).dot(&(p - a)).abs();
    if plane_distance > max_plane_distance {
        return false;
    }
    point_in_triangle_xz(p, a, b, c)
}

/// Returns `true` if the three points are collinear in the horizontal plane.
#[must_use]
pub fn is_degenerate_xz(a: &Point3, b: &Point3, c: &Point3) -> bool {
    let ab = b - a;
    let ac = c - a;
    (ab.x * ac.z - ab.z * ac.x).abs() < super::TOLERANCE
}
