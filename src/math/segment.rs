use super::{Point3, TOLERANCE};

/// Parameter of the projection of `p` onto segment `a -> b`, clamped to `[0, 1]`.
///
/// Degenerate segments return `0`.
#[must_use]
pub fn segment_fraction(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Closest point on segment `a -> b` to `p`.
#[must_use]
pub fn project_onto_segment(p: &Point3, a: &Point3, b: &Point3) -> Point3 {
    lerp(a, b, segment_fraction(p, a, b))
}

/// Point on the infinite line through `a` and `b` where a taut string from
/// `c` to `d` would touch it.
///
/// Both `c` and `d` are projected onto the line; the result weights the two
/// projections by the opposite point's distance to the line. When `c` and `d`
/// lie on opposite sides in a common plane this is the crossing of `c -> d`
/// with the line; otherwise it is the minimizer of `|c - p| + |p - d|`.
#[must_use]
pub fn taut_point_on_line(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Point3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return *a;
    }
    let proj_c = a + ab * ((c - a).dot(&ab) / len_sq);
    let proj_d = a + ab * ((d - a).dot(&ab) / len_sq);
    let dist_c = (proj_c - c).norm();
    let dist_d = (proj_d - d).norm();
    if dist_c == 0.0 {
        return proj_c;
    }
    if dist_d == 0.0 {
        return proj_d;
    }
    Point3::from((proj_c.coords * dist_d + proj_d.coords * dist_c) / (dist_c + dist_d))
}
