use std::f64::consts::PI;

use crate::math::polygon_xz::turn_angle_xz;
use crate::math::triangle::point_in_triangle;
use crate::math::Point3;

/// How far off the ear's plane a vertex may be and still block the ear.
const EAR_PLANE_TOLERANCE: f64 = 0.05;

/// Finds the ear of `remaining` with the shortest closing diagonal.
///
/// An ear turns right in the `(x, z)` plane and contains no other vertex of
/// the loop. `diagonal_clear(a, c)` adds a caller-specific test on the
/// closing diagonal. Ties go to the first ear found.
pub(super) fn find_ear<F>(positions: &[Point3], remaining: &[usize], diagonal_clear: F) -> Option<usize>
where
    F: Fn(&Point3, &Point3) -> bool,
{
    let n = remaining.len();
    let mut best: Option<(usize, f64)> = None;

    for i in 0..n {
        let (ia, ic) = ((i + n - 1) % n, (i + 1) % n);
        let a = &positions[remaining[ia]];
        let b = &positions[remaining[i]];
        let c = &positions[remaining[ic]];

        let interior = -turn_angle_xz(a, b, c);
        if interior <= 0.0 || interior >= PI {
            continue;
        }
        let diagonal = (a - c).norm_squared();
        if best.is_some_and(|(_, shortest)| diagonal >= shortest) {
            continue;
        }
        let blocked = (0..n)
            .filter(|&k| k != ia && k != i && k != ic)
            .any(|k| point_in_triangle(&positions[remaining[k]], a, b, c, EAR_PLANE_TOLERANCE));
        if blocked || !diagonal_clear(a, c) {
            continue;
        }
        best = Some((i, diagonal));
    }

    best.map(|(i, _)| i)
}
