use super::crossing::Waypoint;
use crate::math::segment::{segment_fraction, taut_point_on_line};

/// Pulls the path taut by sliding each interior waypoint along its edge.
///
/// Each pass moves every interior waypoint to the point of its edge that
/// minimizes the distance through its current neighbors. The path never
/// gets longer.
pub(super) fn straighten(waypoints: &mut [Waypoint], iterations: usize) {
    if waypoints.len() < 3 {
        return;
    }
    for _ in 0..iterations {
        for i in 1..waypoints.len() - 1 {
            let prev = waypoints[i - 1].position();
            let next = waypoints[i + 1].position();
            let w = &mut waypoints[i];
            let target = taut_point_on_line(&w.a, &w.b, &prev, &next);
            w.t = segment_fraction(&target, &w.a, &w.b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::pathfinding::path_length;

    fn crossing(a: (f64, f64), b: (f64, f64), t: f64) -> Waypoint {
        Waypoint {
            a: Point3::new(a.0, 0.0, a.1),
            b: Point3::new(b.0, 0.0, b.1),
            t,
        }
    }

    fn positions(waypoints: &[Waypoint]) -> Vec<Point3> {
        waypoints.iter().map(Waypoint::position).collect()
    }

    #[test]
    fn single_crossing_snaps_to_line() {
        let mut path = vec![
            Waypoint::fixed(Point3::new(0.0, 0.0, 0.0)),
            crossing((2.0, -5.0), (2.0, 5.0), 0.9),
            Waypoint::fixed(Point3::new(4.0, 0.0, 2.0)),
        ];
        straighten(&mut path, 1);
        let mid = path[1].position();
        assert!((mid.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_clamps_to_edge() {
        // The straight line passes beyond the end of the edge.
        let mut path = vec![
            Waypoint::fixed(Point3::new(0.0, 0.0, 4.0)),
            crossing((2.0, 0.0), (2.0, 2.0), 0.5),
            Waypoint::fixed(Point3::new(4.0, 0.0, 4.0)),
        ];
        straighten(&mut path, 3);
        assert!((path[1].t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn more_iterations_never_lengthen() {
        let base = vec![
            Waypoint::fixed(Point3::new(0.0, 0.0, 0.0)),
            crossing((1.0, -3.0), (1.0, 3.0), 0.1),
            crossing((2.0, -3.0), (2.0, 3.0), 0.9),
            crossing((3.0, -3.0), (3.0, 3.0), 0.2),
            Waypoint::fixed(Point3::new(4.0, 0.0, 1.0)),
        ];
        let mut previous = path_length(&positions(&base));
        for iterations in 1..6 {
            let mut path = base.clone();
            straighten(&mut path, iterations);
            let length = path_length(&positions(&path));
            assert!(length <= previous + 1e-12);
            previous = length;
        }
    }

    #[test]
    fn zero_iterations_is_identity() {
        let base = vec![
            Waypoint::fixed(Point3::new(0.0, 0.0, 0.0)),
            crossing((1.0, -3.0), (1.0, 3.0), 0.1),
            Waypoint::fixed(Point3::new(2.0, 0.0, 0.0)),
        ];
        let mut path = base.clone();
        straighten(&mut path, 0);
        assert_eq!(path, base);
    }
}
