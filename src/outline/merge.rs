use std::f64::consts::TAU;

use tracing::{trace, warn};

use super::Outline;
use crate::math::polygon_xz::signed_angle_xz;
use crate::math::Point3;
use crate::scene::SceneQuery;

/// Splices each hole into the outer boundary through a zero-width bridge.
///
/// The hole ring is inserted after the outline vertex it bridges to, with
/// its bridge vertex repeated so the walk returns along the same segment.
/// Holes that cannot be bridged are dropped from the outline.
pub(super) fn merge_holes<S: SceneQuery + ?Sized>(
    outer: Vec<Point3>,
    holes: Vec<Vec<Point3>>,
    scene: &S,
    voxel_size: f64,
) -> Outline {
    let mut indices: Vec<usize> = (0..outer.len()).collect();
    let mut vertices = outer;

    for (hole_index, hole) in holes.into_iter().enumerate() {
        let Some((outline_vertex, hole_vertex)) = find_bridge(&vertices, &hole, scene, voxel_size)
        else {
            warn!(hole = hole_index, vertices = hole.len(), "hole could not be bridged, dropping it");
            continue;
        };
        let target = hole[hole_vertex];
        let Some(position) = splice_position(&vertices, &indices, outline_vertex, &target) else {
            continue;
        };

        let base = vertices.len();
        let ring = hole.len();
        let spliced = (0..ring)
            .map(|k| base + (hole_vertex + k) % ring)
            .chain([base + hole_vertex, outline_vertex]);
        indices.splice(position + 1..position + 1, spliced);
        vertices.extend(hole);

        trace!(hole = hole_index, outline_vertex, hole_vertex, "bridged hole");
    }

    Outline { vertices, indices }
}

/// Position in `indices` after which a bridge from `outline_vertex` towards
/// `target` is spliced.
///
/// A vertex already used by an earlier bridge appears more than once. The
/// chosen occurrence is the one whose interior wedge, swept counter-clockwise
/// in the `(x, z)` plane from the previous to the next loop vertex, holds the
/// bridge direction.
fn splice_position(
    vertices: &[Point3],
    indices: &[usize],
    outline_vertex: usize,
    target: &Point3,
) -> Option<usize> {
    let n = indices.len();
    let apex = vertices.get(outline_vertex)?;
    let bridge = target - apex;
    let mut occurrences = indices
        .iter()
        .enumerate()
        .filter(|&(_, &i)| i == outline_vertex)
        .map(|(k, _)| k);
    let first = occurrences.next()?;

    let in_wedge = |k: usize| {
        let prev = &vertices[indices[(k + n - 1) % n]];
        let next = &vertices[indices[(k + 1) % n]];
        let from = prev - apex;
        let wedge = signed_angle_xz(&from, &(next - apex)).rem_euclid(TAU);
        let direction = signed_angle_xz(&from, &bridge).rem_euclid(TAU);
        direction < wedge
    };
    if in_wedge(first) {
        return Some(first);
    }
    Some(occurrences.find(|&k| in_wedge(k)).unwrap_or(first))
}

/// Closest `(outline vertex, hole vertex)` pair whose connecting segment is
/// clear of geometry and has floor underneath.
fn find_bridge<S: SceneQuery + ?Sized>(
    vertices: &[Point3],
    hole: &[Point3],
    scene: &S,
    voxel_size: f64,
) -> Option<(usize, usize)> {
    let mut pairs: Vec<(usize, usize, f64)> = vertices
        .iter()
        .enumerate()
        .flat_map(|(i, v)| {
            hole.iter()
                .enumerate()
                .map(move |(j, h)| (i, j, (v - h).norm_squared()))
        })
        .collect();
    pairs.sort_by(|a, b| a.2.total_cmp(&b.2));

    pairs
        .into_iter()
        .find(|&(i, j, _)| {
            let (inner, outer) = (&hole[j], &vertices[i]);
            !scene.segment_blocked(inner, outer) && scene.floor_along(inner, outer, voxel_size)
        })
        .map(|(i, j, _)| (i, j))
}
