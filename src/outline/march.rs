use std::collections::HashSet;

use tracing::trace;

use crate::math::Point3;
use crate::voxel::{Voxel, VoxelGrid, VoxelSet, HORIZONTAL_NEIGHBORS};

/// Headings in clockwise order when seen from above: -x, +z, +x, -z.
const HEADINGS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Heading changes tried at each step, in priority order.
const TURNS: [i32; 4] = [-1, 0, 1, 2];

/// Fraction of a voxel by which vertices are pushed away from floor.
const VERTEX_NUDGE: f64 = 0.45;

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn rotate(heading: usize, turn: i32) -> usize {
    (heading as i32 + turn).rem_euclid(4) as usize
}

/// One walk around a shell loop.
#[derive(Debug, Default)]
struct March {
    visited: HashSet<Voxel>,
    vertices: Vec<Point3>,
    total_turn: i32,
    closed: bool,
}

impl March {
    fn rank(&self) -> (bool, usize) {
        (self.closed, self.visited.len())
    }

    /// Returns `true` if `self` should replace `best` as the chosen march.
    fn beats(&self, best: &March) -> bool {
        match self.rank().cmp(&best.rank()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => {
                self.total_turn.abs() % 2 <= best.total_turn.abs() % 2
            }
        }
    }
}

/// Shell voxels among the eight horizontal neighbors on the same layer.
fn same_layer_neighbors(shell: &VoxelSet, voxel: Voxel) -> usize {
    HORIZONTAL_NEIGHBORS
        .iter()
        .filter(|&&(dx, dz)| shell.contains(&voxel.offset(dx, 0, dz)))
        .count()
}

/// Traces closed vertex loops around the shell of an island.
///
/// `floor` is the full island; it decides the direction of each vertex nudge.
pub(super) fn trace_polygons(shell: &VoxelSet, floor: &VoxelSet, grid: &VoxelGrid) -> Vec<Vec<Point3>> {
    let mut starts: Vec<(usize, Voxel)> = shell
        .iter()
        .map(|v| (same_layer_neighbors(shell, *v), *v))
        .collect();
    starts.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut consumed: HashSet<Voxel> = HashSet::new();
    let mut polygons = Vec::new();

    for &(_, start) in &starts {
        if consumed.contains(&start) {
            continue;
        }
        let mut best = March {
            total_turn: 3,
            ..March::default()
        };
        for heading in 0..HEADINGS.len() {
            let candidate = march(shell, floor, grid, start, heading);
            if candidate.beats(&best) {
                best = candidate;
            }
        }

        if best.closed && best.vertices.len() >= 3 {
            trace!(
                start = ?start,
                visited = best.visited.len(),
                vertices = best.vertices.len(),
                "traced outline loop"
            );
            polygons.push(best.vertices);
        }
        consumed.extend(best.visited);
    }
    polygons
}

fn march(shell: &VoxelSet, floor: &VoxelSet, grid: &VoxelGrid, start: Voxel, initial: usize) -> March {
    let mut result = March::default();
    result.visited.insert(start);

    let (lx, lz) = HEADINGS[rotate(initial, -1)];
    if shell.find_near(start, lx, lz).is_none() {
        return result;
    }

    let mut position = start;
    let mut heading = initial;
    // Each shell voxel can be entered at most once per heading.
    let max_steps = 4 * shell.len() + 4;
    for _ in 0..max_steps {
        let step = TURNS.iter().find_map(|&turn| {
            let next_heading = rotate(heading, turn);
            let (dx, dz) = HEADINGS[next_heading];
            shell
                .find_near(position, dx, dz)
                .map(|next| (turn, next_heading, next))
        });
        let Some((turn, next_heading, next)) = step else {
            break;
        };

        result.vertices.push(nudged_vertex(floor, grid, position));
        result.total_turn += turn;
        heading = next_heading;
        position = next;
        result.visited.insert(position);

        if position == start {
            result.closed = true;
            return result;
        }
    }

    trace!(start = ?start, "outline march did not close");
    result.vertices.clear();
    result
}

/// World position of a boundary vertex, pushed away from the side where the
/// island has floor.
fn nudged_vertex(floor: &VoxelSet, grid: &VoxelGrid, voxel: Voxel) -> Point3 {
    let (mut ox, mut oz) = (0, 0);
    for &(dx, dz) in &HORIZONTAL_NEIGHBORS {
        if floor.find_near(voxel, dx, dz).is_some() {
            ox -= dx;
            oz -= dz;
        }
    }
    let nudge_x = f64::from(ox.clamp(-1, 1)) * VERTEX_NUDGE;
    let nudge_z = f64::from(oz.clamp(-1, 1)) * VERTEX_NUDGE;
    grid.world_point(
        f64::from(voxel.x) + nudge_x,
        f64::from(voxel.y),
        f64::from(voxel.z) + nudge_z,
    )
}
