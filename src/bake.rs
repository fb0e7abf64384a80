use tracing::{debug, trace};

use crate::error::{BakeError, Result};
use crate::graph::{AssembleGraph, NavMeshGraph, NodeIndex};
use crate::math::Point3;
use crate::outline::GenerateOutline;
use crate::pathfinding::{FindPath, PathParams, MAX_STRAIGHTENING_ITERATIONS};
use crate::scene::SceneQuery;
use crate::triangulation::{TriangleSurface, Triangulate};
use crate::voxel::{SplitSurfaces, VoxelGrid, Voxelize};

/// Settings for [`BakeNavMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BakeParams {
    /// Edge length of one voxel in world units.
    pub voxel_size: f64,
}

impl Default for BakeParams {
    fn default() -> Self {
        Self { voxel_size: 0.2 }
    }
}

impl BakeParams {
    /// Creates validated bake parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BakeError::InvalidParameters`] if `voxel_size` is not a
    /// positive finite number.
    pub fn new(voxel_size: f64) -> Result<Self> {
        if !voxel_size.is_finite() || voxel_size <= 0.0 {
            return Err(BakeError::InvalidParameters(format!(
                "voxel size must be positive and finite, got {voxel_size}"
            ))
            .into());
        }
        Ok(Self { voxel_size })
    }
}

/// A baked navigation mesh ready for queries.
#[derive(Debug, Clone, Default)]
pub struct NavMesh {
    graph: NavMeshGraph,
    index: NodeIndex,
}

impl NavMesh {
    /// Wraps `graph` and builds its lookup index.
    #[must_use]
    pub fn new(graph: NavMeshGraph) -> Self {
        let index = NodeIndex::build(&graph);
        Self { graph, index }
    }

    #[must_use]
    pub fn graph(&self) -> &NavMeshGraph {
        &self.graph
    }

    #[must_use]
    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    /// The node under `point`, see [`NavMeshGraph::node_below`].
    #[must_use]
    pub fn node_below(&self, point: &Point3) -> Option<usize> {
        self.graph
            .node_below(point, Some(self.index.candidates(point)))
    }

    /// A path finder over this mesh using `params`.
    #[must_use]
    pub fn path_finder(&self, params: PathParams) -> FindPath<'_> {
        FindPath::new(&self.graph, params).with_index(&self.index)
    }

    /// Finds a path from `start` to `end` with the default subdivision
    /// count. `straightening_iterations` is capped at
    /// [`MAX_STRAIGHTENING_ITERATIONS`].
    #[must_use]
    pub fn find_path(
        &self,
        start: &Point3,
        end: &Point3,
        straightening_iterations: usize,
    ) -> Option<Vec<Point3>> {
        let params = PathParams {
            straightening_iterations: straightening_iterations.min(MAX_STRAIGHTENING_ITERATIONS),
            ..PathParams::default()
        };
        self.path_finder(params).execute(start, end)
    }
}

/// Bakes a [`NavMesh`] from a scene.
///
/// Runs voxelization, island splitting, outlining, triangulation and graph
/// assembly in order.
pub struct BakeNavMesh {
    params: BakeParams,
}

impl BakeNavMesh {
    /// Creates a new `BakeNavMesh` operation.
    #[must_use]
    pub fn new(params: BakeParams) -> Self {
        Self { params }
    }

    /// Triangulates every walkable island of `scene`.
    ///
    /// Surface indices are offset so that they address the concatenation of
    /// all surfaces' positions in order.
    ///
    /// # Errors
    ///
    /// Returns [`BakeError::EmptyScene`] if the scene bounds are degenerate,
    /// or [`BakeError::InvalidParameters`] for an unusable voxel size.
    pub fn surfaces<S: SceneQuery + ?Sized>(&self, scene: &S) -> Result<Vec<TriangleSurface>> {
        let voxel_size = self.params.voxel_size;
        let grid = VoxelGrid::new(scene.bounds(), voxel_size)?;

        let floor = Voxelize::new(grid).execute(scene);
        let islands = SplitSurfaces::new(floor).execute();

        let outliner = GenerateOutline::new(grid);
        let mut surfaces: Vec<TriangleSurface> = Vec::with_capacity(islands.len());
        let mut offset = 0;
        for island in &islands {
            let Some(outline) = outliner.execute(island, scene) else {
                trace!(voxels = island.len(), "skipping island without outline");
                continue;
            };
            let Some(surface) = Triangulate::new(voxel_size)
                .with_index_offset(offset)
                .execute(&outline, scene)
            else {
                continue;
            };
            trace!(
                voxels = island.len(),
                triangles = surface.triangles.len(),
                "triangulated island"
            );
            offset += surface.positions.len();
            surfaces.push(surface);
        }
        Ok(surfaces)
    }

    /// Executes the bake.
    ///
    /// # Errors
    ///
    /// Same as [`BakeNavMesh::surfaces`]. Graph errors cannot occur for
    /// triangulated surfaces but are propagated if they do.
    pub fn execute<S: SceneQuery + ?Sized>(&self, scene: &S) -> Result<NavMesh> {
        let surfaces = self.surfaces(scene)?;
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for surface in surfaces {
            vertices.extend(surface.positions);
            triangles.extend(surface.triangles);
        }
        debug!(
            vertices = vertices.len(),
            triangles = triangles.len(),
            "baked navigation mesh"
        );
        let graph = AssembleGraph::new(vertices, triangles).execute()?;
        Ok(NavMesh::new(graph))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::NavError;
    use crate::math::triangle::is_degenerate_xz;
    use crate::pathfinding::path_length;
    use crate::scene::BoxScene;

    fn room() -> BoxScene {
        BoxScene::new().with_box(Point3::new(0.0, -1.0, 0.0), Point3::new(10.0, 0.0, 10.0))
    }

    fn pillar_room() -> BoxScene {
        room().with_box(Point3::new(4.0, 0.0, 4.0), Point3::new(6.0, 2.0, 6.0))
    }

    fn bake(scene: &BoxScene) -> NavMesh {
        BakeNavMesh::new(BakeParams::new(0.5).unwrap())
            .execute(scene)
            .unwrap()
    }

    fn inside_pillar(p: &Point3) -> bool {
        p.x > 4.0 && p.x < 6.0 && p.z > 4.0 && p.z < 6.0
    }

    #[test]
    fn params_are_validated() {
        assert_relative_eq!(BakeParams::default().voxel_size, 0.2);
        assert!(BakeParams::new(0.25).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                BakeParams::new(bad),
                Err(NavError::Bake(BakeError::InvalidParameters(_)))
            ));
        }
    }

    #[test]
    fn empty_scene_is_rejected() {
        let result = BakeNavMesh::new(BakeParams::default()).execute(&BoxScene::new());
        assert!(matches!(result, Err(NavError::Bake(BakeError::EmptyScene))));
    }

    #[test]
    fn empty_room_bakes_two_triangles() {
        let surfaces = BakeNavMesh::new(BakeParams::new(0.5).unwrap())
            .surfaces(&room())
            .unwrap();
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].positions.len(), 4);
        assert_eq!(surfaces[0].triangles.len(), 2);

        let mesh = bake(&room());
        let graph = mesh.graph();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes()[0].neighbors.iter().flatten().count(), 1);
        assert!(graph.shared_edge(0, 1).is_some());
        graph.validate().unwrap();
    }

    #[test]
    fn empty_room_path_is_straight() {
        let mesh = bake(&room());
        let start = Point3::new(0.5, 0.25, 9.5);
        let end = Point3::new(9.5, 0.25, 0.5);
        let path = mesh.find_path(&start, &end, 0).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], start);
        assert_eq!(path[2], end);
        assert_relative_eq!(path[1].x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(path[1].z, 5.0, epsilon = 1e-9);
        assert_relative_eq!(path_length(&path), 9.0 * 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn corner_to_corner_path_is_straight() {
        let mesh = bake(&room());
        let start = Point3::new(0.5, 0.25, 0.5);
        let end = Point3::new(9.5, 0.25, 9.5);
        let path = mesh.find_path(&start, &end, 10).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for p in &path {
            assert_relative_eq!(p.x, p.z, epsilon = 1e-9);
        }
        assert_relative_eq!(path_length(&path), 9.0 * 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn path_to_same_point() {
        let mesh = bake(&room());
        let a = Point3::new(3.0, 0.25, 7.0);
        assert_eq!(mesh.find_path(&a, &a, 5), Some(vec![a, a]));
    }

    #[test]
    fn points_off_the_mesh_have_no_path() {
        let mesh = bake(&room());
        let inside = Point3::new(3.0, 0.25, 7.0);
        let outside = Point3::new(30.0, 0.25, 7.0);
        assert!(mesh.find_path(&inside, &outside, 0).is_none());
        assert!(mesh.node_below(&outside).is_none());
    }

    #[test]
    fn pillar_room_has_bridged_hole() {
        let surfaces = BakeNavMesh::new(BakeParams::new(0.5).unwrap())
            .surfaces(&pillar_room())
            .unwrap();
        assert_eq!(surfaces.len(), 2);
        let ground = surfaces
            .iter()
            .find(|s| s.positions.iter().all(|p| p.y < 1.0))
            .unwrap();
        assert_eq!(ground.positions.len(), 8);
        assert!(ground.triangles.len() > 2);

        let mesh = bake(&pillar_room());
        let graph = mesh.graph();
        graph.validate().unwrap();
        for id in 0..graph.len() {
            let [a, b, c] = graph.triangle(id).unwrap();
            assert!(!is_degenerate_xz(&a, &b, &c));
        }
        // The top of the pillar is walkable but separate from the floor.
        let floor = Point3::new(1.0, 0.25, 1.0);
        let top = Point3::new(4.6, 2.25, 5.3);
        assert_ne!(mesh.node_below(&floor), mesh.node_below(&top));
        assert!(mesh.node_below(&top).is_some());
        assert!(mesh.find_path(&floor, &top, 0).is_none());
    }

    #[test]
    fn path_routes_around_pillar() {
        let mesh = bake(&pillar_room());
        let start = Point3::new(1.0, 0.25, 5.0);
        let end = Point3::new(9.0, 0.25, 5.0);
        for iterations in [0, 10] {
            let path = mesh.find_path(&start, &end, iterations).unwrap();
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&end));
            assert!(path_length(&path) > 8.0);
            for w in path.windows(2) {
                let mid = Point3::from((w[0].coords + w[1].coords) / 2.0);
                assert!(!inside_pillar(&w[0]));
                assert!(!inside_pillar(&mid));
            }
        }
    }

    #[test]
    fn straightening_never_lengthens() {
        let mesh = bake(&pillar_room());
        let start = Point3::new(0.5, 0.25, 4.5);
        let end = Point3::new(9.5, 0.25, 6.5);
        let mut previous = f64::INFINITY;
        for iterations in [0, 1, 2, 5, 20] {
            let length = path_length(&mesh.find_path(&start, &end, iterations).unwrap());
            assert!(length <= previous + 1e-9);
            previous = length;
        }
    }

    #[test]
    fn concurrent_path_queries() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let mesh = bake(&pillar_room());
        let queries = [
            (Point3::new(1.0, 0.25, 5.0), Point3::new(9.0, 0.25, 5.0)),
            (Point3::new(5.0, 0.25, 1.0), Point3::new(5.0, 0.25, 9.0)),
            (Point3::new(0.5, 0.25, 0.5), Point3::new(9.5, 0.25, 9.5)),
        ];
        let expected: Vec<_> = queries
            .iter()
            .map(|(a, b)| mesh.find_path(a, b, 3))
            .collect();
        std::thread::scope(|scope| {
            let handles: Vec<_> = queries
                .iter()
                .map(|(a, b)| scope.spawn(|| mesh.find_path(a, b, 3)))
                .collect();
            for (handle, expected) in handles.into_iter().zip(&expected) {
                let path = handle.join().unwrap();
                assert!(path.is_some());
                assert_eq!(&path, expected);
            }
        });
    }

    /// Counts events whose message equals `message`.
    struct MessageCounter {
        message: &'static str,
        count: Arc<AtomicUsize>,
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for MessageCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _: tracing_subscriber::layer::Context<'_, S>,
        ) {
            struct Message(Option<String>);
            impl tracing::field::Visit for Message {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.0 = Some(format!("{value:?}"));
                    }
                }
            }
            let mut message = Message(None);
            event.record(&mut message);
            if message.0.as_deref() == Some(self.message) {
                self.count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[test]
    fn island_split_is_logged_once_per_bake() {
        use tracing_subscriber::layer::SubscriberExt;

        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(MessageCounter {
            message: "split floor into islands",
            count: count.clone(),
        });
        tracing::subscriber::with_default(subscriber, || bake(&pillar_room()));
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }
}
