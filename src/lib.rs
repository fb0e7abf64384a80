pub mod bake;
pub mod error;
pub mod graph;
pub mod math;
pub mod outline;
pub mod pathfinding;
pub mod scene;
pub mod triangulation;
pub mod voxel;

pub use bake::{BakeNavMesh, BakeParams, NavMesh};
pub use error::{NavError, Result};
pub use graph::{NavMeshGraph, NodeIndex};
pub use pathfinding::{path_length, FindPath, PathParams};
pub use scene::{Aabb, BoxScene, SceneQuery};
