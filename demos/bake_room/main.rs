//! Bakes a small room with a pillar and prints a path across it.
//!
//! ```text
//! cargo run --example bake_room
//! RUST_LOG=navbake=trace cargo run --example bake_room -- 0.25
//! ```

use navbake::math::Point3;
use navbake::{path_length, BakeNavMesh, BakeParams, BoxScene, NavError};

fn main() -> Result<(), NavError> {
    // Default: WARN for everything, DEBUG for navbake.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("navbake=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let voxel_size = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0.5);

    let scene = BoxScene::new()
        .with_box(Point3::new(0.0, -1.0, 0.0), Point3::new(10.0, 0.0, 10.0))
        .with_box(Point3::new(4.0, 0.0, 4.0), Point3::new(6.0, 2.0, 6.0));
    let mesh = BakeNavMesh::new(BakeParams::new(voxel_size)?).execute(&scene)?;
    println!(
        "{} vertices, {} triangles",
        mesh.graph().vertices().len(),
        mesh.graph().len()
    );

    let start = Point3::new(1.0, 0.25, 5.0);
    let end = Point3::new(9.0, 0.25, 5.0);
    match mesh.find_path(&start, &end, 10) {
        Some(path) => {
            for p in &path {
                println!("  ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
            }
            println!("length {:.3}", path_length(&path));
        }
        None => println!("no path"),
    }
    Ok(())
}
