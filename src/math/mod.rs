pub mod polygon_xz;
pub mod segment;
pub mod triangle;

/// 2D point type (horizontal `x`/`z` projections).
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type. The `y` axis points up.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Projects a point onto the horizontal plane.
#[must_use]
pub fn xz(p: &Point3) -> Point2 {
    Point2::new(p.x, p.z)
}
