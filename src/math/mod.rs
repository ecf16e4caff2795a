pub mod intersect_3d;

use crate::error::GeometryError;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-6;

/// Tolerance used when comparing the unit vectors of the two sides of the
/// line-intersection equation.
pub const LINE_ALIGN_TOLERANCE: f64 = 1e-4;

/// Amount a cosine is pulled back towards zero when rounding pushed it just
/// past `±1`.
pub const ACOS_NUDGE: f64 = 1e-6;

/// Component-wise equality within [`TOLERANCE`].
#[must_use]
pub fn approx_eq(a: &Vector3, b: &Vector3) -> bool {
    approx_eq_within(a, b, TOLERANCE)
}

/// Component-wise equality within `tolerance`.
#[must_use]
pub fn approx_eq_within(a: &Vector3, b: &Vector3, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance
        && (a.y - b.y).abs() <= tolerance
        && (a.z - b.z).abs() <= tolerance
}

/// Component-wise point equality within [`TOLERANCE`].
#[must_use]
pub fn points_eq(a: &Point3, b: &Point3) -> bool {
    approx_eq(&a.coords, &b.coords)
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Returns `v` scaled to unit length.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if `v` is shorter than [`TOLERANCE`].
pub fn unit(v: &Vector3) -> Result<Vector3, GeometryError> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector);
    }
    Ok(v / len)
}

/// Angle in radians between two unit vectors.
///
/// Rounding can leave the dot product of two unit vectors slightly outside
/// `[-1, 1]`; such values are nudged back by [`ACOS_NUDGE`].
///
/// # Errors
///
/// Returns [`GeometryError::OutOfDomain`] if the dot product is further than
/// [`TOLERANCE`] outside the domain, i.e. the inputs were not unit vectors.
pub fn unit_angle(a: &Vector3, b: &Vector3) -> Result<f64, GeometryError> {
    let mut cos = a.dot(b);
    if cos.abs() - TOLERANCE > 1.0 || cos.is_nan() {
        return Err(GeometryError::OutOfDomain { value: cos });
    }
    if cos.abs() > 1.0 {
        cos -= ACOS_NUDGE.copysign(cos);
        cos = cos.clamp(-1.0, 1.0);
    }
    Ok(cos.acos())
}
