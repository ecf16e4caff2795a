use crate::error::GeometryError;

use super::{approx_eq_within, Point3, Vector3, LINE_ALIGN_TOLERANCE, TOLERANCE};

/// Intersection of two lines given in point + direction form.
///
/// Solves `a * (d1 × d2) = (p2 - p1) × d2` for the scalar `a`; the equation
/// only has a solution when both sides are parallel, i.e. the lines are
/// coplanar. Returns `p1 + a * d1`.
///
/// # Errors
///
/// Returns [`GeometryError::NoIntersection`] if the lines are parallel or skew.
pub fn line_line_intersect(
    p1: &Point3,
    d1: &Vector3,
    p2: &Point3,
    d2: &Vector3,
) -> Result<Point3, GeometryError> {
    let denom = d1.cross(d2);
    let denom_len = denom.norm();
    if denom_len < TOLERANCE {
        return Err(GeometryError::NoIntersection("lines are parallel".into()));
    }

    let num = (p2 - p1).cross(d2);
    let num_len = num.norm();
    if num_len < TOLERANCE {
        // p1 already lies on the second line.
        return Ok(*p1);
    }

    let u_denom = denom / denom_len;
    let u_num = num / num_len;
    if !approx_eq_within(&u_denom, &u_num, LINE_ALIGN_TOLERANCE)
        && !approx_eq_within(&u_denom, &(-u_num), LINE_ALIGN_TOLERANCE)
    {
        return Err(GeometryError::NoIntersection("lines are skew".into()));
    }

    let a = num.dot(&denom) / (denom_len * denom_len);
    Ok(p1 + d1 * a)
}

/// A ray/plane hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayPlaneHit {
    /// Intersection point.
    pub point: Point3,
    /// Ray parameter of the hit: `point = origin + alpha * direction`.
    pub alpha: f64,
}

/// Intersects a directional ray with a plane in point-normal form.
///
/// Returns `Ok(None)` when the ray is parallel to the plane or the plane lies
/// behind the ray origin (`alpha < 0`).
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if the ray direction or plane normal
/// is zero-length.
pub fn ray_plane_intersect(
    origin: &Point3,
    direction: &Vector3,
    plane_point: &Point3,
    plane_normal: &Vector3,
) -> Result<Option<RayPlaneHit>, GeometryError> {
    if direction.norm() < TOLERANCE {
        return Err(GeometryError::ZeroVector);
    }
    let normal = super::unit(plane_normal)?;

    let c = normal.dot(direction);
    if c.abs() < f64::EPSILON {
        return Ok(None);
    }

    // Plane: X · n = d
    let d = plane_point.coords.dot(&normal);
    let alpha = (d - origin.coords.dot(&normal)) / c;
    if alpha < 0.0 {
        return Ok(None);
    }

    Ok(Some(RayPlaneHit {
        point: origin + direction * alpha,
        alpha,
    }))
}
