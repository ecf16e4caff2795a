use crate::error::GeometryError;
use crate::math::{Point3, Vector3, TOLERANCE};

/// Precomputed barycentric basis for point-in-triangle tests.
///
/// For a triangle `v0, v1, v2` with `e1 = v1 - v0` and `e2 = v2 - v0`, a point
/// `q` in the triangle's plane has barycentric weights
/// `beta = u_beta · (q - v0)`, `gamma = u_gamma · (q - v0)` and
/// `alpha = 1 - beta - gamma`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriangleBasis {
    /// Plane constant: `facet_normal · v0`.
    pub d: f64,
    pub u_beta: Vector3,
    pub u_gamma: Vector3,
}

impl TriangleBasis {
    /// Builds the basis for triangle `v0, v1, v2`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the triangle has no area.
    pub fn new(
        v0: &Point3,
        v1: &Point3,
        v2: &Point3,
        facet_normal: &Vector3,
    ) -> Result<Self, GeometryError> {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let a = e1.dot(&e1);
        let b = e1.dot(&e2);
        let c = e2.dot(&e2);
        let det = a * c - b * b;
        if det.abs() < TOLERANCE * TOLERANCE {
            return Err(GeometryError::Degenerate(
                "triangle has no area, barycentric basis undefined".into(),
            ));
        }

        Ok(Self {
            d: facet_normal.dot(&v0.coords),
            u_beta: e1 * (c / det) - e2 * (b / det),
            u_gamma: e2 * (a / det) - e1 * (b / det),
        })
    }

    /// Returns `true` if `point`, assumed to lie in the triangle's plane, has
    /// non-negative barycentric weights relative to `v0`.
    #[must_use]
    pub fn contains(&self, v0: &Point3, point: &Point3) -> bool {
        let r = point - v0;
        let beta = self.u_beta.dot(&r);
        if beta < -TOLERANCE {
            return false;
        }
        let gamma = self.u_gamma.dot(&r);
        if gamma < -TOLERANCE {
            return false;
        }
        1.0 - beta - gamma >= -TOLERANCE
    }
}
