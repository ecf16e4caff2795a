use crate::error::{GeometryError, Result};
use crate::geometry::Polygon;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::Solid;

use super::SurfaceKind;

/// The nearest polygon hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub surface: SurfaceKind,
    /// Position of the polygon within its list.
    pub polygon: usize,
    pub point: Point3,
    /// Ray parameter: `point = origin + alpha * direction`.
    pub alpha: f64,
}

/// Casts a directional ray against every polygon of a solid.
pub struct RayCast {
    origin: Point3,
    direction: Vector3,
}

impl RayCast {
    /// Creates a new `RayCast` query.
    #[must_use]
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Executes the query, returning the hit with the smallest ray parameter.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero-length direction.
    pub fn execute(&self, solid: &Solid) -> Result<Option<RayHit>> {
        if self.direction.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }

        let vertices = solid.vertices();
        let mut nearest: Option<RayHit> = None;
        for (pos, (_, polygon)) in solid.base().polygons().enumerate() {
            self.consider(&mut nearest, SurfaceKind::Base, pos, polygon, vertices)?;
        }
        if let Some(ext) = solid.extruded() {
            for (pos, (_, polygon)) in ext.polygons().enumerate() {
                self.consider(&mut nearest, SurfaceKind::Extruded, pos, polygon, vertices)?;
            }
        }
        for (pos, polygon) in solid.sides().iter().enumerate() {
            self.consider(&mut nearest, SurfaceKind::Side, pos, polygon, vertices)?;
        }
        Ok(nearest)
    }

    fn consider(
        &self,
        nearest: &mut Option<RayHit>,
        surface: SurfaceKind,
        pos: usize,
        polygon: &Polygon,
        vertices: &[Point3],
    ) -> Result<()> {
        let Some(hit) = polygon.ray_intersect(&self.origin, &self.direction, vertices)? else {
            return Ok(());
        };
        match nearest {
            Some(n) if n.alpha <= hit.alpha => {}
            _ => {
                *nearest = Some(RayHit {
                    surface,
                    polygon: pos,
                    point: hit.point,
                    alpha: hit.alpha,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::error::SlabmeshError;
    use crate::operations::shaping::{Extrude, ExtrudeParams};
    use crate::test_meshes;

    fn cube() -> Solid {
        let mut solid = Solid::from_mesh(test_meshes::square_quad()).unwrap();
        Extrude::new(ExtrudeParams::new(1.0)).execute(&mut solid).unwrap();
        solid
    }

    #[test]
    fn downward_ray_hits_the_top_first() {
        let hit = RayCast::new(Point3::new(0.5, 5.0, 0.5), -Vector3::y())
            .execute(&cube())
            .unwrap()
            .unwrap();
        assert_eq!(hit.surface, SurfaceKind::Extruded);
        assert_relative_eq!(hit.point, Point3::new(0.5, 1.0, 0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(hit.alpha, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn ray_from_inside_hits_a_side() {
        let hit = RayCast::new(Point3::new(0.5, 0.5, 0.5), Vector3::x())
            .execute(&cube())
            .unwrap()
            .unwrap();
        assert_eq!(hit.surface, SurfaceKind::Side);
        assert_abs_diff_eq!(hit.point.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let hit = RayCast::new(Point3::new(0.5, 5.0, 0.5), Vector3::y())
            .execute(&cube())
            .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn zero_direction_is_an_error() {
        let result = RayCast::new(Point3::origin(), Vector3::zeros()).execute(&cube());
        assert!(matches!(
            result,
            Err(SlabmeshError::Geometry(GeometryError::ZeroVector))
        ));
    }
}
