use tracing::warn;

use crate::geometry::Polygon;
use crate::math::{Vector3, TOLERANCE};
use crate::topology::{Face, Solid};

use super::SurfaceKind;

/// A facet or corner normal whose length is not 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonUnitNormal {
    pub surface: SurfaceKind,
    /// Position of the polygon within its list.
    pub polygon: usize,
    /// Corner index, or `None` for the facet normal.
    pub corner: Option<usize>,
    pub length: f64,
}

/// Lists facet and corner normals of every polygon of a solid whose length
/// differs from 1 by more than a tolerance.
#[derive(Debug)]
pub struct FindNonUnitNormals {
    tolerance: f64,
}

impl Default for FindNonUnitNormals {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
        }
    }
}

impl FindNonUnitNormals {
    /// Creates a new `FindNonUnitNormals` query with the given tolerance.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Executes the query. Each finding is also logged as a warning.
    #[must_use]
    pub fn execute(&self, solid: &Solid) -> Vec<NonUnitNormal> {
        let mut found = Vec::new();
        self.scan_face(SurfaceKind::Base, solid.base(), solid.normals(), &mut found);
        if let Some(ext) = solid.extruded() {
            self.scan_face(SurfaceKind::Extruded, ext, solid.normals(), &mut found);
        }
        for (pos, side) in solid.sides().iter().enumerate() {
            self.scan_polygon(SurfaceKind::Side, pos, side, solid.side_normals(), &mut found);
        }

        for f in &found {
            warn!(
                surface = %f.surface,
                polygon = f.polygon,
                corner = ?f.corner,
                length = f.length,
                "normal is not unit length"
            );
        }
        found
    }

    fn scan_face(
        &self,
        surface: SurfaceKind,
        face: &Face,
        table: &[Vector3],
        found: &mut Vec<NonUnitNormal>,
    ) {
        for (pos, (_, polygon)) in face.polygons().enumerate() {
            self.scan_polygon(surface, pos, polygon, table, found);
        }
    }

    fn scan_polygon(
        &self,
        surface: SurfaceKind,
        pos: usize,
        polygon: &Polygon,
        table: &[Vector3],
        found: &mut Vec<NonUnitNormal>,
    ) {
        let corners = polygon
            .normal_indices()
            .enumerate()
            .map(|(c, n)| (Some(c), table.get(n.get()).map_or(0.0, Vector3::norm)));
        for (corner, length) in std::iter::once((None, polygon.facet_normal().norm())).chain(corners) {
            if (length - 1.0).abs() > self.tolerance {
                found.push(NonUnitNormal {
                    surface,
                    polygon: pos,
                    corner,
                    length,
                });
            }
        }
    }
}
