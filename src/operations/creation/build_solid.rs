use tracing::info;

use crate::error::{polygon_error, Result, Stage};
use crate::geometry::Polygon;
use crate::operations::boundary::{DebugTrace, ExtractParams, ExtractRegions};
use crate::topology::{Face, Solid};

use super::ImportedMesh;

/// Builds the base face of a [`Solid`] from imported mesh data.
///
/// Every polygon is wound to agree with the normal at its first corner, the
/// face is partitioned into regions with traced perimeters, and the center
/// polygon is chosen from the bounds of the outer perimeters.
pub struct BuildSolid {
    mesh: ImportedMesh,
    params: ExtractParams,
}

impl BuildSolid {
    /// Creates a new `BuildSolid` operation with default extraction parameters.
    #[must_use]
    pub fn new(mesh: ImportedMesh) -> Self {
        Self {
            mesh,
            params: ExtractParams::default(),
        }
    }

    /// Sets the region and perimeter extraction parameters.
    #[must_use]
    pub fn with_params(mut self, params: ExtractParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the import.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh fails validation, a polygon is degenerate,
    /// or region extraction fails.
    pub fn execute(&self) -> Result<Solid> {
        self.execute_traced(None)
    }

    /// Like [`BuildSolid::execute`], recording extraction steps into `trace`.
    ///
    /// # Errors
    ///
    /// See [`BuildSolid::execute`].
    pub fn execute_traced(&self, trace: Option<&mut DebugTrace>) -> Result<Solid> {
        let mesh = &self.mesh;
        mesh.validate()?;

        let mut face = Face::new();
        let mut reversed = 0usize;
        for (i, imported) in mesh.faces.iter().enumerate() {
            let mut polygon = Polygon::new(imported.shape()?, &mesh.vertices)
                .map_err(|e| polygon_error(Stage::Import, i, e))?;
            if polygon
                .normalize_winding(&mesh.vertices, &mesh.normals, None)
                .map_err(|e| polygon_error(Stage::WindingNormalization, i, e))?
            {
                reversed += 1;
            }
            face.add_polygon(polygon);
        }

        let regions = ExtractRegions::new(self.params).execute(&mut face, &mesh.vertices, trace)?;
        face.set_center_from_bounds(&mesh.vertices)?;
        let center = face.center_point()?;

        info!(
            vertices = mesh.vertices.len(),
            polygons = face.len(),
            reversed,
            regions,
            "base face imported"
        );
        Ok(Solid::from_parts(mesh.clone(), self.params, face, Some(center)))
    }
}
