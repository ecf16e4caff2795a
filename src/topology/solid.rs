use tracing::debug;

use crate::error::{polygon_error, OperationError, Result, Stage};
use crate::geometry::{NormalIndex, Polygon, VertexIndex};
use crate::math::{Point3, Vector3};
use crate::operations::boundary::ExtractParams;
use crate::operations::creation::{BuildSolid, ImportedMesh};
use crate::operations::modification::AverageVertexNormals;

use super::Face;

/// A flat base face and, once extruded, its offset copy and side quads.
///
/// The solid owns the vertex and normal tables every polygon indexes into.
/// Before extrusion both tables hold `base_vertex_count` entries; extrusion
/// appends a second half of the same size for the extruded face.
#[derive(Debug, Clone)]
pub struct Solid {
    pub(crate) vertices: Vec<Point3>,
    pub(crate) normals: Vec<Vector3>,
    pub(crate) base_vertex_count: usize,
    pub(crate) base: Face,
    pub(crate) extruded: Option<Face>,
    pub(crate) sides: Vec<Polygon>,
    pub(crate) side_normals: Vec<Vector3>,
    pub(crate) center: Option<Point3>,
    source: ImportedMesh,
    params: ExtractParams,
}

impl Solid {
    /// Builds the base face of a solid from imported mesh data with default
    /// extraction parameters.
    ///
    /// # Errors
    ///
    /// See [`BuildSolid::execute`].
    pub fn from_mesh(mesh: ImportedMesh) -> Result<Self> {
        BuildSolid::new(mesh).execute()
    }

    pub(crate) fn from_parts(
        source: ImportedMesh,
        params: ExtractParams,
        base: Face,
        center: Option<Point3>,
    ) -> Self {
        Self {
            base_vertex_count: source.vertices.len(),
            vertices: source.vertices.clone(),
            normals: source.normals.clone(),
            base,
            extruded: None,
            sides: Vec::new(),
            side_normals: Vec::new(),
            center,
            source,
            params,
        }
    }

    /// Discards the extrusion and any vertex mapping, rebuilding the base
    /// face from the retained import data.
    ///
    /// # Errors
    ///
    /// See [`BuildSolid::execute`].
    pub fn reset(&mut self) -> Result<()> {
        *self = BuildSolid::new(self.source.clone())
            .with_params(self.params)
            .execute()?;
        debug!("solid reset to imported state");
        Ok(())
    }

    // --- Tables ---

    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[must_use]
    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    #[must_use]
    pub fn vertex(&self, v: VertexIndex) -> Option<&Point3> {
        self.vertices.get(v.get())
    }

    #[must_use]
    pub fn normal(&self, n: NormalIndex) -> Option<&Vector3> {
        self.normals.get(n.get())
    }

    /// Normals referenced by side quads.
    #[must_use]
    pub fn side_normals(&self) -> &[Vector3] {
        &self.side_normals
    }

    #[must_use]
    pub fn side_normal(&self, n: NormalIndex) -> Option<&Vector3> {
        self.side_normals.get(n.get())
    }

    /// Number of vertices in the base half of the vertex table.
    #[must_use]
    pub fn base_vertex_count(&self) -> usize {
        self.base_vertex_count
    }

    // --- Faces ---

    #[must_use]
    pub fn base(&self) -> &Face {
        &self.base
    }

    #[must_use]
    pub fn extruded(&self) -> Option<&Face> {
        self.extruded.as_ref()
    }

    #[must_use]
    pub fn is_extruded(&self) -> bool {
        self.extruded.is_some()
    }

    /// Quads bridging the base and extruded faces.
    #[must_use]
    pub fn sides(&self) -> &[Polygon] {
        &self.sides
    }

    /// Midpoint of the base and extruded center polygons after extrusion,
    /// the base center before.
    #[must_use]
    pub fn center(&self) -> Option<Point3> {
        self.center
    }

    /// Base, extruded and side polygons combined.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.base.len() + self.extruded.as_ref().map_or(0, Face::len) + self.sides.len()
    }

    #[must_use]
    pub fn extract_params(&self) -> &ExtractParams {
        &self.params
    }

    // --- Modification ---

    /// Repositions every base vertex and its normal through `f`, then
    /// recomputes the base polygons and the center.
    ///
    /// Handles are preserved: vertex `i` stays vertex `i`. Winding is not
    /// re-normalized and regions are not re-traced. On error the solid is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::AlreadyExtruded`] after extrusion, or a
    /// polygon error if a mapped polygon degenerates.
    pub fn map_base_vertices<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(VertexIndex, &Point3, &Vector3) -> (Point3, Vector3),
    {
        if self.is_extruded() {
            return Err(OperationError::AlreadyExtruded.into());
        }

        let (vertices, normals): (Vec<Point3>, Vec<Vector3>) = self
            .vertices
            .iter()
            .zip(&self.normals)
            .enumerate()
            .map(|(i, (p, n))| f(VertexIndex(i), p, n))
            .unzip();

        let mut base = self.base.clone();
        let ids = base.ids().to_vec();
        for (pos, id) in ids.into_iter().enumerate() {
            base.polygon_mut(id)?
                .recompute(&vertices)
                .map_err(|e| polygon_error(Stage::SurfaceMapping, pos, e))?;
        }
        let center = if base.is_empty() {
            self.center
        } else {
            base.set_center_from_bounds(&vertices)?;
            Some(base.center_point()?)
        };

        self.vertices = vertices;
        self.normals = normals;
        self.base = base;
        self.center = center;
        debug!(vertices = self.vertices.len(), "base vertices mapped");
        Ok(())
    }

    /// Replaces corner normals of the base and extruded faces with the mean
    /// facet normal of the polygons around each vertex.
    ///
    /// # Errors
    ///
    /// See [`AverageVertexNormals::execute`].
    pub fn average_vertex_normals(&mut self) -> Result<()> {
        AverageVertexNormals::new().execute(self)
    }
}
