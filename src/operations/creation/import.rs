use crate::error::{OperationError, Result};
use crate::geometry::{Corner, Shape};
use crate::math::{Point3, Vector3};

/// One imported polygon: 3 or 4 corners as vertex and normal handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFace {
    pub vertices: Vec<usize>,
    pub normals: Vec<usize>,
}

impl ImportedFace {
    /// A triangle whose corner normals share the vertex handles.
    #[must_use]
    pub fn triangle(vertices: [usize; 3]) -> Self {
        Self {
            vertices: vertices.to_vec(),
            normals: vertices.to_vec(),
        }
    }

    /// A quad whose corner normals share the vertex handles.
    #[must_use]
    pub fn quad(vertices: [usize; 4]) -> Self {
        Self {
            vertices: vertices.to_vec(),
            normals: vertices.to_vec(),
        }
    }

    /// Replaces the normal handles.
    #[must_use]
    pub fn with_normals(mut self, normals: Vec<usize>) -> Self {
        self.normals = normals;
        self
    }

    /// Converts the handles into a polygon shape.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for a corner count other than 3
    /// or 4, or mismatched vertex and normal counts.
    pub fn shape(&self) -> Result<Shape> {
        if self.vertices.len() != self.normals.len() {
            return Err(OperationError::InvalidInput(format!(
                "{} vertex handles but {} normal handles",
                self.vertices.len(),
                self.normals.len()
            ))
            .into());
        }
        let corners: Vec<Corner> = self
            .vertices
            .iter()
            .zip(&self.normals)
            .map(|(&v, &n)| Corner::new(v, n))
            .collect();
        match corners[..] {
            [a, b, c] => Ok(Shape::Triangle([a, b, c])),
            [a, b, c, d] => Ok(Shape::Quad([a, b, c, d])),
            _ => Err(OperationError::InvalidInput(format!(
                "polygon has {} corners, expected 3 or 4",
                corners.len()
            ))
            .into()),
        }
    }
}

/// Vertex, normal and polygon arrays as produced by a model loader.
///
/// Handles are 0-based. The normal table is parallel to the vertex table:
/// `normals[i]` is the surface normal at `vertices[i]`, which is the
/// direction vertex `i` moves in when the solid is extruded.
#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub vertices: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub faces: Vec<ImportedFace>,
}

impl ImportedMesh {
    #[must_use]
    pub fn new(vertices: Vec<Point3>, normals: Vec<Vector3>, faces: Vec<ImportedFace>) -> Self {
        Self {
            vertices,
            normals,
            faces,
        }
    }

    /// Checks table sizes and handle ranges.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] naming the first offending
    /// face, or describing a table mismatch.
    pub fn validate(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Err(OperationError::InvalidInput("mesh has no faces".into()).into());
        }
        if self.vertices.len() != self.normals.len() {
            return Err(OperationError::InvalidInput(format!(
                "{} vertices but {} normals, tables must be parallel",
                self.vertices.len(),
                self.normals.len()
            ))
            .into());
        }
        for (i, face) in self.faces.iter().enumerate() {
            face.shape()
                .map_err(|e| OperationError::InvalidInput(format!("face {i}: {e}")))?;
            if let Some(v) = face.vertices.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(OperationError::InvalidInput(format!(
                    "face {i}: vertex handle {v} out of range"
                ))
                .into());
            }
            if let Some(n) = face.normals.iter().find(|&&n| n >= self.normals.len()) {
                return Err(OperationError::InvalidInput(format!(
                    "face {i}: normal handle {n} out of range"
                ))
                .into());
            }
        }
        Ok(())
    }
}
