use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{NormalIndex, VertexIndex};
use crate::math::{self, Vector3};
use crate::topology::{Face, Solid};

/// Smooths the vertex normals of the base and extruded faces.
///
/// The normal of each vertex becomes the normalized mean of the facet normals
/// of the face's polygons containing it, and every corner is pointed at its
/// vertex's slot in the normal table. Side quads keep their own normals.
#[derive(Debug, Default)]
pub struct AverageVertexNormals;

impl AverageVertexNormals {
    /// Creates a new `AverageVertexNormals` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the averaging on `solid`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if the facet normals around a
    /// vertex cancel out.
    pub fn execute(&self, solid: &mut Solid) -> Result<()> {
        let mut updated = average_face(&mut solid.base, &mut solid.normals)?;
        if let Some(extruded) = solid.extruded.as_mut() {
            updated += average_face(extruded, &mut solid.normals)?;
        }
        debug!(normals = updated, "vertex normals averaged");
        Ok(())
    }
}

fn average_face(face: &mut Face, normals: &mut [Vector3]) -> Result<usize> {
    let mut sums: BTreeMap<VertexIndex, Vector3> = BTreeMap::new();
    for (_, polygon) in face.polygons() {
        for v in polygon.vertex_indices() {
            *sums.entry(v).or_insert_with(Vector3::zeros) += polygon.facet_normal();
        }
    }

    for (v, sum) in &sums {
        let slot = normals
            .get_mut(v.get())
            .ok_or(GeometryError::NormalOutOfRange(v.get()))?;
        *slot = math::unit(sum)?;
    }

    for id in face.ids().to_vec() {
        let polygon = face.polygon_mut(id)?;
        let handles: Vec<VertexIndex> = polygon.vertex_indices().collect();
        for (c, v) in handles.into_iter().enumerate() {
            polygon.set_normal_index(c, NormalIndex(v.get()));
        }
    }
    Ok(sums.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::operations::creation::ImportedFace;
    use crate::operations::shaping::{Extrude, ExtrudeParams};
    use crate::test_meshes;

    #[test]
    fn tilted_normals_are_replaced_by_facet_means() {
        let mut mesh = test_meshes::two_triangle_square();
        for n in &mut mesh.normals {
            *n = Vector3::new(0.0, 1.0, 0.3);
        }
        let mut solid = Solid::from_mesh(mesh).unwrap();

        solid.average_vertex_normals().unwrap();

        for n in solid.normals() {
            assert_relative_eq!(*n, Vector3::y(), epsilon = 1e-12);
        }
    }

    #[test]
    fn corners_point_at_their_vertex_slot() {
        let mut mesh = test_meshes::two_triangle_square();
        mesh.faces[0] = ImportedFace::triangle([0, 3, 2]).with_normals(vec![1, 1, 1]);
        let mut solid = Solid::from_mesh(mesh).unwrap();

        solid.average_vertex_normals().unwrap();

        for (_, polygon) in solid.base().polygons() {
            for corner in polygon.corners() {
                assert_eq!(corner.normal.get(), corner.vertex.get());
            }
        }
    }

    #[test]
    fn extruded_face_is_averaged_too() {
        let mut solid = Solid::from_mesh(test_meshes::ring()).unwrap();
        Extrude::new(ExtrudeParams::new(1.0)).execute(&mut solid).unwrap();

        solid.average_vertex_normals().unwrap();

        let n = solid.base_vertex_count();
        for i in 0..n {
            assert_relative_eq!(solid.normals()[i], -Vector3::y(), epsilon = 1e-12);
            assert_relative_eq!(solid.normals()[i + n], Vector3::y(), epsilon = 1e-12);
        }
    }
}
