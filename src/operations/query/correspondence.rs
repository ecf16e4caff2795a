use crate::error::{OperationError, Result, SlabmeshError, Stage};
use crate::geometry::VertexIndex;
use crate::topology::{Region, Solid};

/// Verifies that an extruded solid's second half mirrors its base.
///
/// Checks, in order: table sizes, extruded polygons against their base
/// counterparts (`+ N`, forward or reversed about corner 0), region and
/// perimeter structure, the side quad count and handles, and finally that
/// each side quad bridges its perimeter edge: side `k` joins `b_j`, `b_j+1`
/// and their `+ N` counterparts, walking regions, then perimeters (outer
/// first), then edges.
#[derive(Debug, Default)]
pub struct CheckCorrespondence;

impl CheckCorrespondence {
    /// Creates a new `CheckCorrespondence` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotExtruded`] before extrusion and
    /// [`OperationError::Correspondence`] describing the first mismatch.
    pub fn execute(&self, solid: &Solid) -> Result<()> {
        let ext = solid.extruded().ok_or(OperationError::NotExtruded)?;
        let base = solid.base();
        let n = solid.base_vertex_count();

        if solid.vertices().len() != 2 * n || solid.normals().len() != 2 * n {
            return Err(mismatch(format!(
                "tables hold {} vertices and {} normals, expected {}",
                solid.vertices().len(),
                solid.normals().len(),
                2 * n
            )));
        }

        if base.len() != ext.len() {
            return Err(mismatch(format!(
                "{} base polygons but {} extruded",
                base.len(),
                ext.len()
            )));
        }
        for (pos, ((_, b), (_, e))) in base.polygons().zip(ext.polygons()).enumerate() {
            let bv: Vec<VertexIndex> = b.vertex_indices().collect();
            let ev: Vec<VertexIndex> = e.vertex_indices().collect();
            if !mirrors(&bv, &ev, n) {
                return Err(mismatch(format!(
                    "polygon {pos}: extruded corners do not mirror the base"
                )));
            }
        }

        if base.regions().len() != ext.regions().len() {
            return Err(mismatch("region counts differ"));
        }
        for (r, (br, er)) in base.regions().iter().zip(ext.regions()).enumerate() {
            if br.polygons().len() != er.polygons().len() {
                return Err(mismatch(format!("region {r}: polygon counts differ")));
            }
            for (&bid, &eid) in br.polygons().iter().zip(er.polygons()) {
                let (bp, ep) = (base.position(bid), ext.position(eid));
                if bp.is_none() || bp != ep {
                    return Err(mismatch(format!(
                        "region {r}: polygon maps outside its counterpart"
                    )));
                }
            }
            if br.inner().len() != er.inner().len() {
                return Err(mismatch(format!("region {r}: hole counts differ")));
            }
            for (k, (bp, ep)) in br.perimeters().zip(er.perimeters()).enumerate() {
                if !mirrors(bp.vertices(), ep.vertices(), n) {
                    return Err(mismatch(format!(
                        "region {r}: perimeter {k} does not mirror the base"
                    )));
                }
            }
        }

        let expected: usize = base.regions().iter().map(Region::perimeter_len).sum();
        if solid.sides().len() != expected {
            return Err(mismatch(format!(
                "{} side quads, expected {expected}",
                solid.sides().len()
            )));
        }
        for (pos, side) in solid.sides().iter().enumerate() {
            if side.vertex_indices().any(|v| v.get() >= 2 * n)
                || side
                    .normal_indices()
                    .any(|h| h.get() >= solid.side_normals().len())
            {
                return Err(mismatch(format!("side {pos}: handle out of range")));
            }
        }

        // Extruded perimeters keep the pre-reversal base order the sides were
        // built from. Every handle in them is at least `n`, checked above.
        let mut sides = solid.sides().iter().enumerate();
        for (r, region) in ext.regions().iter().enumerate() {
            for (k, perimeter) in region.perimeters().enumerate() {
                let ring = perimeter.vertices();
                for j in 0..ring.len() {
                    let (e0, e1) = (ring[j], ring[(j + 1) % ring.len()]);
                    let expected = [VertexIndex(e0.get() - n), VertexIndex(e1.get() - n), e1, e0];
                    let Some((pos, side)) = sides.next() else {
                        return Err(mismatch("side quads run out before the perimeters"));
                    };
                    let actual: Vec<VertexIndex> = side.vertex_indices().collect();
                    if !mirrors(&expected, &actual, 0) {
                        return Err(mismatch(format!(
                            "side {pos}: does not bridge edge {j} of region {r} perimeter {k}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn mismatch(detail: impl Into<String>) -> SlabmeshError {
    OperationError::Correspondence {
        stage: Stage::Extrusion,
        detail: detail.into(),
    }
    .into()
}

/// `ext` equals `base` shifted by `offset`, with the tail either in the same
/// order or reversed. Element 0 always matches.
fn mirrors(base: &[VertexIndex], ext: &[VertexIndex], offset: usize) -> bool {
    let len = base.len();
    if len == 0 || len != ext.len() || ext[0] != base[0].offset(offset) {
        return false;
    }
    let forward = (1..len).all(|i| ext[i] == base[i].offset(offset));
    let reversed = (1..len).all(|i| ext[i] == base[len - i].offset(offset));
    forward || reversed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::operations::shaping::{Extrude, ExtrudeParams};
    use crate::test_meshes;

    fn handles(ids: &[usize]) -> Vec<VertexIndex> {
        ids.iter().copied().map(VertexIndex).collect()
    }

    #[test]
    fn mirror_accepts_both_directions() {
        let base = handles(&[0, 1, 2, 3]);
        assert!(mirrors(&base, &handles(&[10, 11, 12, 13]), 10));
        assert!(mirrors(&base, &handles(&[10, 13, 12, 11]), 10));
        assert!(!mirrors(&base, &handles(&[11, 12, 13, 10]), 10));
        assert!(!mirrors(&base, &handles(&[10, 11, 13, 12]), 10));
    }

    #[test]
    fn extruded_ring_passes() {
        let mut solid = Solid::from_mesh(test_meshes::ring()).unwrap();
        Extrude::new(ExtrudeParams::new(1.0)).execute(&mut solid).unwrap();
        assert!(CheckCorrespondence::new().execute(&solid).is_ok());
    }

    #[test]
    fn reversed_sides_pass() {
        let mut solid = Solid::from_mesh(test_meshes::ring()).unwrap();
        Extrude::new(ExtrudeParams::new(1.0).with_reversed_sides(true))
            .execute(&mut solid)
            .unwrap();
        assert!(CheckCorrespondence::new().execute(&solid).is_ok());
    }

    #[test]
    fn side_on_wrong_vertices_is_reported() {
        let mut solid = Solid::from_mesh(test_meshes::square_quad()).unwrap();
        Extrude::new(ExtrudeParams::new(1.0)).execute(&mut solid).unwrap();
        solid.sides[0] =
            Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], solid.vertices()).unwrap();

        let err = CheckCorrespondence::new().execute(&solid).unwrap_err();

        assert!(matches!(
            err,
            SlabmeshError::Operation(OperationError::Correspondence { .. })
        ));
        assert!(err.to_string().contains("side 0"));
    }

    #[test]
    fn swapped_sides_are_reported() {
        let mut solid = Solid::from_mesh(test_meshes::ring()).unwrap();
        Extrude::new(ExtrudeParams::new(1.0)).execute(&mut solid).unwrap();
        solid.sides.swap(0, 5);
        assert!(CheckCorrespondence::new().execute(&solid).is_err());
    }

    #[test]
    fn unextruded_solid_is_reported() {
        let solid = Solid::from_mesh(test_meshes::ring()).unwrap();
        assert!(matches!(
            CheckCorrespondence::new().execute(&solid),
            Err(SlabmeshError::Operation(OperationError::NotExtruded))
        ));
    }

    #[test]
    fn missing_side_is_reported() {
        let mut solid = Solid::from_mesh(test_meshes::square_quad()).unwrap();
        Extrude::new(ExtrudeParams::new(1.0)).execute(&mut solid).unwrap();
        solid.sides.pop();
        let err = CheckCorrespondence::new().execute(&solid).unwrap_err();
        assert!(err.to_string().contains("3 side quads, expected 4"));
    }
}
