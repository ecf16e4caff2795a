use std::collections::HashMap;

use slotmap::SecondaryMap;
use tracing::{debug, info};

use crate::error::{polygon_error, OperationError, Result, SlabmeshError, Stage};
use crate::geometry::{Corner, NormalIndex, Polygon, Shape, VertexIndex};
use crate::math::{self, midpoint, Point3, Vector3, TOLERANCE};
use crate::operations::query::CheckCorrespondence;
use crate::topology::{Face, Perimeter, PolygonId, Region, Solid};

/// How corner normals of side quads are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideNormals {
    /// Every corner of a quad gets the quad's facet normal.
    #[default]
    Flat,
    /// Every corner gets the mean facet normal of all side quads sharing its
    /// vertex.
    Smooth,
}

/// Parameters controlling extrusion.
#[derive(Debug, Clone, Copy)]
pub struct ExtrudeParams {
    /// Offset along each vertex normal.
    pub thickness: f64,
    /// Flips side quad winding: outer sides face inwards and hole sides face
    /// into the hole axis.
    pub reverse_side_winding: bool,
    pub side_normals: SideNormals,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            reverse_side_winding: false,
            side_normals: SideNormals::Flat,
        }
    }
}

impl ExtrudeParams {
    /// Default parameters with the given thickness.
    #[must_use]
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_reversed_sides(mut self, reverse: bool) -> Self {
        self.reverse_side_winding = reverse;
        self
    }

    #[must_use]
    pub fn with_side_normals(mut self, side_normals: SideNormals) -> Self {
        self.side_normals = side_normals;
        self
    }
}

/// Extrudes the base face of a solid along its vertex normals.
///
/// The vertex and normal tables are doubled: vertex `i + N` is vertex `i`
/// moved `thickness` along normal `i`, and the base normals are negated. The
/// extruded face mirrors the base face handle for handle (`+ N`), the base
/// polygons are rewound to face away from it, and each perimeter edge gets a
/// side quad `[b_j, b_j+1, e_j+1, e_j]`. Finally the base perimeters are
/// reversed so both faces' boundaries run the same way when viewed from
/// outside.
pub struct Extrude {
    params: ExtrudeParams,
}

impl Extrude {
    /// Creates a new `Extrude` operation.
    #[must_use]
    pub fn new(params: ExtrudeParams) -> Self {
        Self { params }
    }

    /// Executes the extrusion on `solid`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for a non-finite or near-zero
    /// thickness or a base face without regions,
    /// [`OperationError::AlreadyExtruded`] on a second call, a polygon error
    /// for degenerate extruded or side polygons, and
    /// [`OperationError::Correspondence`] if the result fails its consistency
    /// check.
    ///
    /// On error `solid` is left exactly as it was.
    pub fn execute(&self, solid: &mut Solid) -> Result<()> {
        let thickness = self.params.thickness;
        if !thickness.is_finite() || thickness.abs() < TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "extrusion thickness must be finite and non-zero, got {thickness}"
            ))
            .into());
        }
        if solid.is_extruded() {
            return Err(OperationError::AlreadyExtruded.into());
        }
        if solid.base.regions().is_empty() {
            return Err(OperationError::InvalidInput("base face has no regions".into()).into());
        }
        let n = solid.base_vertex_count;
        if solid.vertices.len() != n || solid.normals.len() != n {
            return Err(correspondence("vertex and normal tables are not the base size"));
        }

        let mut staged = solid.clone();
        self.build(&mut staged)?;
        *solid = staged;
        info!(
            thickness,
            polygons = solid.base.len(),
            sides = solid.sides.len(),
            "solid extruded"
        );
        Ok(())
    }

    /// Extrudes a validated, unextruded solid in place. Leaves it half built
    /// on error.
    fn build(&self, solid: &mut Solid) -> Result<()> {
        let thickness = self.params.thickness;
        let n = solid.base_vertex_count;
        extend_tables(solid, thickness);

        let mut extruded = Face::new();
        let mut counterpart: SecondaryMap<PolygonId, PolygonId> = SecondaryMap::new();
        let ids = solid.base.ids().to_vec();
        for (pos, id) in ids.into_iter().enumerate() {
            let base = solid.base.polygon_mut(id)?;
            let ext = Polygon::new(base.shape().offset(n, n), &solid.vertices)
                .map_err(|e| polygon_error(Stage::Extrusion, pos, e))?;
            let away = -ext.facet_normal();
            base.normalize_winding(&solid.vertices, &solid.normals, Some(&away))
                .map_err(|e| polygon_error(Stage::WindingNormalization, pos, e))?;
            counterpart.insert(id, extruded.add_polygon(ext));
        }

        solid.center = match solid.base.center_polygon() {
            Ok(base_center) => {
                let ext_center = lookup(&counterpart, base_center)?;
                extruded.set_center(Some(ext_center));
                Some(midpoint(
                    &solid.base.center_point()?,
                    &extruded.center_point()?,
                ))
            }
            Err(_) => None,
        };

        let regions = solid
            .base
            .regions()
            .iter()
            .map(|region| {
                let polygons = region
                    .polygons()
                    .iter()
                    .map(|&id| lookup(&counterpart, id))
                    .collect::<Result<Vec<_>>>()?;
                let inner = region.inner().iter().map(|p| p.offset(n)).collect();
                Ok(Region::new(polygons, region.outer().offset(n), inner))
            })
            .collect::<Result<Vec<_>>>()?;
        extruded.set_regions(regions);
        extruded.set_side_length_range(solid.base.side_length_range());

        let mut sides = Vec::new();
        for (r, region) in solid.base.regions().iter().enumerate() {
            for (k, perimeter) in region.perimeters().enumerate() {
                // Holes take the opposite default so their sides face the hole.
                let reverse = (k == 0) == self.params.reverse_side_winding;
                let before = sides.len();
                push_sides(perimeter, n, reverse, &solid.vertices, &mut sides)?;
                debug!(
                    region = r,
                    perimeter = k,
                    sides = sides.len() - before,
                    "side quads built"
                );
            }
        }
        let side_normals = assign_side_normals(&mut sides, self.params.side_normals)?;

        solid.base.reverse_perimeter_windings();
        solid.extruded = Some(extruded);
        solid.sides = sides;
        solid.side_normals = side_normals;

        CheckCorrespondence::new().execute(solid)
    }
}

fn correspondence(detail: impl Into<String>) -> SlabmeshError {
    OperationError::Correspondence {
        stage: Stage::Extrusion,
        detail: detail.into(),
    }
    .into()
}

fn lookup(map: &SecondaryMap<PolygonId, PolygonId>, id: PolygonId) -> Result<PolygonId> {
    map.get(id)
        .copied()
        .ok_or_else(|| correspondence("base polygon has no extruded counterpart"))
}

/// Appends the offset half of the vertex and normal tables and negates the
/// base normals.
fn extend_tables(solid: &mut Solid, thickness: f64) {
    let n = solid.base_vertex_count;
    solid.vertices.reserve(n);
    solid.normals.reserve(n);
    for i in 0..n {
        let (p, normal) = (solid.vertices[i], solid.normals[i]);
        solid.vertices.push(p + normal * thickness);
        solid.normals.push(normal);
        solid.normals[i] = -normal;
    }
}

/// One quad `[b_j, b_j+1, e_j+1, e_j]` per perimeter edge, reversed about
/// corner 0 when `reverse` is set.
fn push_sides(
    perimeter: &Perimeter,
    offset: usize,
    reverse: bool,
    vertices: &[Point3],
    sides: &mut Vec<Polygon>,
) -> Result<()> {
    let ring = perimeter.vertices();
    for j in 0..ring.len() {
        let b0 = ring[j];
        let b1 = ring[(j + 1) % ring.len()];
        let corner = |v: VertexIndex| Corner::new(v.get(), 0);
        let shape = Shape::Quad([
            corner(b0),
            corner(b1),
            corner(b1.offset(offset)),
            corner(b0.offset(offset)),
        ]);
        let pos = sides.len();
        let mut quad =
            Polygon::new(shape, vertices).map_err(|e| polygon_error(Stage::Extrusion, pos, e))?;
        if reverse {
            quad.reverse_winding(vertices)
                .map_err(|e| polygon_error(Stage::Extrusion, pos, e))?;
        }
        sides.push(quad);
    }
    Ok(())
}

/// Builds the side normal table and points every side corner into it.
fn assign_side_normals(sides: &mut [Polygon], mode: SideNormals) -> Result<Vec<Vector3>> {
    match mode {
        SideNormals::Flat => {
            let mut table = Vec::with_capacity(sides.len());
            for (k, quad) in sides.iter_mut().enumerate() {
                table.push(*quad.facet_normal());
                for c in 0..quad.size() {
                    quad.set_normal_index(c, NormalIndex(k));
                }
            }
            Ok(table)
        }
        SideNormals::Smooth => {
            let mut slots: HashMap<VertexIndex, usize> = HashMap::new();
            let mut sums: Vec<Vector3> = Vec::new();
            for quad in sides.iter() {
                for v in quad.vertex_indices() {
                    let slot = *slots.entry(v).or_insert_with(|| {
                        sums.push(Vector3::zeros());
                        sums.len() - 1
                    });
                    sums[slot] += quad.facet_normal();
                }
            }
            for (pos, quad) in sides.iter_mut().enumerate() {
                let corners: Vec<VertexIndex> = quad.vertex_indices().collect();
                for (c, v) in corners.into_iter().enumerate() {
                    let slot = slots.get(&v).copied().ok_or_else(|| {
                        correspondence(format!("side {pos}: vertex {v} has no side normal"))
                    })?;
                    quad.set_normal_index(c, NormalIndex(slot));
                }
            }
            sums.iter()
                .map(|s| {
                    math::unit(s).map_err(|e| {
                        SlabmeshError::from(OperationError::Failed(format!("side normal: {e}")))
                    })
                })
                .collect()
        }
    }
}
