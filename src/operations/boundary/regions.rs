use std::collections::HashMap;

use slotmap::SecondaryMap;
use tracing::{debug, info, warn};

use crate::error::{polygon_error, Result, Stage, TopologyError};
use crate::geometry::Shape;
use crate::math::Point3;
use crate::topology::{Face, PolygonId, Region};

use super::{DebugTrace, ExtractParams, TracePerimeters};

/// Partitions a face into vertex-connected regions and traces each region's
/// perimeters.
///
/// Polygons with identical corner handles count once: the first copy joins a
/// region, later copies are skipped with a warning.
pub struct ExtractRegions {
    params: ExtractParams,
}

impl ExtractRegions {
    /// Creates a new `ExtractRegions` operation.
    #[must_use]
    pub fn new(params: ExtractParams) -> Self {
        Self { params }
    }

    /// Executes the extraction, replacing the face's regions and recording its
    /// side length range. Returns the number of regions.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SeedVertexUnused`] if no polygon uses the seed
    /// vertex, or any perimeter tracing error.
    pub fn execute(
        &self,
        face: &mut Face,
        vertices: &[Point3],
        mut trace: Option<&mut DebugTrace>,
    ) -> Result<usize> {
        let members = self.partition(face, trace.as_deref_mut())?;

        let mut regions = Vec::with_capacity(members.len());
        for (index, polygons) in members.into_iter().enumerate() {
            let mut perimeters = TracePerimeters::new(index, &self.params)
                .execute(face, &polygons, vertices, trace.as_deref_mut())?
                .into_iter();
            let outer = perimeters.next().unwrap_or_default();
            let inner: Vec<_> = perimeters.collect();
            debug!(
                region = index,
                polygons = polygons.len(),
                outer = outer.len(),
                holes = inner.len(),
                "region extracted"
            );
            regions.push(Region::new(polygons, outer, inner));
        }

        let range = side_length_range(face, vertices)?;
        let count = regions.len();
        face.set_regions(regions);
        face.set_side_length_range(range);
        info!(regions = count, polygons = face.len(), "regions initialized");
        Ok(count)
    }

    /// Groups polygon IDs by connectivity. Each group is in face insertion
    /// order.
    fn partition(
        &self,
        face: &Face,
        mut trace: Option<&mut DebugTrace>,
    ) -> Result<Vec<Vec<PolygonId>>> {
        let seed = self.params.seed_vertex;
        let adjacency = face.vertex_adjacency();
        let first = adjacency
            .get(&seed)
            .and_then(|ids| ids.first().copied())
            .ok_or(TopologyError::SeedVertexUnused { vertex: seed })?;

        let position: SecondaryMap<PolygonId, usize> = face
            .ids()
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let mut assigned: SecondaryMap<PolygonId, ()> = SecondaryMap::new();
        let mut originals: HashMap<Shape, usize> = HashMap::new();
        for (pos, (id, polygon)) in face.polygons().enumerate() {
            if let Some(&original) = originals.get(polygon.shape()) {
                warn!(polygon = pos, duplicate_of = original, "duplicate polygon skipped");
                assigned.insert(id, ());
            } else {
                originals.insert(*polygon.shape(), pos);
            }
        }

        let mut groups = Vec::new();
        let mut next = Some(first);
        while let Some(seed_polygon) = next {
            assigned.insert(seed_polygon, ());
            let mut members = vec![seed_polygon];
            let mut worklist = vec![seed_polygon];
            while let Some(id) = worklist.pop() {
                for v in face.polygon(id)?.vertex_indices() {
                    for &neighbor in adjacency.get(&v).into_iter().flatten() {
                        if assigned.insert(neighbor, ()).is_none() {
                            members.push(neighbor);
                            worklist.push(neighbor);
                        }
                    }
                }
            }

            if let Some(t) = trace.as_deref_mut() {
                t.touched_polygons.extend(&members);
            }
            members.sort_by_key(|&id| position[id]);
            groups.push(members);
            next = face.ids().iter().copied().find(|&id| !assigned.contains_key(id));
        }
        Ok(groups)
    }
}

/// Shortest and longest side over every polygon of `face`.
fn side_length_range(face: &Face, vertices: &[Point3]) -> Result<Option<(f64, f64)>> {
    let mut range: Option<(f64, f64)> = None;
    for (pos, (_, polygon)) in face.polygons().enumerate() {
        let pts = polygon
            .positions(vertices)
            .map_err(|e| polygon_error(Stage::RegionExtraction, pos, e))?;
        for i in 0..pts.len() {
            let len = (pts[(i + 1) % pts.len()] - pts[i]).norm();
            range = Some(match range {
                None => (len, len),
                Some((lo, hi)) => (lo.min(len), hi.max(len)),
            });
        }
    }
    Ok(range)
}
