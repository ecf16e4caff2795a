use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::geometry::{IndexedEdge, Polygon, VertexIndex};
use crate::math::{Point3, Vector3};

use super::{PolygonId, Region};

/// A flat collection of polygons partitioned into regions.
///
/// Polygons live in a generational arena; iteration always follows insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct Face {
    polygons: SlotMap<PolygonId, Polygon>,
    order: Vec<PolygonId>,
    regions: Vec<Region>,
    center: Option<PolygonId>,
    side_lengths: Option<(f64, f64)>,
}

impl Face {
    /// Creates an empty face.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a polygon and returns its ID.
    pub fn add_polygon(&mut self, polygon: Polygon) -> PolygonId {
        let id = self.polygons.insert(polygon);
        self.order.push(id);
        id
    }

    /// Returns the polygon, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale or foreign ID.
    pub fn polygon(&self, id: PolygonId) -> Result<&Polygon, TopologyError> {
        self.polygons
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("polygon".into()))
    }

    /// Returns the polygon mutably, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale or foreign ID.
    pub fn polygon_mut(&mut self, id: PolygonId) -> Result<&mut Polygon, TopologyError> {
        self.polygons
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("polygon".into()))
    }

    /// Polygon IDs in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[PolygonId] {
        &self.order
    }

    /// Polygons in insertion order.
    pub fn polygons(&self) -> impl Iterator<Item = (PolygonId, &Polygon)> {
        self.order
            .iter()
            .filter_map(|&id| self.polygons.get(id).map(|p| (id, p)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insertion position of `id`.
    #[must_use]
    pub fn position(&self, id: PolygonId) -> Option<usize> {
        self.order.iter().position(|&o| o == id)
    }

    // --- Regions ---

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub(crate) fn set_regions(&mut self, regions: Vec<Region>) {
        self.regions = regions;
    }

    /// Reverses every region perimeter. Polygon corner order is unaffected.
    pub fn reverse_perimeter_windings(&mut self) {
        for region in &mut self.regions {
            region.reverse_perimeter_windings();
        }
    }

    /// Shortest and longest polygon side, as recorded by region extraction.
    #[must_use]
    pub fn side_length_range(&self) -> Option<(f64, f64)> {
        self.side_lengths
    }

    pub(crate) fn set_side_length_range(&mut self, range: Option<(f64, f64)>) {
        self.side_lengths = range;
    }

    // --- Adjacency ---

    /// Polygons using `vertex`, in insertion order.
    #[must_use]
    pub fn polygons_containing_vertex(&self, vertex: VertexIndex) -> Vec<PolygonId> {
        self.polygons()
            .filter(|(_, p)| p.contains_vertex(vertex))
            .map(|(id, _)| id)
            .collect()
    }

    /// Polygons having `edge` (either direction), in insertion order.
    #[must_use]
    pub fn polygons_containing_edge(&self, edge: &IndexedEdge) -> Vec<PolygonId> {
        self.polygons()
            .filter(|(_, p)| p.contains_edge(edge))
            .map(|(id, _)| id)
            .collect()
    }

    /// Polygons sharing at least one vertex with `id`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if `id` is not in the face.
    pub fn neighbors(&self, id: PolygonId) -> Result<Vec<PolygonId>, TopologyError> {
        let polygon = self.polygon(id)?;
        Ok(self
            .polygons()
            .filter(|&(other, p)| other != id && polygon.vertex_indices().any(|v| p.contains_vertex(v)))
            .map(|(other, _)| other)
            .collect())
    }

    /// Maps each used vertex to the polygons containing it, in insertion order.
    pub(crate) fn vertex_adjacency(&self) -> HashMap<VertexIndex, Vec<PolygonId>> {
        let mut adjacency: HashMap<VertexIndex, Vec<PolygonId>> = HashMap::new();
        for (id, polygon) in self.polygons() {
            for v in polygon.vertex_indices() {
                adjacency.entry(v).or_default().push(id);
            }
        }
        adjacency
    }

    // --- Center ---

    pub(crate) fn set_center(&mut self, id: Option<PolygonId>) {
        self.center = id;
    }

    /// Selects the polygon whose centroid is nearest to `point`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the face is empty.
    pub fn set_center_nearest(&mut self, point: &Point3) -> Result<PolygonId, TopologyError> {
        let nearest = self
            .polygons()
            .map(|(id, p)| (id, (p.centroid() - point).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
            .ok_or_else(|| TopologyError::EntityNotFound("polygon".into()))?;
        self.center = Some(nearest);
        Ok(nearest)
    }

    /// Selects the polygon nearest to the middle of the bounding box of all
    /// outer perimeter vertices. Falls back to every polygon vertex when no
    /// regions have been extracted.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the face is empty or a
    /// vertex handle is outside `vertices`.
    pub fn set_center_from_bounds(&mut self, vertices: &[Point3]) -> Result<PolygonId, TopologyError> {
        let handles: Vec<VertexIndex> = if self.regions.is_empty() {
            self.polygons().flat_map(|(_, p)| p.vertex_indices()).collect()
        } else {
            self.regions.iter().flat_map(|r| r.outer().iter()).collect()
        };

        let mut bounds: Option<(Vector3, Vector3)> = None;
        for v in handles {
            let q = vertices
                .get(v.get())
                .ok_or_else(|| TopologyError::EntityNotFound(format!("vertex {v}")))?
                .coords;
            bounds = Some(match bounds {
                None => (q, q),
                Some((lo, hi)) => (lo.inf(&q), hi.sup(&q)),
            });
        }
        let (lo, hi) = bounds.ok_or_else(|| TopologyError::EntityNotFound("polygon".into()))?;
        self.set_center_nearest(&Point3::from((lo + hi) * 0.5))
    }

    /// The center polygon.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if no center has been chosen.
    pub fn center_polygon(&self) -> Result<PolygonId, TopologyError> {
        self.center
            .ok_or_else(|| TopologyError::EntityNotFound("center polygon".into()))
    }

    /// Centroid of the center polygon.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if no center has been chosen.
    pub fn center_point(&self) -> Result<Point3, TopologyError> {
        Ok(*self.polygon(self.center_polygon()?)?.centroid())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_meshes;

    fn grid_face() -> (Vec<Point3>, Face) {
        let (verts, shapes) = test_meshes::two_by_one_quads();
        let mut face = Face::new();
        for shape in shapes {
            face.add_polygon(Polygon::new(shape, &verts).unwrap());
        }
        (verts, face)
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let (_, face) = grid_face();
        let ids: Vec<PolygonId> = face.polygons().map(|(id, _)| id).collect();
        assert_eq!(ids, face.ids());
        assert_eq!(face.position(ids[1]), Some(1));
    }

    #[test]
    fn shared_edge_and_vertex_lookup() {
        let (_, face) = grid_face();
        let shared = IndexedEdge::new(VertexIndex(1), VertexIndex(4));
        assert_eq!(face.polygons_containing_edge(&shared).len(), 2);
        assert_eq!(face.polygons_containing_vertex(VertexIndex(0)).len(), 1);
        assert_eq!(face.neighbors(face.ids()[0]).unwrap(), vec![face.ids()[1]]);
    }

    #[test]
    fn center_from_bounds_without_regions() {
        let (verts, mut face) = grid_face();
        let id = face.set_center_from_bounds(&verts).unwrap();
        assert!(face.ids().contains(&id));
        assert_eq!(face.center_polygon().unwrap(), id);
    }

    #[test]
    fn center_of_empty_face_is_an_error() {
        let mut face = Face::new();
        assert!(face.center_point().is_err());
        assert!(face.set_center_from_bounds(&[]).is_err());
    }
}
