use crate::geometry::VertexIndex;

use super::{Face, Perimeter, PolygonId};

/// A maximal vertex-connected group of polygons within a [`Face`], with its
/// boundary cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    polygons: Vec<PolygonId>,
    outer: Perimeter,
    inner: Vec<Perimeter>,
}

impl Region {
    /// Creates a region from its members (in face insertion order) and its
    /// traced perimeters.
    #[must_use]
    pub fn new(polygons: Vec<PolygonId>, outer: Perimeter, inner: Vec<Perimeter>) -> Self {
        Self {
            polygons,
            outer,
            inner,
        }
    }

    #[must_use]
    pub fn polygons(&self) -> &[PolygonId] {
        &self.polygons
    }

    /// The outer boundary.
    #[must_use]
    pub fn outer(&self) -> &Perimeter {
        &self.outer
    }

    /// Hole boundaries.
    #[must_use]
    pub fn inner(&self) -> &[Perimeter] {
        &self.inner
    }

    /// Outer perimeter first, then the inner ones.
    pub fn perimeters(&self) -> impl Iterator<Item = &Perimeter> {
        std::iter::once(&self.outer).chain(self.inner.iter())
    }

    /// Total number of boundary vertices over all perimeters.
    #[must_use]
    pub fn perimeter_len(&self) -> usize {
        self.perimeters().map(Perimeter::len).sum()
    }

    #[must_use]
    pub fn contains_polygon(&self, id: PolygonId) -> bool {
        self.polygons.contains(&id)
    }

    /// Returns `true` if any member polygon of `face` uses `vertex`.
    #[must_use]
    pub fn contains_vertex(&self, face: &Face, vertex: VertexIndex) -> bool {
        self.polygons
            .iter()
            .filter_map(|&id| face.polygon(id).ok())
            .any(|p| p.contains_vertex(vertex))
    }

    pub(crate) fn reverse_perimeter_windings(&mut self) {
        self.outer.reverse_winding();
        for p in &mut self.inner {
            p.reverse_winding();
        }
    }
}
