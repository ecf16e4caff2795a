use crate::geometry::{IndexedEdge, VertexIndex};

/// An ordered boundary cycle of vertex handles.
///
/// The closing vertex is not repeated: the cycle wraps from the last element
/// back to the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Perimeter {
    vertices: Vec<VertexIndex>,
}

impl Perimeter {
    /// Creates a perimeter from an ordered cycle.
    #[must_use]
    pub fn new(vertices: Vec<VertexIndex>) -> Self {
        Self { vertices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[VertexIndex] {
        &self.vertices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.vertices.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, vertex: VertexIndex) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Consecutive vertex pairs, including the closing pair.
    pub fn edges(&self) -> impl Iterator<Item = IndexedEdge> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| IndexedEdge::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Reverses the traversal direction, keeping element 0 in place.
    pub fn reverse_winding(&mut self) {
        if self.vertices.len() > 1 {
            self.vertices[1..].reverse();
        }
    }

    /// Returns a copy with every handle shifted by `by`.
    #[must_use]
    pub fn offset(&self, by: usize) -> Self {
        Self::new(self.vertices.iter().map(|v| v.offset(by)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perimeter(ids: &[usize]) -> Perimeter {
        Perimeter::new(ids.iter().copied().map(VertexIndex).collect())
    }

    #[test]
    fn reversal_keeps_first_vertex() {
        let mut p = perimeter(&[4, 7, 9, 2]);
        p.reverse_winding();
        assert_eq!(p, perimeter(&[4, 2, 9, 7]));
    }

    #[test]
    fn double_reversal_is_identity() {
        let original = perimeter(&[0, 1, 2, 3, 4]);
        let mut p = original.clone();
        p.reverse_winding();
        p.reverse_winding();
        assert_eq!(p, original);
    }

    #[test]
    fn edges_close_the_cycle() {
        let p = perimeter(&[0, 1, 2]);
        let edges: Vec<IndexedEdge> = p.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], IndexedEdge::new(VertexIndex(2), VertexIndex(0)));
    }

    #[test]
    fn offset_shifts_every_handle() {
        assert_eq!(perimeter(&[0, 3, 1]).offset(10), perimeter(&[10, 13, 11]));
    }
}
