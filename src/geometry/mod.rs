mod basis;
mod edge;
mod polygon;

pub use basis::TriangleBasis;
pub use edge::IndexedEdge;
pub use polygon::{Polygon, Shape};

use std::fmt;

/// Handle of a vertex in the vertex table owned by a [`Solid`](crate::topology::Solid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIndex(pub usize);

impl VertexIndex {
    /// Position in the vertex table.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    /// Returns the handle shifted by `by` table slots.
    #[must_use]
    pub fn offset(self, by: usize) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle of a normal in a normal table owned by a [`Solid`](crate::topology::Solid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalIndex(pub usize);

impl NormalIndex {
    /// Position in the normal table.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    /// Returns the handle shifted by `by` table slots.
    #[must_use]
    pub fn offset(self, by: usize) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for NormalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One polygon corner: a vertex handle and the handle of its vertex normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corner {
    pub vertex: VertexIndex,
    pub normal: NormalIndex,
}

impl Corner {
    /// Creates a corner.
    #[must_use]
    pub fn new(vertex: usize, normal: usize) -> Self {
        Self {
            vertex: VertexIndex(vertex),
            normal: NormalIndex(normal),
        }
    }

    /// Returns the corner with both handles shifted.
    #[must_use]
    pub fn offset(self, vertices: usize, normals: usize) -> Self {
        Self {
            vertex: self.vertex.offset(vertices),
            normal: self.normal.offset(normals),
        }
    }
}
