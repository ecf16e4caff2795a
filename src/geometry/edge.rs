use std::fmt;
use std::hash::{Hash, Hasher};

use super::VertexIndex;

/// An undirected edge between two vertex handles.
///
/// Two edges are equal when they join the same pair of vertices, in either
/// direction.
#[derive(Debug, Clone, Copy)]
pub struct IndexedEdge {
    pub u: VertexIndex,
    pub v: VertexIndex,
}

impl IndexedEdge {
    /// Creates an edge from `u` to `v`.
    #[must_use]
    pub fn new(u: VertexIndex, v: VertexIndex) -> Self {
        Self { u, v }
    }

    /// Returns the endpoint opposite `vertex`.
    ///
    /// If `vertex` is not an endpoint, `u` is returned.
    #[must_use]
    pub fn other_end(&self, vertex: VertexIndex) -> VertexIndex {
        if vertex == self.u {
            self.v
        } else {
            self.u
        }
    }

    /// Returns `true` if `vertex` is one of the endpoints.
    #[must_use]
    pub fn contains(&self, vertex: VertexIndex) -> bool {
        vertex == self.u || vertex == self.v
    }

    fn key(&self) -> (VertexIndex, VertexIndex) {
        if self.u <= self.v {
            (self.u, self.v)
        } else {
            (self.v, self.u)
        }
    }
}

impl PartialEq for IndexedEdge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for IndexedEdge {}

impl Hash for IndexedEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for IndexedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}
