mod perimeters;
mod regions;

pub use perimeters::TracePerimeters;
pub use regions::ExtractRegions;

use crate::geometry::{IndexedEdge, VertexIndex};
use crate::math::Vector3;
use crate::topology::PolygonId;

/// Parameters controlling region and perimeter extraction.
#[derive(Debug, Clone, Copy)]
pub struct ExtractParams {
    /// Vertex whose first polygon seeds the first region.
    pub seed_vertex: VertexIndex,
    /// Direction the start-vertex cross product is tested against when
    /// choosing a perimeter's traversal direction.
    pub up: Vector3,
    /// A perimeter walk fails once it has used more than
    /// `overrun_margin × remaining boundary edges`.
    pub overrun_margin: f64,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            seed_vertex: VertexIndex(0),
            up: Vector3::y(),
            overrun_margin: 1.1,
        }
    }
}

/// Diagnostic record of an extraction run.
///
/// Collected only when passed in; extraction never reads it.
#[derive(Debug, Clone, Default)]
pub struct DebugTrace {
    /// Vertices visited by perimeter walks, in visit order.
    pub visited_vertices: Vec<VertexIndex>,
    /// Boundary edges taken by perimeter walks, in walk order.
    pub traced_edges: Vec<IndexedEdge>,
    /// Polygons in the order regions absorbed them.
    pub touched_polygons: Vec<PolygonId>,
}
