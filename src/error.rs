use std::fmt;

use thiserror::Error;

use crate::geometry::{IndexedEdge, VertexIndex};

/// Top-level error type for the slabmesh kernel.
#[derive(Debug, Error)]
pub enum SlabmeshError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Building the base face from imported mesh data.
    Import,
    /// Partitioning a face into connected regions.
    RegionExtraction,
    /// Tracing region boundary cycles.
    PerimeterTracing,
    /// Reordering polygon corners to match a reference normal.
    WindingNormalization,
    /// Building the extruded face and side quads.
    Extrusion,
    /// Repositioning base vertices onto a target surface.
    SurfaceMapping,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Import => "import",
            Self::RegionExtraction => "region extraction",
            Self::PerimeterTracing => "perimeter tracing",
            Self::WindingNormalization => "winding normalization",
            Self::Extrusion => "extrusion",
            Self::SurfaceMapping => "surface mapping",
        };
        f.write_str(name)
    }
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("no intersection: {0}")]
    NoIntersection(String),

    #[error("cosine {value} is outside the arc-cosine domain")]
    OutOfDomain { value: f64 },

    #[error("vertex handle {0} is outside the vertex table")]
    VertexOutOfRange(usize),

    #[error("normal handle {0} is outside the normal table")]
    NormalOutOfRange(usize),
}

/// Errors raised while extracting regions and perimeters from a face.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("seed vertex {vertex} is not used by any polygon")]
    SeedVertexUnused { vertex: VertexIndex },

    #[error("region {region}: edge {edge} is shared by more than two polygons")]
    NonManifoldEdge { region: usize, edge: IndexedEdge },

    #[error("region {region}: perimeter start vertex {vertex} touches {edge_count} boundary edges, expected 2")]
    NonManifoldVertex {
        region: usize,
        vertex: VertexIndex,
        edge_count: usize,
    },

    #[error("region {region}: cannot choose a winding direction at vertex {vertex}, boundary edges are collinear")]
    DegenerateStart { region: usize, vertex: VertexIndex },

    #[error("region {region}: boundary ends at vertex {vertex} without closing")]
    DanglingBoundary { region: usize, vertex: VertexIndex },

    #[error("region {region}: perimeter from vertex {start} used {used} edges, budget was {budget}")]
    PerimeterOverrun {
        region: usize,
        start: VertexIndex,
        used: usize,
        budget: usize,
    },
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),

    #[error("{stage}: polygon {polygon}: {source}")]
    Polygon {
        stage: Stage,
        polygon: usize,
        #[source]
        source: GeometryError,
    },

    #[error("{stage}: base and extruded faces disagree: {detail}")]
    Correspondence { stage: Stage, detail: String },

    #[error("solid is already extruded")]
    AlreadyExtruded,

    #[error("solid has not been extruded")]
    NotExtruded,
}

/// Convenience type alias for results using [`SlabmeshError`].
pub type Result<T> = std::result::Result<T, SlabmeshError>;

/// Attributes a polygon-level geometry failure to a stage and polygon position.
pub(crate) fn polygon_error(stage: Stage, polygon: usize, source: GeometryError) -> SlabmeshError {
    OperationError::Polygon {
        stage,
        polygon,
        source,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_error_names_stage_and_index() {
        let err = polygon_error(Stage::WindingNormalization, 7, GeometryError::ZeroVector);
        assert_eq!(
            err.to_string(),
            "winding normalization: polygon 7: zero-length vector"
        );
    }

    #[test]
    fn overrun_message_names_region_and_vertex() {
        let err: SlabmeshError = TopologyError::PerimeterOverrun {
            region: 2,
            start: VertexIndex(11),
            used: 9,
            budget: 8,
        }
        .into();
        assert!(err.to_string().contains("region 2"));
        assert!(err.to_string().contains("vertex 11"));
    }
}
