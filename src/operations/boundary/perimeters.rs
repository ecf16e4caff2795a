use std::collections::HashMap;

use tracing::debug;

use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{IndexedEdge, VertexIndex};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{Face, Perimeter, PolygonId};

use super::{DebugTrace, ExtractParams};

/// Traces the boundary cycles of one region.
///
/// The first returned cycle is the outer boundary, any further ones are
/// holes. Every cycle starts at the leftmost (minimum x) remaining boundary
/// vertex and turns so that the first two boundary directions at the start
/// have a cross product along `up`.
pub struct TracePerimeters {
    region: usize,
    up: Vector3,
    overrun_margin: f64,
}

impl TracePerimeters {
    /// Creates a new `TracePerimeters` operation for region number `region`.
    #[must_use]
    pub fn new(region: usize, params: &ExtractParams) -> Self {
        Self {
            region,
            up: params.up,
            overrun_margin: params.overrun_margin,
        }
    }

    /// Executes the trace over the member `polygons` of `face`.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if an edge is shared by more than two
    /// polygons, a boundary vertex does not have exactly two boundary edges,
    /// the start direction is undecidable, the boundary does not close, or a
    /// walk overruns its edge budget.
    pub fn execute(
        &self,
        face: &Face,
        polygons: &[PolygonId],
        vertices: &[Point3],
        mut trace: Option<&mut DebugTrace>,
    ) -> Result<Vec<Perimeter>> {
        let boundary = self.boundary_edges(face, polygons)?;
        let mut remaining = boundary.clone();
        let mut perimeters = Vec::new();

        while !remaining.is_empty() {
            let start = leftmost(&remaining, vertices)?;
            let first = self.first_edge(start, &boundary, vertices)?;
            let used = self.walk(start, first, &remaining, trace.as_deref_mut())?;

            let cycle: Vec<VertexIndex> = std::iter::once(start)
                .chain(walk_vertices(start, &used))
                .collect();
            remaining.retain(|e| !used.contains(e));
            debug!(
                region = self.region,
                start = %start,
                len = cycle.len(),
                inner = !perimeters.is_empty(),
                "perimeter traced"
            );
            perimeters.push(Perimeter::new(cycle));
        }
        Ok(perimeters)
    }

    /// Edges used by exactly one member polygon, in member then edge order.
    ///
    /// Every boundary vertex must touch exactly two boundary edges, wherever
    /// it lies on its cycle.
    fn boundary_edges(&self, face: &Face, polygons: &[PolygonId]) -> Result<Vec<IndexedEdge>> {
        let mut counts: HashMap<IndexedEdge, usize> = HashMap::new();
        let mut order = Vec::new();
        for &id in polygons {
            for &edge in face.polygon(id)?.edges() {
                let count = counts.entry(edge).or_insert(0);
                if *count == 0 {
                    order.push(edge);
                }
                *count += 1;
            }
        }

        if let Some(&edge) = order.iter().find(|e| counts[*e] > 2) {
            return Err(TopologyError::NonManifoldEdge {
                region: self.region,
                edge,
            }
            .into());
        }
        let boundary: Vec<IndexedEdge> = order.into_iter().filter(|e| counts[e] == 1).collect();

        let mut degree: HashMap<VertexIndex, usize> = HashMap::new();
        for edge in &boundary {
            *degree.entry(edge.u).or_insert(0) += 1;
            *degree.entry(edge.v).or_insert(0) += 1;
        }
        let pinched = boundary
            .iter()
            .flat_map(|e| [e.u, e.v])
            .find(|v| degree[v] != 2);
        if let Some(vertex) = pinched {
            return Err(TopologyError::NonManifoldVertex {
                region: self.region,
                vertex,
                edge_count: degree[&vertex],
            }
            .into());
        }
        Ok(boundary)
    }

    /// Picks which of the two boundary edges at `start` the walk leaves by.
    fn first_edge(
        &self,
        start: VertexIndex,
        boundary: &[IndexedEdge],
        vertices: &[Point3],
    ) -> Result<IndexedEdge> {
        let touching: Vec<IndexedEdge> = boundary.iter().copied().filter(|e| e.contains(start)).collect();
        let [e1, e2] = touching[..] else {
            return Err(TopologyError::NonManifoldVertex {
                region: self.region,
                vertex: start,
                edge_count: touching.len(),
            }
            .into());
        };

        let origin = position(vertices, start)?;
        let d1 = position(vertices, e1.other_end(start))? - origin;
        let d2 = position(vertices, e2.other_end(start))? - origin;
        let turn = d1.cross(&d2).dot(&self.up);
        if turn.abs() < TOLERANCE {
            return Err(TopologyError::DegenerateStart {
                region: self.region,
                vertex: start,
            }
            .into());
        }
        Ok(if turn > 0.0 { e1 } else { e2 })
    }

    /// Follows boundary edges from `start` until the cycle closes. Returns the
    /// edges in walk order, closing edge included.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn walk(
        &self,
        start: VertexIndex,
        first: IndexedEdge,
        remaining: &[IndexedEdge],
        mut trace: Option<&mut DebugTrace>,
    ) -> Result<Vec<IndexedEdge>> {
        let budget = self.overrun_margin * remaining.len() as f64;
        let mut used = vec![first];
        let mut edge = first;
        let mut current = first.other_end(start);
        if let Some(t) = trace.as_deref_mut() {
            t.visited_vertices.push(start);
            t.traced_edges.push(first);
        }

        while current != start {
            let next = remaining
                .iter()
                .copied()
                .find(|e| e.contains(current) && *e != edge)
                .ok_or(TopologyError::DanglingBoundary {
                    region: self.region,
                    vertex: current,
                })?;
            used.push(next);
            if used.len() as f64 > budget {
                return Err(TopologyError::PerimeterOverrun {
                    region: self.region,
                    start,
                    used: used.len(),
                    budget: budget as usize,
                }
                .into());
            }
            if let Some(t) = trace.as_deref_mut() {
                t.visited_vertices.push(current);
                t.traced_edges.push(next);
            }
            current = next.other_end(current);
            edge = next;
        }
        Ok(used)
    }
}

/// The minimum-x endpoint over `edges`; ties go to the first encountered,
/// `u` before `v`.
fn leftmost(edges: &[IndexedEdge], vertices: &[Point3]) -> Result<VertexIndex> {
    let mut best: Option<(VertexIndex, f64)> = None;
    for edge in edges {
        for v in [edge.u, edge.v] {
            let x = position(vertices, v)?.x;
            match best {
                Some((_, best_x)) if x >= best_x => {}
                _ => best = Some((v, x)),
            }
        }
    }
    best.map(|(v, _)| v)
        .ok_or_else(|| TopologyError::EntityNotFound("boundary edge".into()).into())
}

/// Vertices reached along `edges`, excluding the return to `start`.
fn walk_vertices(start: VertexIndex, edges: &[IndexedEdge]) -> Vec<VertexIndex> {
    let mut current = start;
    let mut out = Vec::with_capacity(edges.len());
    for edge in edges {
        current = edge.other_end(current);
        if current != start {
            out.push(current);
        }
    }
    out
}

fn position(vertices: &[Point3], v: VertexIndex) -> std::result::Result<Point3, GeometryError> {
    vertices
        .get(v.get())
        .copied()
        .ok_or(GeometryError::VertexOutOfRange(v.get()))
}
