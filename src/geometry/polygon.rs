use std::f64::consts::FRAC_PI_2;

use crate::error::GeometryError;
use crate::math::intersect_3d::{line_line_intersect, ray_plane_intersect, RayPlaneHit};
use crate::math::{self, approx_eq, midpoint, points_eq, Point3, Vector3};

use super::{Corner, IndexedEdge, NormalIndex, TriangleBasis, VertexIndex};

/// The corner layout of a polygon. Corner order encodes winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Three corners.
    Triangle([Corner; 3]),
    /// Four corners.
    Quad([Corner; 4]),
}

impl Shape {
    /// The corners in winding order.
    #[must_use]
    pub fn corners(&self) -> &[Corner] {
        match self {
            Self::Triangle(c) => c,
            Self::Quad(c) => c,
        }
    }

    fn corners_mut(&mut self) -> &mut [Corner] {
        match self {
            Self::Triangle(c) => c,
            Self::Quad(c) => c,
        }
    }

    /// Returns the same shape with every vertex handle shifted by `vertices`
    /// and every normal handle by `normals`.
    #[must_use]
    pub fn offset(&self, vertices: usize, normals: usize) -> Self {
        match self {
            Self::Triangle(c) => Self::Triangle(c.map(|k| k.offset(vertices, normals))),
            Self::Quad(c) => Self::Quad(c.map(|k| k.offset(vertices, normals))),
        }
    }
}

/// A triangle or quad over shared vertex and normal tables.
///
/// The polygon stores handles only. Edges, centroid, facet normal, max side
/// length and the barycentric bases are derived from the referenced vertex
/// positions and are rebuilt by [`Polygon::recompute`] whenever the corner
/// order or the positions change.
#[derive(Debug, Clone)]
pub struct Polygon {
    shape: Shape,
    edges: Vec<IndexedEdge>,
    facet_normal: Vector3,
    centroid: Point3,
    max_side_length: f64,
    /// Fan triangles `(0, k, k + 1)`: one for a triangle, two for a quad.
    bases: Vec<TriangleBasis>,
}

impl Polygon {
    /// Creates a polygon and computes its derived data.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex handle is out of range or the polygon is
    /// degenerate (no centroid, no facet normal).
    pub fn new(shape: Shape, vertices: &[Point3]) -> Result<Self, GeometryError> {
        let mut polygon = Self {
            shape,
            edges: Vec::new(),
            facet_normal: Vector3::zeros(),
            centroid: Point3::origin(),
            max_side_length: 0.0,
            bases: Vec::new(),
        };
        polygon.recompute(vertices)?;
        Ok(polygon)
    }

    /// Creates a triangle from `(vertex, normal)` handle pairs.
    ///
    /// # Errors
    ///
    /// See [`Polygon::new`].
    pub fn triangle(corners: [(usize, usize); 3], vertices: &[Point3]) -> Result<Self, GeometryError> {
        Self::new(
            Shape::Triangle(corners.map(|(v, n)| Corner::new(v, n))),
            vertices,
        )
    }

    /// Creates a quad from `(vertex, normal)` handle pairs.
    ///
    /// # Errors
    ///
    /// See [`Polygon::new`].
    pub fn quad(corners: [(usize, usize); 4], vertices: &[Point3]) -> Result<Self, GeometryError> {
        Self::new(Shape::Quad(corners.map(|(v, n)| Corner::new(v, n))), vertices)
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn corners(&self) -> &[Corner] {
        self.shape.corners()
    }

    /// Number of corners (3 or 4).
    #[must_use]
    pub fn size(&self) -> usize {
        self.corners().len()
    }

    /// Vertex handles in winding order.
    pub fn vertex_indices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.corners().iter().map(|c| c.vertex)
    }

    /// Normal handles in winding order.
    pub fn normal_indices(&self) -> impl Iterator<Item = NormalIndex> + '_ {
        self.corners().iter().map(|c| c.normal)
    }

    /// Edges between consecutive corners, the last one closing back to corner 0.
    #[must_use]
    pub fn edges(&self) -> &[IndexedEdge] {
        &self.edges
    }

    /// Unit normal of the polygon's plane, following the right-hand rule.
    #[must_use]
    pub fn facet_normal(&self) -> &Vector3 {
        &self.facet_normal
    }

    #[must_use]
    pub fn centroid(&self) -> &Point3 {
        &self.centroid
    }

    #[must_use]
    pub fn max_side_length(&self) -> f64 {
        self.max_side_length
    }

    #[must_use]
    pub fn bases(&self) -> &[TriangleBasis] {
        &self.bases
    }

    pub(crate) fn set_normal_index(&mut self, corner: usize, normal: NormalIndex) {
        if let Some(c) = self.shape.corners_mut().get_mut(corner) {
            c.normal = normal;
        }
    }

    /// Positions of the corners, looked up in `vertices`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::VertexOutOfRange`] for a dangling handle.
    pub fn positions(&self, vertices: &[Point3]) -> Result<Vec<Point3>, GeometryError> {
        self.vertex_indices()
            .map(|v| {
                vertices
                    .get(v.get())
                    .copied()
                    .ok_or(GeometryError::VertexOutOfRange(v.get()))
            })
            .collect()
    }

    /// Rebuilds all derived data: edges, centroid, facet normal, bases.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex handle is out of range or the polygon is
    /// degenerate.
    pub fn recompute(&mut self, vertices: &[Point3]) -> Result<(), GeometryError> {
        let pts = self.positions(vertices)?;
        let n = pts.len();

        self.edges = (0..n)
            .map(|i| {
                let c = self.corners();
                IndexedEdge::new(c[i].vertex, c[(i + 1) % n].vertex)
            })
            .collect();
        self.max_side_length = (0..n)
            .map(|i| (pts[(i + 1) % n] - pts[i]).norm())
            .fold(0.0, f64::max);

        self.centroid = centroid_of(&self.shape, &pts)?;

        let normal = (pts[1] - pts[0]).cross(&(pts[2] - pts[1]));
        self.facet_normal = math::unit(&normal)
            .map_err(|_| GeometryError::Degenerate("polygon has no facet normal".into()))?;

        self.bases = (1..n - 1)
            .map(|k| TriangleBasis::new(&pts[0], &pts[k], &pts[k + 1], &self.facet_normal))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Reverses the winding, keeping corner 0 in place, and recomputes.
    ///
    /// # Errors
    ///
    /// See [`Polygon::recompute`].
    pub fn reverse_winding(&mut self, vertices: &[Point3]) -> Result<(), GeometryError> {
        self.shape.corners_mut()[1..].reverse();
        self.recompute(vertices)
    }

    /// Orders the corners so the polygon's right-hand normal lies within 90°
    /// of `reference`.
    ///
    /// Without a reference the normal of corner 0 is used. Corner 0 never
    /// moves. Returns `true` if the winding was reversed.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is zero-length, the polygon is
    /// degenerate, or a handle is out of range.
    pub fn normalize_winding(
        &mut self,
        vertices: &[Point3],
        normals: &[Vector3],
        reference: Option<&Vector3>,
    ) -> Result<bool, GeometryError> {
        let reference = match reference {
            Some(r) => math::unit(r)?,
            None => {
                let n = self.corners()[0].normal.get();
                let normal = normals.get(n).ok_or(GeometryError::NormalOutOfRange(n))?;
                math::unit(normal)?
            }
        };

        self.recompute(vertices)?;
        let pts = self.positions(vertices)?;
        let first_side = pts[1] - pts[0];
        let closing_side = pts[pts.len() - 1] - pts[0];
        let winding = math::unit(&first_side.cross(&closing_side))
            .map_err(|_| GeometryError::Degenerate("polygon sides are collinear".into()))?;

        if approx_eq(&winding, &reference) || math::unit_angle(&winding, &reference)? < FRAC_PI_2 {
            return Ok(false);
        }
        self.reverse_winding(vertices)?;
        Ok(true)
    }

    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexIndex) -> bool {
        self.vertex_indices().any(|v| v == vertex)
    }

    #[must_use]
    pub fn contains_edge(&self, edge: &IndexedEdge) -> bool {
        self.edges.iter().any(|e| e == edge)
    }

    /// Returns `true` if one of the corners sits at `point` (within tolerance).
    #[must_use]
    pub fn contains_point(&self, point: &Point3, vertices: &[Point3]) -> bool {
        self.vertex_indices()
            .filter_map(|v| vertices.get(v.get()))
            .any(|q| points_eq(q, point))
    }

    /// Value equality: same corner handles in the same order and the same
    /// facet normal.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        self.shape == other.shape && approx_eq(&self.facet_normal, &other.facet_normal)
    }

    /// Returns `true` if `point` lies strictly on the facet normal's side of
    /// the polygon.
    #[must_use]
    pub fn is_above(&self, point: &Point3) -> bool {
        let to_point = point - self.centroid;
        to_point.norm() > 0.0 && to_point.dot(&self.facet_normal) > 0.0
    }

    /// Intersects a directional ray with the polygon.
    ///
    /// The ray is first met with the facet plane, hits farther than the max
    /// side length from the centroid are rejected, then the fan triangles are
    /// tried in order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero-length direction.
    pub fn ray_intersect(
        &self,
        origin: &Point3,
        direction: &Vector3,
        vertices: &[Point3],
    ) -> Result<Option<RayPlaneHit>, GeometryError> {
        let v0 = self.positions(vertices)?[0];
        let Some(hit) = ray_plane_intersect(origin, direction, &v0, &self.facet_normal)? else {
            return Ok(None);
        };
        if (hit.point - self.centroid).norm() > self.max_side_length {
            return Ok(None);
        }
        if self.bases.iter().any(|b| b.contains(&v0, &hit.point)) {
            Ok(Some(hit))
        } else {
            Ok(None)
        }
    }

    /// Returns the crossing point if the segment `a → b` passes through the
    /// polygon with both endpoints more than `delta` away from it.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `a == b`.
    pub fn line_penetrates(
        &self,
        a: &Point3,
        b: &Point3,
        delta: f64,
        vertices: &[Point3],
    ) -> Result<Option<Point3>, GeometryError> {
        let Some(hit) = self.ray_intersect(a, &(b - a), vertices)? else {
            return Ok(None);
        };
        if hit.alpha > 1.0 {
            return Ok(None);
        }
        let clear = (hit.point - a).norm() > delta && (hit.point - b).norm() > delta;
        Ok(clear.then_some(hit.point))
    }
}

/// Triangle: meet of the medians from corners 0 and 1.
/// Quad: meet of the lines joining midpoints of opposite edges.
fn centroid_of(shape: &Shape, pts: &[Point3]) -> Result<Point3, GeometryError> {
    let found = match shape {
        Shape::Triangle(_) => {
            let mid_12 = midpoint(&pts[1], &pts[2]);
            let mid_02 = midpoint(&pts[0], &pts[2]);
            line_line_intersect(&pts[0], &(mid_12 - pts[0]), &pts[1], &(mid_02 - pts[1]))
        }
        Shape::Quad(_) => {
            let mids: Vec<Point3> = (0..4).map(|i| midpoint(&pts[i], &pts[(i + 1) % 4])).collect();
            line_line_intersect(&mids[0], &(mids[2] - mids[0]), &mids[1], &(mids[3] - mids[1]))
        }
    };
    found.map_err(|e| GeometryError::Degenerate(format!("centroid not found: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn ray_triangle_fixture() -> (Vec<Point3>, Polygon) {
        let verts = vec![p(-1.0, -1.0, 0.0), p(1.0, -1.0, 0.0), p(0.0, 1.0, 0.0)];
        let tri = Polygon::triangle([(0, 0), (1, 0), (2, 0)], &verts).unwrap();
        (verts, tri)
    }

    fn square_xz() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 0.0, 0.0),
        ]
    }

    // ── derived data ──

    #[test]
    fn triangle_derived_data() {
        let verts = vec![p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(0.0, 3.0, 0.0)];
        let tri = Polygon::triangle([(0, 0), (1, 1), (2, 2)], &verts).unwrap();

        assert_eq!(tri.edges().len(), 3);
        assert_eq!(
            tri.edges()[2],
            IndexedEdge::new(VertexIndex(2), VertexIndex(0))
        );
        assert_relative_eq!(*tri.centroid(), p(1.0, 1.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(*tri.facet_normal(), v(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(tri.max_side_length(), 18.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(tri.bases().len(), 1);
    }

    #[test]
    fn quad_derived_data() {
        let quad = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &square_xz()).unwrap();
        assert_relative_eq!(*quad.centroid(), p(0.5, 0.0, 0.5), epsilon = 1e-9);
        assert_relative_eq!(*quad.facet_normal(), v(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_eq!(quad.bases().len(), 2);
        assert_eq!(quad.edges().len(), 4);
    }

    #[test]
    fn collinear_triangle_is_rejected() {
        let verts = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        let result = Polygon::triangle([(0, 0), (1, 0), (2, 0)], &verts);
        assert!(matches!(result, Err(GeometryError::Degenerate(_))));
    }

    #[test]
    fn dangling_vertex_handle_is_rejected() {
        let verts = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        let result = Polygon::triangle([(0, 0), (1, 0), (5, 0)], &verts);
        assert!(matches!(result, Err(GeometryError::VertexOutOfRange(5))));
    }

    // ── winding ──

    #[test]
    fn winding_reversed_to_match_reference() {
        let verts = square_xz();
        let mut quad = Polygon::quad([(0, 0), (1, 1), (2, 2), (3, 3)], &verts).unwrap();
        let down = v(0.0, -1.0, 0.0);

        let reversed = quad.normalize_winding(&verts, &[], Some(&down)).unwrap();

        assert!(reversed);
        let order: Vec<usize> = quad.vertex_indices().map(VertexIndex::get).collect();
        assert_eq!(order, vec![0, 3, 2, 1]);
        let normals: Vec<usize> = quad.normal_indices().map(NormalIndex::get).collect();
        assert_eq!(normals, vec![0, 3, 2, 1]);
        assert_relative_eq!(*quad.facet_normal(), down, epsilon = 1e-12);
    }

    #[test]
    fn winding_normalization_is_idempotent() {
        let verts = square_xz();
        let normals = vec![v(0.0, 1.0, 0.0)];
        let mut quad = Polygon::quad([(0, 0), (3, 0), (2, 0), (1, 0)], &verts).unwrap();

        assert!(quad.normalize_winding(&verts, &normals, None).unwrap());
        let once: Vec<VertexIndex> = quad.vertex_indices().collect();
        assert!(!quad.normalize_winding(&verts, &normals, None).unwrap());
        let twice: Vec<VertexIndex> = quad.vertex_indices().collect();

        assert_eq!(once, twice);
        assert_relative_eq!(*quad.facet_normal(), v(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn reference_need_not_be_exact() {
        let verts = vec![p(0.0, 4.0, 0.0), p(3.0, 0.0, 0.0), p(0.0, 0.0, 5.0)];
        let mut tri = Polygon::triangle([(0, 0), (1, 1), (2, 2)], &verts).unwrap();
        tri.normalize_winding(&verts, &[], Some(&v(-1.0, -1.0, -1.0)))
            .unwrap();
        assert!(tri.facet_normal().dot(&v(-1.0, -1.0, -1.0)) > 0.0);
    }

    #[test]
    fn zero_reference_is_an_error() {
        let verts = square_xz();
        let mut quad = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &verts).unwrap();
        let result = quad.normalize_winding(&verts, &[Vector3::zeros()], None);
        assert!(matches!(result, Err(GeometryError::ZeroVector)));
    }

    // ── ray intersection ──

    #[test]
    fn ray_hits_triangle_in_its_plane() {
        let (verts, tri) = ray_triangle_fixture();
        let hit = tri
            .ray_intersect(&p(0.0, 0.0, -1.0), &v(0.0, 0.0, 1.0), &verts)
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(hit.point.z, 0.0, epsilon = 1e-12);
        assert!(tri.bases()[0].contains(&verts[0], &hit.point));
    }

    #[test]
    fn ray_outside_footprint_misses() {
        let (verts, tri) = ray_triangle_fixture();
        let near = tri
            .ray_intersect(&p(0.9, 0.9, -1.0), &v(0.0, 0.0, 1.0), &verts)
            .unwrap();
        let far = tri
            .ray_intersect(&p(5.0, 5.0, -1.0), &v(0.0, 0.0, 1.0), &verts)
            .unwrap();
        assert!(near.is_none());
        assert!(far.is_none());
    }

    #[test]
    fn ray_hits_second_quad_triangle() {
        let verts = square_xz();
        let quad = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &verts).unwrap();
        // (0.8, 0.2) lies in fan triangle (0, 2, 3), not (0, 1, 2).
        let hit = quad
            .ray_intersect(&p(0.8, 2.0, 0.2), &v(0.0, -1.0, 0.0), &verts)
            .unwrap()
            .unwrap();
        assert_relative_eq!(hit.point, p(0.8, 0.0, 0.2), epsilon = 1e-12);
    }

    #[test]
    fn segment_penetration_needs_clearance() {
        let verts = square_xz();
        let quad = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &verts).unwrap();
        let through = quad
            .line_penetrates(&p(0.5, 1.0, 0.5), &p(0.5, -1.0, 0.5), 0.1, &verts)
            .unwrap();
        let grazing = quad
            .line_penetrates(&p(0.5, 0.05, 0.5), &p(0.5, -1.0, 0.5), 0.1, &verts)
            .unwrap();
        let short = quad
            .line_penetrates(&p(0.5, 2.0, 0.5), &p(0.5, 1.0, 0.5), 0.1, &verts)
            .unwrap();
        assert!(through.is_some());
        assert!(grazing.is_none());
        assert!(short.is_none());
    }

    // ── queries ──

    #[test]
    fn above_follows_facet_normal() {
        let verts = square_xz();
        let quad = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &verts).unwrap();
        assert!(quad.is_above(&p(0.5, 1.0, 0.5)));
        assert!(!quad.is_above(&p(0.5, -1.0, 0.5)));
        assert!(!quad.is_above(quad.centroid()));
    }

    #[test]
    fn duplicate_detection_uses_handles() {
        let verts = square_xz();
        let a = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &verts).unwrap();
        let b = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &verts).unwrap();
        let c = Polygon::quad([(0, 0), (1, 1), (2, 0), (3, 0)], &verts).unwrap();
        assert!(a.is_duplicate_of(&b));
        assert!(!a.is_duplicate_of(&c));
    }

    #[test]
    fn point_and_edge_membership() {
        let verts = square_xz();
        let quad = Polygon::quad([(0, 0), (1, 0), (2, 0), (3, 0)], &verts).unwrap();
        assert!(quad.contains_point(&p(1.0, 0.0, 1.0), &verts));
        assert!(!quad.contains_point(&p(0.5, 0.0, 0.5), &verts));
        assert!(quad.contains_edge(&IndexedEdge::new(VertexIndex(0), VertexIndex(3))));
        assert!(!quad.contains_edge(&IndexedEdge::new(VertexIndex(0), VertexIndex(2))));
    }
}
