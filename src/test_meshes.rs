//! Small flat meshes shared by unit tests. All lie in the y = 0 plane with
//! +Y vertex normals unless noted.

use crate::geometry::{Corner, Shape};
use crate::math::{Point3, Vector3};
use crate::operations::creation::{ImportedFace, ImportedMesh};

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

fn flat(vertices: Vec<Point3>, faces: Vec<ImportedFace>) -> ImportedMesh {
    let normals = vec![Vector3::y(); vertices.len()];
    ImportedMesh::new(vertices, normals, faces)
}

/// Shapes of `mesh` as stored, without winding normalization.
pub fn shapes_of(mesh: &ImportedMesh) -> (Vec<Point3>, Vec<Shape>) {
    let shapes = mesh
        .faces
        .iter()
        .map(|f| {
            let corners: Vec<Corner> = f
                .vertices
                .iter()
                .zip(&f.normals)
                .map(|(&v, &n)| Corner::new(v, n))
                .collect();
            match corners[..] {
                [a, b, c] => Shape::Triangle([a, b, c]),
                [a, b, c, d] => Shape::Quad([a, b, c, d]),
                _ => panic!("fixture faces have 3 or 4 corners"),
            }
        })
        .collect();
    (mesh.vertices.clone(), shapes)
}

/// Unit square as one quad.
pub fn square_quad() -> ImportedMesh {
    flat(
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 0.0, 1.0),
            p(0.0, 0.0, 1.0),
        ],
        vec![ImportedFace::quad([0, 3, 2, 1])],
    )
}

/// Unit square split along the (0, 2) diagonal.
pub fn two_triangle_square() -> ImportedMesh {
    flat(
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 0.0, 1.0),
            p(0.0, 0.0, 1.0),
        ],
        vec![
            ImportedFace::triangle([0, 3, 2]),
            ImportedFace::triangle([0, 2, 1]),
        ],
    )
}

/// 3×3 square with a 1×1 square hole, 8 triangles.
///
/// Outer corners are vertices 0..4, hole corners 4..8, both in the same
/// rotational order.
pub fn ring() -> ImportedMesh {
    let vertices = vec![
        p(0.0, 0.0, 0.0),
        p(3.0, 0.0, 0.0),
        p(3.0, 0.0, 3.0),
        p(0.0, 0.0, 3.0),
        p(1.0, 0.0, 1.0),
        p(2.0, 0.0, 1.0),
        p(2.0, 0.0, 2.0),
        p(1.0, 0.0, 2.0),
    ];
    let mut faces = Vec::new();
    for k in 0..4 {
        let (o0, o1) = (k, (k + 1) % 4);
        let (i0, i1) = (k + 4, (k + 1) % 4 + 4);
        faces.push(ImportedFace::triangle([o0, i0, o1]));
        faces.push(ImportedFace::triangle([o1, i0, i1]));
    }
    flat(vertices, faces)
}

/// Two unit squares three units apart, two triangles each.
pub fn two_squares() -> ImportedMesh {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for (s, x) in [0.0, 3.0].into_iter().enumerate() {
        let b = s * 4;
        vertices.extend([
            p(x, 0.0, 0.0),
            p(x + 1.0, 0.0, 0.0),
            p(x + 1.0, 0.0, 1.0),
            p(x, 0.0, 1.0),
        ]);
        faces.push(ImportedFace::triangle([b, b + 3, b + 2]));
        faces.push(ImportedFace::triangle([b, b + 2, b + 1]));
    }
    flat(vertices, faces)
}

/// Two triangles touching only at vertex 0, the leftmost vertex.
pub fn pinch() -> ImportedMesh {
    flat(
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 0.0, -1.0),
            p(1.0, 0.0, -2.0),
        ],
        vec![
            ImportedFace::triangle([0, 2, 1]),
            ImportedFace::triangle([0, 3, 4]),
        ],
    )
}

/// Two triangles touching only at vertex 2, which is not the leftmost vertex.
pub fn bowtie() -> ImportedMesh {
    flat(
        vec![
            p(0.0, 0.0, -1.0),
            p(2.0, 0.0, -1.0),
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 1.0),
            p(0.5, 0.0, 1.0),
        ],
        vec![
            ImportedFace::triangle([0, 2, 1]),
            ImportedFace::triangle([2, 4, 3]),
        ],
    )
}

/// A triangle in the z = 0 plane with +Z normals.
pub fn xy_triangle() -> ImportedMesh {
    ImportedMesh::new(
        vec![p(-1.0, -1.0, 0.0), p(1.0, -1.0, 0.0), p(0.0, 1.0, 0.0)],
        vec![Vector3::z(); 3],
        vec![ImportedFace::triangle([0, 1, 2])],
    )
}

/// Two unit quads side by side along x, sharing edge (1, 4).
pub fn two_by_one_quads() -> (Vec<Point3>, Vec<Shape>) {
    let mesh = flat(
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(2.0, 0.0, 1.0),
        ],
        vec![
            ImportedFace::quad([0, 3, 4, 1]),
            ImportedFace::quad([1, 4, 5, 2]),
        ],
    );
    shapes_of(&mesh)
}
