mod normals;

pub use normals::AverageVertexNormals;
