mod extrude;

pub use extrude::{Extrude, ExtrudeParams, SideNormals};
