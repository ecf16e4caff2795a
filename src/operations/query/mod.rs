mod correspondence;
mod normals;
mod ray_cast;

pub use correspondence::CheckCorrespondence;
pub use normals::{FindNonUnitNormals, NonUnitNormal};
pub use ray_cast::{RayCast, RayHit};

use std::fmt;

/// Which polygon list of a solid a query result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Base,
    Extruded,
    Side,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Base => "base",
            Self::Extruded => "extruded",
            Self::Side => "side",
        })
    }
}
