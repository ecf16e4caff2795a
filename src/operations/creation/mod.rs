mod build_solid;
mod import;

pub use build_solid::BuildSolid;
pub use import::{ImportedFace, ImportedMesh};
