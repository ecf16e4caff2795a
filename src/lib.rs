pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

#[cfg(test)]
mod test_meshes;

pub use error::{Result, SlabmeshError};
