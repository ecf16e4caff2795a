mod face;
mod perimeter;
mod region;
mod solid;

pub use face::Face;
pub use perimeter::Perimeter;
pub use region::Region;
pub use solid::Solid;

slotmap::new_key_type! {
    /// Generational handle of a polygon inside a [`Face`].
    pub struct PolygonId;
}
