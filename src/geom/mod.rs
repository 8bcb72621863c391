mod coords;
mod geometry;

pub use coords::{Coords, COORD_PRECISION, round_coordinates};
pub use geometry::Geometry;
