mod color;
mod lanes;
mod mapping;
mod real;

pub use color::{pack_rgba, table_color, unpack_rgba, BACKGROUND_COLOR};
pub use lanes::Lanes;
pub use mapping::{PlaneMapping, ESCAPE_RADIUS_SQ};
pub use real::Real;
