// world/ - Geometry queries
//
// Pure functions over points, planes and rotations.
// No state, no allocation - just math.

mod region;
mod rotation;
mod shadow;

pub use region::*;
pub use rotation::*;
pub use shadow::*;
