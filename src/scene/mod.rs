// scene/ - Static geometry built once at startup
//
// - Paper: subdivided square in the XZ plane, the reference pose every
//   frame is deformed from
// - Ground: the plane that receives the shadow

mod ground;
mod paper;

pub use ground::GroundPlane;
pub use paper::PaperMesh;

/// Vertices per mesh cell (two triangles)
pub const VERTS_PER_CELL: usize = 6;
