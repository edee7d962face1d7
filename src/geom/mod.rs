mod ops;
mod simplify;

pub use ops::{GeometryOps, PlanarOps};
pub(crate) use simplify::{simplify_multipolygon, vertex_count};
