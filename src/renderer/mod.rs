//! WebGPU rendering module
//!
//! Geometry is tessellated on the CPU into one triangle list in screen
//! pixels, then drawn with a single alpha-blended pipeline.

pub mod effects;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Scene, View};
pub use shapes::Painter;
pub use vertex::Vertex;
