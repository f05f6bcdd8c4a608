//! Rendering module
//!
//! `scene::draw_frame` is the render pass; it talks to a `DrawSurface`.
//! `pipeline::GpuSurface` presents through WebGPU, `surface::CommandList`
//! records for headless runs and tests.

pub mod batch;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use batch::VertexBatch;
pub use pipeline::{GpuSurface, RenderState, TextSink};
pub use scene::{Frame, draw_frame};
pub use surface::{CommandList, DrawCommand, DrawSurface, TextAlign, TextRun};
