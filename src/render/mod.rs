//! Software rendering: framebuffer, rasterizer and the render driver.

mod framebuffer;
mod rasterizer;
mod renderer;

pub use framebuffer::{DepthTest, FrameBuffer};
pub use rasterizer::{
    edge_function, edges_inside, point_in_triangle, BoundingBox, EdgeFunctionRasterizer,
    Fragment, FragmentShader, RasterTriangle, TriangleStats, VertexColorShader,
};
pub use renderer::{RenderStats, Renderer};
