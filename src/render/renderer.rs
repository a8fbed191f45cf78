//! Render driver.
//!
//! Projects each scene primitive through the camera and fills it into a
//! freshly allocated [`FrameBuffer`]. Single-threaded; primitives are drawn in
//! list order and the depth buffer alone decides visibility.

use super::framebuffer::FrameBuffer;
use super::rasterizer::{
    EdgeFunctionRasterizer, FragmentShader, RasterTriangle, TriangleStats, VertexColorShader,
};
use crate::camera::Camera;
use crate::math::vec3::Vec3i;
use crate::scene::{Primitive, Scene};

/// Counters accumulated over one render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: u64,
    /// Triangles skipped for zero or non-finite projected area.
    pub degenerate: u64,
    pub fragments_written: u64,
    pub fragments_occluded: u64,
    /// Fragments dropped for non-finite or non-positive depth.
    pub fragments_dropped: u64,
}

impl RenderStats {
    fn record(&mut self, triangle: &TriangleStats) {
        self.triangles += 1;
        if triangle.degenerate {
            self.degenerate += 1;
        }
        self.fragments_written += triangle.written;
        self.fragments_occluded += triangle.occluded;
        self.fragments_dropped += triangle.dropped;
    }
}

pub struct Renderer {
    rasterizer: EdgeFunctionRasterizer,
    clear_color: Vec3i,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            rasterizer: EdgeFunctionRasterizer::new(),
            clear_color: Vec3i::BLACK,
        }
    }

    pub fn with_clear_color(mut self, clear_color: Vec3i) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn clear_color(&self) -> Vec3i {
        self.clear_color
    }

    /// Projects a primitive's vertices into raster space.
    pub fn project(camera: &Camera, primitive: &Primitive) -> RasterTriangle {
        RasterTriangle::new(
            primitive.triangle.vertices.map(|v| camera.project(v)),
            primitive.colors,
            primitive.st,
        )
    }

    /// Renders the scene with vertex colors into a new framebuffer sized to
    /// the camera's resolution.
    pub fn render(&self, camera: &Camera, scene: &Scene) -> (FrameBuffer, RenderStats) {
        self.render_with_shader(camera, scene, &VertexColorShader)
    }

    pub fn render_with_shader<S: FragmentShader>(
        &self,
        camera: &Camera,
        scene: &Scene,
        shader: &S,
    ) -> (FrameBuffer, RenderStats) {
        let mut buffer =
            FrameBuffer::with_clear_color(camera.width(), camera.height(), self.clear_color);
        log::info!(
            "rendering {} triangles at {}x{}",
            scene.len(),
            camera.width(),
            camera.height()
        );

        let mut stats = RenderStats::default();
        for (index, primitive) in scene.primitives().iter().enumerate() {
            let triangle = Self::project(camera, primitive);
            let triangle_stats = self.rasterizer.fill_triangle(&triangle, &mut buffer, shader);

            if triangle_stats.degenerate {
                log::warn!(
                    "triangle {} skipped: degenerate or non-finite projection {:?}",
                    index,
                    triangle.points
                );
            } else {
                log::debug!(
                    "triangle {}: raster {:?}, {} covered, {} written",
                    index,
                    triangle.points,
                    triangle_stats.covered,
                    triangle_stats.written
                );
            }
            if triangle_stats.dropped > 0 {
                log::warn!(
                    "triangle {}: dropped {} fragments with non-finite depth",
                    index,
                    triangle_stats.dropped
                );
            }
            stats.record(&triangle_stats);
        }

        log::info!(
            "render finished: {} fragments written, {} occluded, {} degenerate triangles",
            stats.fragments_written,
            stats.fragments_occluded,
            stats.degenerate
        );
        (buffer, stats)
    }
}
