//! Edge function-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. Compute the triangle's bounding box, clamped to the framebuffer
//! 2. For each integer pixel in the box, evaluate three edge functions
//! 3. A pixel is inside if the edge values do not have mixed signs
//!    (zero counts as inside, so shared edges are covered by both triangles)
//! 4. Barycentric weights are the edge values divided by the signed area
//!
//! # Perspective Correction
//!
//! Screen-space barycentric weights are not linear in camera space. The
//! vertices carry `1/z` (z being camera-space distance), and every attribute
//! is pre-divided by z. Both are interpolated linearly in screen space, then
//! the interpolated attribute is multiplied by `z = 1 / interpolated(1/z)`:
//!
//! ```text
//! 1/z   = w0/z0 + w1/z1 + w2/z2
//! attr  = z * (w0*a0/z0 + w1*a1/z1 + w2*a2/z2)
//! ```
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use super::{
    edge_function, edges_inside, BoundingBox, Fragment, FragmentShader, RasterTriangle,
    TriangleStats,
};
use crate::math::{Vec2, Vec3};
use crate::render::framebuffer::{DepthTest, FrameBuffer};

/// Triangle rasterizer using the edge function algorithm.
///
/// Iterates over all pixels in the triangle's bounding box and keeps those
/// the edge functions classify as inside. Each covered pixel is resolved
/// against the depth buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFunctionRasterizer;

impl EdgeFunctionRasterizer {
    /// Creates a new edge function rasterizer instance.
    pub fn new() -> Self {
        EdgeFunctionRasterizer {}
    }

    /// Fills one triangle into the framebuffer.
    ///
    /// Triangles with zero or non-finite signed area contribute nothing.
    /// Fragments whose resolved depth is not a finite positive number, or
    /// whose attributes are not finite, are dropped before the depth test.
    pub fn fill_triangle<S: FragmentShader>(
        &self,
        triangle: &RasterTriangle,
        buffer: &mut FrameBuffer,
        shader: &S,
    ) -> TriangleStats {
        let mut stats = TriangleStats::default();
        let [v0, v1, v2] = triangle.points;
        let (p0, p1, p2) = (v0.xy(), v1.xy(), v2.xy());

        let area = edge_function(p0, p1, p2);
        if !area.is_finite() || area.abs() < f32::EPSILON {
            stats.degenerate = true;
            return stats;
        }

        let Some(bbox) = BoundingBox::clamped(&triangle.points, buffer.width(), buffer.height())
        else {
            return stats;
        };

        // Pre-divide attributes by camera depth (multiply by 1/z).
        let inv_z = [v0.z, v1.z, v2.z];
        let colors: [Vec3; 3] = std::array::from_fn(|i| triangle.colors[i] * inv_z[i]);
        let st: [Vec2; 3] = std::array::from_fn(|i| triangle.st[i] * inv_z[i]);

        for y in bbox.min.y..=bbox.max.y {
            for x in bbox.min.x..=bbox.max.x {
                let p = Vec2::new(x as f32, y as f32);

                let e0 = edge_function(p, p1, p2);
                let e1 = edge_function(p, p2, p0);
                let e2 = edge_function(p, p0, p1);
                if !edges_inside(e0, e1, e2) {
                    continue;
                }
                stats.covered += 1;

                let (w0, w1, w2) = (e0 / area, e1 / area, e2 / area);

                let depth = 1.0 / (w0 * inv_z[0] + w1 * inv_z[1] + w2 * inv_z[2]);
                let color = (colors[0] * w0 + colors[1] * w1 + colors[2] * w2) * depth;
                let st = (st[0] * w0 + st[1] * w1 + st[2] * w2) * depth;

                if !(depth.is_finite() && depth > 0.0) || !color.is_finite() || !st.is_finite() {
                    stats.dropped += 1;
                    continue;
                }

                let fragment = Fragment {
                    x,
                    y,
                    depth,
                    color,
                    st,
                };
                match buffer.set_pixel_with_depth(x, y, depth, shader.shade(&fragment)) {
                    DepthTest::Passed => stats.written += 1,
                    DepthTest::Failed => stats.occluded += 1,
                    DepthTest::OutOfBounds => {}
                }
            }
        }

        stats
    }
}
