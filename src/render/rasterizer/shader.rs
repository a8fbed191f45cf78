//! Fragment shaders.
//!
//! The rasterizer handles coverage, barycentric weights, perspective
//! correction and the depth test. A shader only turns the resulting
//! [`Fragment`] into an output color.

use super::Fragment;
use crate::math::vec3::Vec3i;

/// Trait for per-fragment color computation.
pub trait FragmentShader {
    /// Compute the framebuffer color for a fragment that is about to be
    /// depth tested.
    fn shade(&self, fragment: &Fragment) -> Vec3i;
}

/// Writes the interpolated vertex color, scaled from unit range to [0, 255].
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexColorShader;

impl FragmentShader for VertexColorShader {
    #[inline]
    fn shade(&self, fragment: &Fragment) -> Vec3i {
        Vec3i::from_unit_color(fragment.color)
    }
}
