//! A CPU pinhole-camera renderer.
//!
//! Projects world-space triangles through a pinhole [`Camera`], fills them
//! with a depth-buffered, perspective-correct edge-function rasterizer, and
//! writes the result as a plain-text PPM image.
//!
//! # Quick Start
//!
//! ```ignore
//! use pinhole::prelude::*;
//!
//! let mut camera = Camera::new(Intrinsics::default(), 512, 512)?;
//! camera.rescale_aspect_ratio();
//! let (frame, _stats) = Renderer::new().render(&camera, &Scene::demo());
//! pinhole::ppm::save("output.ppm", &frame)?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod math;
pub mod ppm;
pub mod render;
pub mod scene;
pub mod triangle;

// Re-export commonly needed types at crate root for convenience
pub use camera::{Camera, CameraError, FovModel, Intrinsics, SensorModel};
pub use ppm::PpmError;
pub use render::{FrameBuffer, RenderStats, Renderer};
pub use scene::{LoadError, Primitive, Scene};
pub use triangle::Triangle;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use pinhole::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, FovModel, Intrinsics, ScreenBounds, SensorModel};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::{Vec2, Vec2i};
    pub use crate::math::vec3::{Vec3, Vec3i};

    // Scene
    pub use crate::scene::{Primitive, Scene};
    pub use crate::triangle::Triangle;

    // Rendering
    pub use crate::render::{FrameBuffer, RenderStats, Renderer};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{EdgeFunctionRasterizer, FrameBuffer, RasterTriangle, VertexColorShader};
}
