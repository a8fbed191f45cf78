//! Small linear-algebra toolkit: 2D/3D vectors and a 4x4 transform matrix.

pub mod mat4;
pub mod vec2;
pub mod vec3;

pub use mat4::Mat4;
pub use vec2::{Vec2, Vec2i};
pub use vec3::{Vec3, Vec3i};
