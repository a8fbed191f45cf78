//! Triangle rasterization.
//!
//! [`EdgeFunctionRasterizer`] walks a triangle's bounding box and classifies
//! pixels with the free functions [`edge_function`] and [`point_in_triangle`].
//! Color computation is delegated to a [`FragmentShader`].

mod edgefunction;
mod shader;

pub use edgefunction::EdgeFunctionRasterizer;
pub use shader::{FragmentShader, VertexColorShader};

use crate::math::{Vec2, Vec2i, Vec3};

/// A triangle ready for rasterization in raster space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterTriangle {
    /// Pixel x/y, and the reciprocal camera-space depth in z.
    pub points: [Vec3; 3],
    /// Per-vertex colors in unit range.
    pub colors: [Vec3; 3],
    /// Per-vertex texture coordinates. Interpolated, never sampled.
    pub st: [Vec2; 3],
}

impl RasterTriangle {
    pub fn new(points: [Vec3; 3], colors: [Vec3; 3], st: [Vec2; 3]) -> Self {
        Self { points, colors, st }
    }
}

/// A covered pixel with its perspective-correct attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    /// Camera-space distance, `1 / interpolated(1/z)`.
    pub depth: f32,
    pub color: Vec3,
    pub st: Vec2,
}

/// Per-triangle counters reported by the rasterizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangleStats {
    /// Zero signed area, or non-finite raster coordinates.
    pub degenerate: bool,
    /// Pixels that passed the inside test.
    pub covered: u64,
    /// Fragments that passed the depth test.
    pub written: u64,
    /// Fragments hidden by an equal or closer fragment.
    pub occluded: u64,
    /// Fragments dropped because depth or attributes were not finite.
    pub dropped: u64,
}

/// Signed edge function of point `p` against the directed edge `a -> b`.
///
/// ```text
/// E(p) = (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
/// ```
///
/// Zero on the line through `a` and `b`; the sign tells the side.
#[inline]
pub fn edge_function(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// True when the three edge values do not have mixed signs.
///
/// Zero counts as either sign, so points on an edge or vertex are inside.
#[inline]
pub fn edges_inside(e0: f32, e1: f32, e2: f32) -> bool {
    let negative = e0 < 0.0 || e1 < 0.0 || e2 < 0.0;
    let positive = e0 > 0.0 || e1 > 0.0 || e2 > 0.0;
    !(negative && positive)
}

/// Inclusive point-in-triangle test, independent of winding order.
pub fn point_in_triangle(p: Vec2, v0: Vec2, v1: Vec2, v2: Vec2) -> bool {
    edges_inside(
        edge_function(p, v0, v1),
        edge_function(p, v1, v2),
        edge_function(p, v2, v0),
    )
}

/// Inclusive pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: Vec2i,
    pub max: Vec2i,
}

impl BoundingBox {
    /// Pixel bounds of the points, clamped to `[0, width-1] x [0, height-1]`.
    ///
    /// Returns `None` when the clamped box is empty.
    pub fn clamped(points: &[Vec3; 3], width: u32, height: u32) -> Option<Self> {
        let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

        let min = Vec2i::new(
            (min_x.floor() as i32).max(0),
            (min_y.floor() as i32).max(0),
        );
        let max = Vec2i::new(
            (max_x.ceil() as i32).min(width as i32 - 1),
            (max_y.ceil() as i32).min(height as i32 - 1),
        );

        if min.x > max.x || min.y > max.y {
            None
        } else {
            Some(Self { min, max })
        }
    }

    pub fn pixel_count(&self) -> u64 {
        (self.max.x - self.min.x + 1) as u64 * (self.max.y - self.min.y + 1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_triangle() -> [Vec2; 3] {
        [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)]
    }

    #[test]
    fn interior_point_is_inside() {
        let [a, b, c] = right_triangle();
        assert!(point_in_triangle(Vec2::new(1.0, 1.0), a, b, c));
        assert!(point_in_triangle(Vec2::new(2.0, 2.0), a, b, c));
    }

    #[test]
    fn vertices_and_edges_are_inside() {
        let [a, b, c] = right_triangle();
        assert!(point_in_triangle(Vec2::new(0.0, 0.0), a, b, c));
        assert!(point_in_triangle(Vec2::new(2.0, 0.0), a, b, c));
        assert!(point_in_triangle(Vec2::new(0.0, 3.0), a, b, c));
    }

    #[test]
    fn exterior_point_is_outside() {
        let [a, b, c] = right_triangle();
        assert!(!point_in_triangle(Vec2::new(5.0, 5.0), a, b, c));
        assert!(!point_in_triangle(Vec2::new(-1.0, 1.0), a, b, c));
    }

    #[test]
    fn winding_order_does_not_matter() {
        let [a, b, c] = right_triangle();
        assert!(point_in_triangle(Vec2::new(1.0, 1.0), a, c, b));
        assert!(!point_in_triangle(Vec2::new(5.0, 5.0), a, c, b));
    }

    #[test]
    fn edge_function_of_vertex_is_signed_area() {
        let [a, b, c] = right_triangle();
        // Twice the triangle area, sign given by winding.
        assert_eq!(edge_function(a, b, c).abs(), 16.0);
        assert_eq!(edge_function(a, b, c), -edge_function(a, c, b));
        assert_eq!(edge_function(Vec2::new(2.0, 0.0), a, b), 0.0);
    }

    #[test]
    fn bounding_box_is_clamped_to_buffer() {
        let points = [
            Vec3::new(-5.0, 2.2, 0.0),
            Vec3::new(3.5, -1.0, 0.0),
            Vec3::new(20.0, 7.9, 0.0),
        ];
        let bbox = BoundingBox::clamped(&points, 10, 6).unwrap();
        assert_eq!(bbox.min, Vec2i::new(0, 0));
        assert_eq!(bbox.max, Vec2i::new(9, 5));
        assert_eq!(bbox.pixel_count(), 60);
    }

    #[test]
    fn off_screen_bounding_box_is_empty() {
        let points = [
            Vec3::new(20.0, 1.0, 0.0),
            Vec3::new(30.0, 1.0, 0.0),
            Vec3::new(25.0, 5.0, 0.0),
        ];
        assert_eq!(BoundingBox::clamped(&points, 10, 10), None);
    }
}
