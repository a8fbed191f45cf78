//! Color and depth buffers for one render.
//!
//! Both buffers are flat, row-major, indexed as `y * width + x` with the origin
//! at the top-left pixel. The depth buffer stores camera-space distance and
//! starts at +infinity, so smaller values are closer to the camera.

use crate::math::vec3::Vec3i;

/// Outcome of a depth-tested write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTest {
    /// The fragment was closer and has been written.
    Passed,
    /// An equal or closer fragment was already stored.
    Failed,
    /// The coordinates fall outside the buffer.
    OutOfBounds,
}

pub struct FrameBuffer {
    color_buffer: Vec<Vec3i>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Allocates a black color buffer and a depth buffer at +infinity.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_clear_color(width, height, Vec3i::BLACK)
    }

    pub fn with_clear_color(width: u32, height: u32, clear_color: Vec3i) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            color_buffer: vec![clear_color; size],
            depth_buffer: vec![f32::INFINITY; size],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resets every pixel to `color` and every depth to +infinity.
    pub fn clear(&mut self, color: Vec3i) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(f32::INFINITY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if `depth` is strictly less than the stored
    /// depth. On a tie the earlier write is kept.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: Vec3i) -> DepthTest {
        let Some(idx) = self.index(x, y) else {
            return DepthTest::OutOfBounds;
        };
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.color_buffer[idx] = color;
            DepthTest::Passed
        } else {
            DepthTest::Failed
        }
    }

    /// Set a pixel without depth testing.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Vec3i) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Vec3i> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    /// Get the stored depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }

    pub fn pixels(&self) -> &[Vec3i] {
        &self.color_buffer
    }

    pub fn depths(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Copies the color buffer into an 8-bit RGB image, clamping each channel.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = y as usize * self.width as usize + x as usize;
            image::Rgb(self.color_buffer[idx].to_rgb8())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_black_and_infinitely_deep() {
        let fb = FrameBuffer::new(3, 2);
        assert_eq!(fb.pixels().len(), 6);
        assert!(fb.pixels().iter().all(|p| *p == Vec3i::BLACK));
        assert!(fb.depths().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn pixels_are_row_major_from_top_left() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set_pixel(2, 1, Vec3i::new(9, 9, 9));
        assert_eq!(fb.pixels()[5], Vec3i::new(9, 9, 9));
        assert_eq!(fb.get_pixel(2, 1), Some(Vec3i::new(9, 9, 9)));
    }

    #[test]
    fn closer_fragment_wins() {
        let mut fb = FrameBuffer::new(1, 1);
        let red = Vec3i::new(255, 0, 0);
        let blue = Vec3i::new(0, 0, 255);
        assert_eq!(fb.set_pixel_with_depth(0, 0, 5.0, red), DepthTest::Passed);
        assert_eq!(fb.set_pixel_with_depth(0, 0, 7.0, blue), DepthTest::Failed);
        assert_eq!(fb.get_pixel(0, 0), Some(red));
        assert_eq!(fb.set_pixel_with_depth(0, 0, 2.0, blue), DepthTest::Passed);
        assert_eq!(fb.get_pixel(0, 0), Some(blue));
        assert_eq!(fb.get_depth(0, 0), Some(2.0));
    }

    #[test]
    fn equal_depth_keeps_first_writer() {
        let mut fb = FrameBuffer::new(1, 1);
        let first = Vec3i::new(1, 2, 3);
        fb.set_pixel_with_depth(0, 0, 4.0, first);
        assert_eq!(
            fb.set_pixel_with_depth(0, 0, 4.0, Vec3i::new(7, 7, 7)),
            DepthTest::Failed
        );
        assert_eq!(fb.get_pixel(0, 0), Some(first));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        assert_eq!(
            fb.set_pixel_with_depth(-1, 0, 1.0, Vec3i::new(1, 1, 1)),
            DepthTest::OutOfBounds
        );
        fb.set_pixel(2, 0, Vec3i::new(1, 1, 1));
        assert_eq!(fb.get_pixel(2, 0), None);
        assert!(fb.pixels().iter().all(|p| *p == Vec3i::BLACK));
    }

    #[test]
    fn clear_resets_depth() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.set_pixel_with_depth(0, 0, 1.0, Vec3i::new(1, 1, 1));
        fb.clear(Vec3i::new(10, 20, 30));
        assert_eq!(fb.get_pixel(0, 0), Some(Vec3i::new(10, 20, 30)));
        assert_eq!(fb.get_depth(0, 0), Some(f32::INFINITY));
    }

    #[test]
    fn rgb_image_clamps_channels() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.set_pixel(1, 0, Vec3i::new(300, -4, 128));
        let img = fb.to_rgb_image();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 128]);
    }
}
