//! 4x4 transformation matrix using the row-vector convention.
//!
//! # Convention
//! - Points are **row vectors** on the left: `p' = p * M`
//! - Translation is stored in the **last row** (`data[3][0..3]`)
//! - Transforms chain **left-to-right**: `v * A * B` applies A first, then B
//!
//! # Example
//! ```ignore
//! let model_to_camera = model_to_world * world_to_camera; // world step first
//! let p_camera = model_to_camera.transform_point(p_model);
//! ```

use std::ops::{Index, IndexMut, Mul};

use super::vec3::Vec3;

/// 4x4 matrix stored as `data[row][col]`. Defaults to identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last row (row-vector convention).
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a right-handed perspective matrix for a camera looking down -Z.
    ///
    /// Camera-space z is remapped so that the near plane lands on 0 and the
    /// far plane on 1 after the homogeneous divide. `w` receives `-z`.
    ///
    /// # Arguments
    ///
    /// * `fov_y_degrees` - Vertical field of view in degrees.
    /// * `aspect_ratio` - Width divided by height; narrows the x scale.
    /// * `near`, `far` - Clipping plane distances (positive).
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let scale = 1.0 / (fov_y_degrees.to_radians() / 2.0).tan();
        let depth = far - near;
        Mat4::new([
            [scale / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, scale, 0.0, 0.0],
            [0.0, 0.0, -far / depth, -1.0],
            [0.0, 0.0, -far * near / depth, 0.0],
        ])
    }

    /// Creates a camera-to-world matrix placing a camera at `eye` and
    /// pointing its -Z axis at `target`.
    ///
    /// Invert the result to obtain the world-to-camera transform.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (eye - target).normalize();
        let right = up.cross(forward).normalize();
        let up = forward.cross(right);

        Mat4::new([
            [right.x, right.y, right.z, 0.0],
            [up.x, up.y, up.z, 0.0],
            [forward.x, forward.y, forward.z, 0.0],
            [eye.x, eye.y, eye.z, 1.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, cols) in data.iter_mut().enumerate() {
            for (col, value) in cols.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4::new(data)
    }

    /// Computes the inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Returns `None` if a zero pivot shows up at any step (singular matrix).
    pub fn inverse(&self) -> Option<Mat4> {
        let mut t = self.data;
        let mut s = Mat4::identity().data;

        // Forward elimination
        for i in 0..4 {
            let mut pivot = i;
            let mut pivot_size = t[i][i].abs();
            for (j, row) in t.iter().enumerate().skip(i + 1) {
                let size = row[i].abs();
                if size > pivot_size {
                    pivot = j;
                    pivot_size = size;
                }
            }

            if pivot_size == 0.0 {
                return None;
            }

            if pivot != i {
                t.swap(i, pivot);
                s.swap(i, pivot);
            }

            for j in (i + 1)..4 {
                let f = t[j][i] / t[i][i];
                for k in 0..4 {
                    t[j][k] -= f * t[i][k];
                    s[j][k] -= f * s[i][k];
                }
            }
        }

        // Backward substitution
        for i in (0..4).rev() {
            let f = t[i][i];
            if f == 0.0 {
                return None;
            }

            for k in 0..4 {
                t[i][k] /= f;
                s[i][k] /= f;
            }

            for j in 0..i {
                let f = t[j][i];
                for k in 0..4 {
                    t[j][k] -= f * t[i][k];
                    s[j][k] -= f * s[i][k];
                }
            }
        }

        Some(Mat4::new(s))
    }

    /// Inverse with the identity matrix substituted for a singular input.
    ///
    /// An identity result does not mean the inversion succeeded; use
    /// [`Mat4::inverse`] when the caller needs to know.
    pub fn inverse_or_identity(&self) -> Mat4 {
        self.inverse().unwrap_or_else(|| {
            log::warn!("singular matrix, substituting identity for its inverse");
            Mat4::identity()
        })
    }

    /// Transforms a point (implicit w = 1).
    ///
    /// The homogeneous divide is applied when the resulting w is neither 0 nor 1.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.data;
        let x = p.x * m[0][0] + p.y * m[1][0] + p.z * m[2][0] + m[3][0];
        let y = p.x * m[0][1] + p.y * m[1][1] + p.z * m[2][1] + m[3][1];
        let z = p.x * m[0][2] + p.y * m[1][2] + p.z * m[2][2] + m[3][2];
        let w = p.x * m[0][3] + p.y * m[1][3] + p.z * m[2][3] + m[3][3];

        if w != 0.0 && w != 1.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }

    /// Transforms a direction (implicit w = 0), ignoring the translation row.
    #[inline]
    pub fn transform_dir(&self, d: Vec3) -> Vec3 {
        let m = &self.data;
        Vec3::new(
            d.x * m[0][0] + d.y * m[1][0] + d.z * m[2][0],
            d.x * m[0][1] + d.y * m[1][1] + d.z * m[2][1],
            d.x * m[0][2] + d.y * m[1][2] + d.z * m[2][2],
        )
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

impl Index<usize> for Mat4 {
    type Output = [f32; 4];

    fn index(&self, row: usize) -> &[f32; 4] {
        &self.data[row]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, row: usize) -> &mut [f32; 4] {
        &mut self.data[row]
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For the row-vector convention, `v * A * B` applies A first, then B.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, cols) in result.iter_mut().enumerate() {
            for (col, value) in cols.iter_mut().enumerate() {
                *value = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat_eq(a: &Mat4, b: &Mat4) {
        for row in 0..4 {
            for col in 0..4 {
                assert_relative_eq!(a.get(row, col), b.get(row, col), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Mat4::default(), Mat4::identity());
    }

    #[test]
    fn translation_moves_points_but_not_directions() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(m.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_dir(Vec3::ONE), Vec3::ONE);
    }

    #[test]
    fn product_applies_left_operand_first() {
        let m = Mat4::scaling(2.0, 2.0, 2.0) * Mat4::translation(1.0, 0.0, 0.0);
        // scale first, then translate
        assert_eq!(m.transform_point(Vec3::ONE), Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn inverse_undoes_transform() {
        let m = Mat4::scaling(2.0, 4.0, 0.5) * Mat4::translation(3.0, -1.0, 7.0);
        let inv = m.inverse().expect("matrix is invertible");
        assert_mat_eq(&(m * inv), &Mat4::identity());

        let p = Vec3::new(0.3, -2.0, 5.0);
        let back = inv.transform_point(m.transform_point(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-5);
    }

    #[test]
    fn inverse_pivots_past_zero_diagonal() {
        // Permutation matrix: every diagonal entry is zero.
        let m = Mat4::new([
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let inv = m.inverse().expect("permutation is invertible");
        assert_mat_eq(&(m * inv), &Mat4::identity());
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let mut m = Mat4::identity();
        m[2] = [0.0; 4];
        assert_eq!(m.inverse(), None);
    }

    #[test]
    fn singular_matrix_falls_back_to_identity() {
        let mut m = Mat4::translation(1.0, 2.0, 3.0);
        m[1] = [0.0; 4];
        assert_eq!(m.inverse_or_identity(), Mat4::identity());
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let m = Mat4::perspective(90.0, 1.0, 0.1, 100.0);
        let near = m.transform_point(Vec3::new(0.0, 0.0, -0.1));
        let far = m.transform_point(Vec3::new(0.0, 0.0, -100.0));
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_puts_frustum_edge_on_ndc_boundary() {
        // 90 degree vertical FOV: the frustum edge has y == -z.
        let m = Mat4::perspective(90.0, 1.0, 0.1, 100.0);
        let p = m.transform_point(Vec3::new(0.0, 5.0, -5.0));
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_points_negative_z_at_target() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let camera_to_world = Mat4::look_at(eye, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let world_to_camera = camera_to_world.inverse().expect("pose is invertible");
        let origin = world_to_camera.transform_point(Vec3::ZERO);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Mat4::translation(1.0, 2.0, 3.0).transpose();
        assert_eq!(m.get(0, 3), 1.0);
        assert_eq!(m.get(2, 3), 3.0);
        assert_eq!(m.get(3, 0), 0.0);
    }
}
