//! Pinhole camera
//!
//! # Coordinate System
//!
//! Uses a **right-handed** camera space:
//! - X: positive right
//! - Y: positive up
//! - Z: positive backward (the camera looks down -Z)
//!
//! # Pipeline
//!
//! ```text
//! world --(world_to_camera)--> camera --(perspective)--> NDC [-1,1]² --> raster
//! ```
//!
//! Raster space has its origin at the top-left pixel with y growing downward,
//! so the NDC y axis is flipped during the final mapping.
//!
//! # Intrinsics
//!
//! Two interchangeable intrinsic models are supported, chosen at construction:
//! - [`SensorModel`]: physical film back and focal length. The screen window
//!   on the near plane is derived from the film geometry.
//! - [`FovModel`]: vertical field of view, through a perspective matrix.
//!
//! Both produce the same raster-space contract from [`Camera::project`].
//!
//! No clipping is performed. Points on or behind the camera plane project to
//! infinite or mirrored raster coordinates and are left for the rasterizer to
//! reject per fragment.

use thiserror::Error;

use crate::math::{Mat4, Vec2, Vec3};

const INCH_TO_MM: f32 = 25.4;

/// Errors raised while configuring a [`Camera`].
#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    #[error("image resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("clipping planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipping { near: f32, far: f32 },

    #[error("invalid intrinsic parameter: {0}")]
    InvalidIntrinsics(String),

    #[error("camera-to-world transform is singular and cannot be inverted")]
    SingularTransform,
}

/// Physical camera: film back in inches, focal length in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorModel {
    pub focal_length: f32,
    pub film_aperture_width: f32,
    pub film_aperture_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for SensorModel {
    /// 35mm lens on a 0.980" x 0.735" film back.
    fn default() -> Self {
        Self {
            focal_length: 35.0,
            film_aperture_width: 0.98,
            film_aperture_height: 0.735,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl SensorModel {
    pub fn film_aspect_ratio(&self) -> f32 {
        self.film_aperture_width / self.film_aperture_height
    }

    /// Screen window on the near plane, before any aspect correction.
    pub fn screen_bounds(&self) -> ScreenBounds {
        let top = ((self.film_aperture_height * INCH_TO_MM / 2.0) / self.focal_length) * self.near;
        ScreenBounds::symmetric(top, top * self.film_aspect_ratio())
    }
}

/// Field-of-view camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovModel {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FovModel {
    fn default() -> Self {
        Self {
            fov_y: 90.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl FovModel {
    /// Screen window on the near plane for the given device aspect ratio.
    pub fn screen_bounds(&self, aspect_ratio: f32) -> ScreenBounds {
        let top = self.near * (self.fov_y.to_radians() / 2.0).tan();
        ScreenBounds::symmetric(top, top * aspect_ratio)
    }
}

/// The intrinsic model a [`Camera`] projects with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intrinsics {
    Sensor(SensorModel),
    Fov(FovModel),
}

impl Default for Intrinsics {
    fn default() -> Self {
        Intrinsics::Sensor(SensorModel::default())
    }
}

impl Intrinsics {
    pub fn near(&self) -> f32 {
        match self {
            Intrinsics::Sensor(s) => s.near,
            Intrinsics::Fov(f) => f.near,
        }
    }

    pub fn far(&self) -> f32 {
        match self {
            Intrinsics::Sensor(s) => s.far,
            Intrinsics::Fov(f) => f.far,
        }
    }

    fn validate(&self) -> Result<(), CameraError> {
        let (near, far) = (self.near(), self.far());
        if !(near > 0.0 && far > near) {
            return Err(CameraError::InvalidClipping { near, far });
        }
        match self {
            Intrinsics::Sensor(s) => {
                if !(s.focal_length > 0.0) {
                    return Err(CameraError::InvalidIntrinsics(format!(
                        "focal length must be positive, got {}",
                        s.focal_length
                    )));
                }
                if !(s.film_aperture_width > 0.0 && s.film_aperture_height > 0.0) {
                    return Err(CameraError::InvalidIntrinsics(format!(
                        "film aperture must be positive, got {}x{}",
                        s.film_aperture_width, s.film_aperture_height
                    )));
                }
            }
            Intrinsics::Fov(f) => {
                if !(f.fov_y > 0.0 && f.fov_y < 180.0) {
                    return Err(CameraError::InvalidIntrinsics(format!(
                        "field of view must lie in (0, 180) degrees, got {}",
                        f.fov_y
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Screen window on the near plane, in camera-space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl ScreenBounds {
    fn symmetric(top: f32, right: f32) -> Self {
        Self {
            top,
            bottom: -top,
            left: -right,
            right,
        }
    }

    /// Maps a screen-space point into [-1, 1]² normalized device coordinates.
    #[inline]
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let width = self.right - self.left;
        let height = self.top - self.bottom;
        Vec2::new(
            2.0 * p.x / width - (self.right + self.left) / width,
            2.0 * p.y / height - (self.top + self.bottom) / height,
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }
}

/// Pinhole camera with fixed resolution and an explicit world-to-camera transform.
#[derive(Debug, Clone)]
pub struct Camera {
    intrinsics: Intrinsics,
    width: u32,
    height: u32,
    bounds: ScreenBounds,
    /// Perspective matrix of the FOV model; identity for the sensor model.
    projection: Mat4,
    world_to_camera: Mat4,
    aspect_rescales: u32,
}

impl Camera {
    /// Creates a camera looking down -Z from the world origin.
    pub fn new(intrinsics: Intrinsics, width: u32, height: u32) -> Result<Self, CameraError> {
        if width == 0 || height == 0 {
            return Err(CameraError::InvalidResolution { width, height });
        }
        intrinsics.validate()?;

        let aspect_ratio = width as f32 / height as f32;
        let (bounds, projection) = match intrinsics {
            Intrinsics::Sensor(s) => (s.screen_bounds(), Mat4::identity()),
            Intrinsics::Fov(f) => (
                f.screen_bounds(aspect_ratio),
                Mat4::perspective(f.fov_y, aspect_ratio, f.near, f.far),
            ),
        };

        log::debug!(
            "camera {}x{}: {:?}, screen window t={} r={}",
            width,
            height,
            intrinsics,
            bounds.top,
            bounds.right
        );

        Ok(Self {
            intrinsics,
            width,
            height,
            bounds,
            projection,
            world_to_camera: Mat4::identity(),
            aspect_rescales: 0,
        })
    }

    /// Replaces the world-to-camera transform.
    pub fn with_world_to_camera(mut self, world_to_camera: Mat4) -> Self {
        self.world_to_camera = world_to_camera;
        self
    }

    pub fn set_world_to_camera(&mut self, world_to_camera: Mat4) {
        self.world_to_camera = world_to_camera;
    }

    /// Places the camera with a camera-to-world pose.
    ///
    /// The pose is inverted into the world-to-camera transform. A singular pose
    /// is rejected and leaves the camera unchanged.
    pub fn set_camera_to_world(&mut self, camera_to_world: Mat4) -> Result<(), CameraError> {
        self.world_to_camera = camera_to_world
            .inverse()
            .ok_or(CameraError::SingularTransform)?;
        Ok(())
    }

    /// Shrinks the screen window so the film aspect matches the image aspect.
    ///
    /// The axis with the larger relative extent is scaled down. This mutates
    /// the window in place and is **not** idempotent: every call reapplies the
    /// same ratio. Call it once, before projecting anything.
    pub fn rescale_aspect_ratio(&mut self) {
        if self.aspect_rescales > 0 {
            log::warn!(
                "aspect ratio rescale applied {} times; the window shrinks cumulatively",
                self.aspect_rescales + 1
            );
        }
        self.aspect_rescales += 1;

        let device = self.device_aspect_ratio();
        let film = self.film_aspect_ratio();
        let (x_scale, y_scale) = if film > device {
            (device / film, 1.0)
        } else {
            (1.0, film / device)
        };

        self.bounds.right *= x_scale;
        self.bounds.left = -self.bounds.right;
        self.bounds.top *= y_scale;
        self.bounds.bottom = -self.bounds.top;
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    pub fn world_to_camera_matrix(&self) -> Mat4 {
        self.world_to_camera
    }

    pub fn device_aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Aspect of the imaging surface. The FOV model has no film of its own and
    /// always matches the device.
    pub fn film_aspect_ratio(&self) -> f32 {
        match self.intrinsics {
            Intrinsics::Sensor(s) => s.film_aspect_ratio(),
            Intrinsics::Fov(_) => self.device_aspect_ratio(),
        }
    }

    pub fn world_to_camera(&self, p_world: Vec3) -> Vec3 {
        self.world_to_camera.transform_point(p_world)
    }

    /// Perspective-divides a world point onto the near plane.
    pub fn world_to_screen(&self, p_world: Vec3) -> Vec2 {
        let p_camera = self.world_to_camera(p_world);
        let near = self.intrinsics.near();
        Vec2::new(
            near * p_camera.x / -p_camera.z,
            near * p_camera.y / -p_camera.z,
        )
    }

    /// Projects a world point into normalized device coordinates.
    ///
    /// x and y land in [-1, 1] inside the view; z is remapped so the near plane
    /// is 0 and the far plane is 1.
    pub fn world_to_ndc(&self, p_world: Vec3) -> Vec3 {
        match self.intrinsics {
            Intrinsics::Sensor(s) => {
                let p_camera = self.world_to_camera(p_world);
                let distance = -p_camera.z;
                let ndc = self.bounds.to_ndc(Vec2::new(
                    s.near * p_camera.x / distance,
                    s.near * p_camera.y / distance,
                ));
                let depth = s.far / (s.far - s.near) * (1.0 - s.near / distance);
                Vec3::new(ndc.x, ndc.y, depth)
            }
            Intrinsics::Fov(_) => self
                .projection
                .transform_point(self.world_to_camera(p_world)),
        }
    }

    /// Projects a world point to raster space.
    ///
    /// `x`/`y` are pixel coordinates (origin top-left). `z` is the reciprocal
    /// of the camera-space distance in front of the camera, `1 / -z_camera`,
    /// which is what the rasterizer interpolates.
    pub fn project(&self, p_world: Vec3) -> Vec3 {
        let ndc = self.world_to_ndc(p_world);
        let distance = -self.world_to_camera(p_world).z;
        Vec3::new(
            (ndc.x + 1.0) / 2.0 * self.width as f32,
            (1.0 - ndc.y) / 2.0 * self.height as f32,
            1.0 / distance,
        )
    }

    /// Whether a screen-space point (see [`Camera::world_to_screen`]) lies in
    /// the current screen window.
    pub fn is_in_view(&self, p_screen: Vec2) -> bool {
        self.bounds.contains(p_screen)
    }
}
