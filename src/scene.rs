//! Scene description: an ordered list of independent triangles.
//!
//! Each [`Primitive`] pairs a world-space [`Triangle`] with per-vertex colors
//! and texture coordinates. Draw order is list order.

use std::path::Path;

use thiserror::Error;

use crate::math::{Vec2, Vec3};
use crate::triangle::Triangle;

/// Red, green and blue corners. Rendering them shows the barycentric weights.
pub const BARYCENTRIC_COLORS: [Vec3; 3] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("OBJ file contains no triangles: {0}")]
    Empty(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    pub triangle: Triangle,
    pub colors: [Vec3; 3],
    pub st: [Vec2; 3],
}

impl Primitive {
    pub fn new(triangle: Triangle, colors: [Vec3; 3]) -> Self {
        Self {
            triangle,
            colors,
            st: [Vec2::ZERO; 3],
        }
    }

    pub fn with_st(mut self, st: [Vec2; 3]) -> Self {
        self.st = st;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in scene: two interpenetrating triangles in front of a third.
    ///
    /// Framed for the default sensor camera sitting at the origin.
    pub fn demo() -> Self {
        let mut scene = Scene::new();
        scene.push(Primitive::new(
            Triangle::new(
                Vec3::new(-1.0, -1.0, -5.0),
                Vec3::new(1.0, -1.0, -5.0),
                Vec3::new(0.0, 1.0, -5.0),
            ),
            BARYCENTRIC_COLORS,
        ));
        scene.push(Primitive::new(
            Triangle::new(
                Vec3::new(-1.2, 0.6, -3.5),
                Vec3::new(1.1, 0.4, -6.5),
                Vec3::new(-0.2, -1.1, -4.0),
            ),
            BARYCENTRIC_COLORS,
        ));
        scene.push(
            Primitive::new(
                Triangle::new(
                    Vec3::new(-2.5, -2.0, -8.0),
                    Vec3::new(2.5, -2.0, -8.0),
                    Vec3::new(2.5, 2.0, -8.0),
                ),
                [Vec3::new(0.2, 0.2, 0.2), Vec3::new(0.6, 0.6, 0.6), Vec3::ONE],
            )
            .with_st([Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)]),
        );
        scene
    }

    /// Loads every triangle of an OBJ file.
    ///
    /// Faces are triangulated. Texture coordinates are kept when present and
    /// every face gets [`BARYCENTRIC_COLORS`]; materials are ignored.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;

        let mut scene = Scene::new();
        for model in &models {
            let mesh = &model.mesh;
            let position = |i: u32| {
                let i = i as usize * 3;
                Vec3::new(
                    mesh.positions[i],
                    mesh.positions[i + 1],
                    mesh.positions[i + 2],
                )
            };
            let texcoord = |i: u32| {
                let i = i as usize * 2;
                match mesh.texcoords.get(i..i + 2) {
                    Some(st) => Vec2::new(st[0], st[1]),
                    None => Vec2::ZERO,
                }
            };

            for face in mesh.indices.chunks_exact(3) {
                let triangle = Triangle::new(position(face[0]), position(face[1]), position(face[2]));
                let st = [texcoord(face[0]), texcoord(face[1]), texcoord(face[2])];
                scene.push(Primitive::new(triangle, BARYCENTRIC_COLORS).with_st(st));
            }
            log::debug!(
                "loaded mesh '{}' with {} triangles",
                model.name,
                mesh.indices.len() / 3
            );
        }

        if scene.is_empty() {
            return Err(LoadError::Empty(path.display().to_string()));
        }
        log::info!("loaded {} triangles from {}", scene.len(), path.display());
        Ok(scene)
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl FromIterator<Primitive> for Scene {
    fn from_iter<I: IntoIterator<Item = Primitive>>(iter: I) -> Self {
        Self {
            primitives: iter.into_iter().collect(),
        }
    }
}
