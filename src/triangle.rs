use std::ops::{Index, IndexMut};

use crate::math::vec3::Vec3;

// A triangle defined by three world-space points. Triangles are independent:
// there is no shared vertex array and no adjacency.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }
}

impl Index<usize> for Triangle {
    type Output = Vec3;

    fn index(&self, i: usize) -> &Vec3 {
        &self.vertices[i]
    }
}

impl IndexMut<usize> for Triangle {
    fn index_mut(&mut self, i: usize) -> &mut Vec3 {
        &mut self.vertices[i]
    }
}
