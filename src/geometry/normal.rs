use geometry::vector::Dot;
use geometry::vector::Normalize;
use geometry::vector::Vector;

/// A surface normal. Kept distinct from `Vector` so that the type system
/// tracks which quantities are orientation-sensitive (face-forward-able)
/// and which are plain displacements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Normal {
    pub fn new() -> Normal {
        Normal { x: 0f32, y: 0f32, z: 0f32 }
    }

    pub fn new_with(x_: f32, y_: f32, z_: f32) -> Normal {
        Normal { x: x_, y: y_, z: z_ }
    }

    /// Flip `self` so that it points into the same hemisphere as `v`.
    pub fn face_forward(self, v: Vector) -> Normal {
        if self.dot(&v) < 0f32 {
            -self
        } else {
            self
        }
    }
}

impl<'a> ::std::convert::From<&'a Vector> for Normal {
    fn from(v: &'a Vector) -> Normal {
        Normal::new_with(v.x, v.y, v.z)
    }
}
impl ::std::convert::From<Vector> for Normal {
    fn from(v: Vector) -> Normal { Normal::from(&v) }
}

impl ::std::ops::Neg for Normal {
    type Output = Normal;
    fn neg(self) -> Normal {
        Normal::new_with(-self.x, -self.y, -self.z)
    }
}

impl ::std::ops::Index<usize> for Normal {
    type Output = f32;
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Error - Normal index out of bounds!"),
        }
    }
}

impl Dot for Normal {
    fn dot(&self, n: &Normal) -> f32 {
        self.x * n.x + self.y * n.y + self.z * n.z
    }
}

impl Dot<Vector> for Normal {
    fn dot(&self, v: &Vector) -> f32 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}

impl Dot<Normal> for Vector {
    fn dot(&self, n: &Normal) -> f32 {
        self.x * n.x + self.y * n.y + self.z * n.z
    }
}

impl Normalize for Normal {
    fn normalize(self) -> Normal {
        Normal::from(Vector::from(self).normalize())
    }
}
