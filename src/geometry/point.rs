use geometry::vector::Vector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub fn new() -> Point {
        Point { x: 0f32, y: 0f32, z: 0f32 }
    }

    pub fn new_with(x_: f32, y_: f32, z_: f32) -> Point {
        Point { x: x_, y: y_, z: z_ }
    }

    pub fn distance_squared(&self, p: &Point) -> f32 {
        (self - p).length_squared()
    }

    pub fn distance(&self, p: &Point) -> f32 {
        (self - p).length()
    }
}

impl ::std::convert::From<Point> for Vector {
    fn from(p: Point) -> Vector {
        Vector::new_with(p.x, p.y, p.z)
    }
}

impl<'a, 'b> ::std::ops::Sub<&'b Vector> for &'a Point {
    type Output = Point;
    fn sub(self, rhs: &'b Vector) -> Point {
        Point::new_with(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
impl ::std::ops::Sub<Vector> for Point {
    type Output = Point;
    fn sub(self, rhs: Vector) -> Point { &self - &rhs }
}

impl<'a, 'b> ::std::ops::Sub<&'b Point> for &'a Point {
    type Output = Vector;
    fn sub(self, rhs: &'b Point) -> Vector {
        Vector::new_with(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
impl ::std::ops::Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Point) -> Vector { &self - &rhs }
}

impl<'a, 'b> ::std::ops::Add<&'b Vector> for &'a Point {
    type Output = Point;
    fn add(self, rhs: &'b Vector) -> Point {
        Point::new_with(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}
impl ::std::ops::Add<Vector> for Point {
    type Output = Point;
    fn add(self, rhs: Vector) -> Point { &self + &rhs }
}

impl ::std::ops::Index<usize> for Point {
    type Output = f32;
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Error - Point index out of bounds!"),
        }
    }
}

impl ::std::ops::IndexMut<usize> for Point {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Error - Point index out of bounds!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_can_be_created() {
        assert_eq!(Point::new(), Point { x: 0f32, y: 0f32, z: 0f32 });
        assert_eq!(Point::new_with(1.0, 2.0, 3.0), Point { x: 1.0, y: 2.0, z: 3.0 });
    }

    #[test]
    fn it_can_be_converted_to_a_vector() {
        assert_eq!(Vector::new(), Vector::from(Point::new()));
        assert_eq!(
            Vector::new_with(1.0, 2.0, 3.0),
            Vector::from(Point::new_with(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn they_have_distance() {
        assert_eq!(Point::new().distance(&Point::new()), 0f32);
        assert_eq!(Point::new_with(1.0, 0.0, 0.0).distance(&Point::new()), 1.0);
        assert_eq!(
            Point::new_with(1.0, 1.0, 1.0).distance_squared(&Point::new()),
            3.0
        );
    }

    #[test]
    fn it_can_be_subtracted_and_added() {
        let u = Point::new_with(1.0, 2.0, 3.0);
        let v = Point::new_with(4.0, 3.0, 2.0);

        assert_eq!(&u - &v, Vector::new_with(-3.0, -1.0, 1.0));
        assert_eq!(u - Vector::new_with(1.0, 1.0, 1.0), Point::new_with(0.0, 1.0, 2.0));
        assert_eq!(v + Vector::new_with(1.0, 1.0, 1.0), Point::new_with(5.0, 4.0, 3.0));
    }

    #[test]
    fn it_can_be_indexed() {
        let p = Point::new_with(1.0, 2.0, 3.0);
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], 2.0);
        assert_eq!(p[2], 3.0);
    }

    #[test]
    #[should_panic]
    fn it_cant_be_indexed_too_much() {
        let p = Point::new_with(1.0, 2.0, 3.0);
        println!("This should never appear: {:?}", p[3]);
    }
}
