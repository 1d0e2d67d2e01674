//! Manual-inspection demo binary (§6 "demos/ binary"): builds a small
//! synthetic scene, traces a handful of rays through it, and logs what each
//! one hit. Not part of the library's public contract; wiring a logger is
//! left to this binary, per §4.8.
#[macro_use]
extern crate log;
extern crate env_logger;
extern crate voxelgrid_rust;

use voxelgrid_rust::geometry::normal::Normal;
use voxelgrid_rust::geometry::point::Point;
use voxelgrid_rust::geometry::vector::{Dot, Vector};
use voxelgrid_rust::grid::{Grid, IntersectPredicate, TraceResult};
use voxelgrid_rust::ray::Ray;
use voxelgrid_rust::scene::Scene;
use voxelgrid_rust::triangle::{Triangle, TriangleId};

/// Reference Moller-Trumbore predicate (§4.10): test-only in the library,
/// but the demo needs *some* real intersection kernel to show the core
/// actually finding hits, so it keeps its own copy.
struct MollerTrumbore<'a>(&'a Scene);

impl<'a> IntersectPredicate for MollerTrumbore<'a> {
    fn intersect(&self, id: TriangleId, origin: &Point, dir: &Vector) -> Option<f32> {
        let triangle = self.0.triangle(id);
        let e1 = triangle.vertex(1) - triangle.vertex(0);
        let e2 = triangle.vertex(2) - triangle.vertex(0);
        let pvec = dir.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < 1e-9 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = *origin - triangle.vertex(0);
        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }
        let qvec = tvec.cross(&e1);
        let v = dir.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let d = e2.dot(&qvec) * inv_det;
        if d > 0.0 {
            Some(d)
        } else {
            None
        }
    }
}

/// A staircase of three parallel quads (two triangles each) at increasing
/// depth, wide enough that a handful of rays land on different steps.
fn staircase_scene() -> Scene {
    let mut triangles = Vec::new();
    for step in 0..3 {
        let z = step as f32;
        let quad = [
            Point::new_with(0.0, 0.0, z),
            Point::new_with(3.0, 0.0, z),
            Point::new_with(3.0, 3.0, z),
            Point::new_with(0.0, 3.0, z),
        ];
        let n = Normal::new_with(0.0, 0.0, 1.0);
        triangles.push(Triangle::new([quad[0], quad[1], quad[2]], n, -z));
        triangles.push(Triangle::new([quad[0], quad[2], quad[3]], n, -z));
    }
    Scene::from_triangles(triangles)
}

fn main() {
    env_logger::init();

    let mut scene = staircase_scene();
    let grid = Grid::build(&mut scene).expect("grid should build over a small scene");
    let predicate = MollerTrumbore(&scene);

    info!(
        "built grid with resolution {:?} over {} triangles",
        grid.resolution(),
        scene.triangles().len()
    );

    let rays = [
        Ray::new_with(Point::new_with(1.5, 1.5, -1.0), Vector::new_with(0.0, 0.0, 1.0), 0.0),
        Ray::new_with(Point::new_with(0.5, 0.5, -1.0), Vector::new_with(0.1, 0.0, 1.0), 0.0),
        Ray::new_with(Point::new_with(10.0, 10.0, -1.0), Vector::new_with(0.0, 0.0, 1.0), 0.0),
    ];

    for (i, ray) in rays.iter().enumerate() {
        match grid.trace(ray, None, &predicate) {
            TraceResult::Hit { triangle, ipoint, distance } => {
                println!(
                    "ray {}: hit {:?} at {:?} (d={:.3})",
                    i, triangle, ipoint, distance
                );
            }
            TraceResult::NoHit => println!("ray {}: no hit", i),
        }
    }
}
