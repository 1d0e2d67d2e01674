use bbox::BBox;
use bbox::HasBounds;
use bbox::Union;
use geometry::normal::Normal;
use geometry::point::Point;
use geometry::vector::Dot;
use geometry::vector::Vector;

/// A stable handle to one triangle in a `Scene`'s triangle array.
///
/// Voxels store `TriangleId`s rather than the triangles themselves (see
/// §9 "Dynamic-growth triangle list" of the spec this crate implements):
/// the grid borrows from the scene instead of owning triangle data, and
/// comparing two triangles for identity (skip-self on secondary rays,
/// §4.6) is just an index comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(pub usize);

/// A single triangle, already carrying its supporting-plane equation.
///
/// Building `normal`/`d` from `vertices` so that `n·v + d = 0` holds for
/// all three vertices is the external preprocessor's job (§4.2); this
/// type only stores the result and does not re-derive it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point; 3],
    pub normal: Normal,
    pub d: f32,
}

impl Triangle {
    pub fn new(vertices: [Point; 3], normal: Normal, d: f32) -> Triangle {
        Triangle { vertices, normal, d }
    }

    pub fn vertex(&self, i: usize) -> Point {
        self.vertices[i]
    }

    pub fn plane(&self) -> (Normal, f32) {
        (self.normal, self.d)
    }

    /// `σ(p) = n·p + d` from §4.4 — the signed distance (up to the scale
    /// of `n`, which is unit length) of `p` from the triangle's plane.
    pub fn signed_distance(&self, p: &Point) -> f32 {
        self.normal.dot(&Vector::from(*p)) + self.d
    }

    /// Checks the §4.2 plane-equation tolerance (`1e-5` relative to
    /// `scale`, typically the scene's extent) for all three vertices.
    /// Exercised by tests; the core itself trusts the preprocessor.
    pub fn plane_is_consistent(&self, scale: f32) -> bool {
        let tol = 1e-5 * scale.max(1.0);
        self.vertices.iter().all(|v| self.signed_distance(v).abs() <= tol)
    }
}

impl HasBounds for Triangle {
    fn world_bound(&self) -> BBox {
        BBox::new_with(self.vertices[0], self.vertices[0])
            .unioned_with(&self.vertices[1])
            .unioned_with(&self.vertices[2])
    }
}
