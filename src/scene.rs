use bbox::BBox;
use bbox::HasBounds;
use bbox::Union;
use geometry::point::Point;
use triangle::Triangle;
use triangle::TriangleId;

/// A read-only view over a static triangle soup plus its axis-aligned
/// domain bounds (§4.2 / §3 "Scene bounds" of the spec this crate
/// implements).
///
/// `bounds` is logically mutable: `Grid::build` inflates it in place by
/// `BOUNDS_EPSILON` (§4.3) and callers are expected to treat the inflated
/// value as authoritative afterwards. Outside of that one call, a `Scene`
/// never changes — triangles are supplied once, by the external
/// preprocessor, and live for as long as any `Grid` borrowing from them.
pub struct Scene {
    triangles: Vec<Triangle>,
    bounds: BBox,
}

impl Scene {
    /// `bounds` must satisfy `dmin[a] < dmax[a]` on every axis; an inverted
    /// box is a precondition violation (§7) the core does not check.
    pub fn new(triangles: Vec<Triangle>, dmin: Point, dmax: Point) -> Scene {
        Scene {
            triangles,
            bounds: BBox::new_with(dmin, dmax),
        }
    }

    /// Computes bounds as the union of every triangle's vertex AABB.
    /// Convenience for callers that have triangles but no bounds yet;
    /// the empty-scene case (`triangles` is empty, §8 S6) falls back to
    /// a degenerate box at the origin so `Grid::build` still has
    /// something to inflate.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Scene {
        let bounds = triangles.iter().fold(
            BBox::new_with(Point::new(), Point::new()),
            |b, t| b.unioned_with(&t.world_bound()),
        );
        Scene { triangles, bounds }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.0]
    }

    pub fn plane(&self, id: TriangleId) -> (::geometry::normal::Normal, f32) {
        self.triangle(id).plane()
    }

    pub fn bounds(&self) -> BBox {
        self.bounds
    }

    /// Grid-build-time mutation (§4.3 step 1 / §6 "bounds *mutable*").
    /// Not exposed for any other purpose.
    pub(crate) fn inflate_bounds(&mut self, eps: f32) {
        let eps_v = ::geometry::vector::Vector::new_with(eps, eps, eps);
        self.bounds.p_min = self.bounds.p_min - eps_v;
        self.bounds.p_max = self.bounds.p_max + eps_v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::normal::Normal;

    fn triangle() -> Triangle {
        Triangle::new(
            [
                Point::new_with(0.0, 0.0, 0.0),
                Point::new_with(1.0, 0.0, 0.0),
                Point::new_with(0.0, 1.0, 0.0),
            ],
            Normal::new_with(0.0, 0.0, 1.0),
            0.0,
        )
    }

    #[test]
    fn it_derives_bounds_from_triangles() {
        let scene = Scene::from_triangles(vec![triangle()]);
        assert_eq!(scene.bounds().p_min, Point::new_with(0.0, 0.0, 0.0));
        assert_eq!(scene.bounds().p_max, Point::new_with(1.0, 1.0, 0.0));
    }

    #[test]
    fn it_handles_an_empty_scene() {
        let scene = Scene::from_triangles(vec![]);
        assert_eq!(scene.triangles().len(), 0);
        assert_eq!(scene.bounds().p_min, scene.bounds().p_max);
    }

    #[test]
    fn it_inflates_bounds_in_place() {
        let mut scene = Scene::from_triangles(vec![triangle()]);
        scene.inflate_bounds(1e-3);
        assert!((scene.bounds().p_min.x - (-1e-3)).abs() < 1e-9);
        assert!((scene.bounds().p_max.x - (1.0 + 1e-3)).abs() < 1e-9);
    }

    #[test]
    fn it_looks_up_triangles_by_id() {
        let scene = Scene::from_triangles(vec![triangle()]);
        let t = scene.triangle(TriangleId(0));
        assert_eq!(t.vertex(0), Point::new_with(0.0, 0.0, 0.0));
    }
}
