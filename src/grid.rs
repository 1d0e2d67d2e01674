use bbox::BBox;
use error::Result;
use geometry::point::Point;
use geometry::vector::Vector;
use ray::Ray;
use scene::Scene;
use triangle::TriangleId;

/// Bounds safety margin applied once, at build time, to the scene's
/// triangle-derived extent (§4.3 step 1). Keeps triangle vertices that sit
/// exactly on the scene's raw AABB strictly interior to the grid's domain,
/// which in turn keeps every voxel index computed from a vertex in range
/// without a defensive clamp at voxelization time.
pub const BOUNDS_EPSILON: f32 = 1e-3;

/// Chunk size for a voxel's triangle-id list growth (§4.9 / §9 "Dynamic
/// growth triangle list"). Growth is additive, not doubling: a voxel that
/// ends up holding many triangles pays for it in repeated small
/// reservations rather than in wasted tail capacity, which matters because
/// there are usually far more voxels than triangles per voxel.
pub const VOXEL_LIST_GROWTH: usize = 10;

#[derive(Debug, Clone, Default)]
struct Voxel {
    triangles: Vec<TriangleId>,
}

impl Voxel {
    fn new() -> Voxel {
        Voxel { triangles: Vec::new() }
    }

    fn insert(&mut self, id: TriangleId) -> Result<()> {
        if self.triangles.len() == self.triangles.capacity() {
            self.triangles.try_reserve_exact(VOXEL_LIST_GROWTH)?;
        }
        self.triangles.push(id);
        Ok(())
    }
}

/// Outcome of locating the voxel a ray should start its traversal from
/// (§4.5). Not an error: a ray that never enters the grid's domain is a
/// routine occurrence, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    Entry([usize; 3]),
    Miss,
}

/// Outcome of a full grid traversal (§4.6). `NoHit` covers both "ray missed
/// the grid" and "ray left the grid without an accepted hit".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceResult {
    Hit {
        triangle: TriangleId,
        ipoint: Point,
        distance: f32,
    },
    NoHit,
}

/// The external per-triangle ray intersection test the traverser calls
/// into (§6 "Caller-supplied predicate"). The grid owns no notion of
/// triangle/ray intersection math of its own; it only decides which
/// triangles are worth asking and in what order.
///
/// Implementations must return `Some(d)` with `d > 0` exactly when the ray
/// actually hits `id`'s triangle at parametric distance `d`, and `None`
/// otherwise. A predicate that lies about this contract breaks the
/// traverser's front-to-back guarantee silently; the grid cannot detect
/// the violation.
pub trait IntersectPredicate: Sync {
    fn intersect(&self, id: TriangleId, origin: &Point, dir: &Vector) -> Option<f32>;
}

/// A uniform voxel grid accelerator over a `Scene`'s triangles (§4 of the
/// spec this crate implements).
///
/// Built once via `Grid::build`, then queried any number of times,
/// concurrently, without further mutation — see `query_many`. The grid
/// borrows from the scene it was built over rather than copying triangle
/// data; voxels hold `TriangleId`s, not `Triangle`s.
pub struct Grid<'s> {
    scene: &'s Scene,
    num_voxels: [usize; 3],
    width: Vector,
    inv_width: Vector,
    dmin: Point,
    dmax: Point,
    voxels: Vec<Voxel>,
}

impl<'s> Grid<'s> {
    /// Builds a grid over `scene`'s triangles (§4.3, §4.4).
    ///
    /// Mutates `scene`'s bounds in place by inflating them by
    /// `BOUNDS_EPSILON` before deriving grid resolution from them — see
    /// `Scene::inflate_bounds`. This is the one place outside of
    /// construction that a `Scene` changes.
    pub fn build(scene: &'s mut Scene) -> Result<Grid<'s>> {
        scene.inflate_bounds(BOUNDS_EPSILON);
        let bounds = scene.bounds();
        let n = scene.triangles().len();

        // ds[a] = dmax[a] - dmin[a] + eps, a further safety margin on top
        // of the bounds inflation already folded into `bounds` above.
        let ds = [
            bounds.p_max.x - bounds.p_min.x + BOUNDS_EPSILON,
            bounds.p_max.y - bounds.p_min.y + BOUNDS_EPSILON,
            bounds.p_max.z - bounds.p_min.z + BOUNDS_EPSILON,
        ];
        let volume = ds[0] * ds[1] * ds[2];
        let density = if volume > 0.0 {
            (n as f32 / volume).cbrt() + BOUNDS_EPSILON
        } else {
            BOUNDS_EPSILON
        };

        let mut num_voxels = [0usize; 3];
        let mut width = [0f32; 3];
        for a in 0..3 {
            num_voxels[a] = ((ds[a] * density).ceil() as usize).max(1);
            width[a] = ds[a] / num_voxels[a] as f32;
        }

        let total = num_voxels[0] * num_voxels[1] * num_voxels[2];
        let mut voxels = Vec::new();
        voxels.try_reserve_exact(total)?;
        voxels.resize_with(total, Voxel::new);

        debug!(
            "grid::build: {} triangles, resolution {:?}, {} voxels",
            n, num_voxels, total
        );

        let mut grid = Grid {
            scene,
            num_voxels,
            width: Vector::new_with(width[0], width[1], width[2]),
            inv_width: Vector::new_with(1.0 / width[0], 1.0 / width[1], 1.0 / width[2]),
            dmin: bounds.p_min,
            dmax: bounds.p_max,
            voxels,
        };
        grid.voxelize()?;
        Ok(grid)
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.num_voxels[1] + j) * self.num_voxels[2] + k
    }

    fn pos_to_voxel(&self, p: &Point, axis: usize) -> usize {
        let v = ((p[axis] - self.dmin[axis]) * self.inv_width[axis]) as i64;
        (v.max(0) as usize).clamp(0, self.num_voxels[axis] - 1)
    }

    fn point_to_voxel(&self, p: &Point) -> [usize; 3] {
        [
            self.pos_to_voxel(p, 0),
            self.pos_to_voxel(p, 1),
            self.pos_to_voxel(p, 2),
        ]
    }

    fn voxel_to_pos(&self, idx: usize, axis: usize) -> f32 {
        self.dmin[axis] + idx as f32 * self.width[axis]
    }

    /// Populates every voxel's triangle list (§4.4). For each triangle,
    /// enumerates the voxel-index box spanned by its vertices and, for any
    /// voxel wider than one cell in that box, runs the 8-corner plane-sign
    /// test before inserting — a voxel is skipped only when all eight
    /// corners lie strictly on the same side of the triangle's supporting
    /// plane, which conservatively over-includes rather than risks missing
    /// a true overlap.
    fn voxelize(&mut self) -> Result<()> {
        let n = self.scene.triangles().len();
        for i in 0..n {
            let id = TriangleId(i);
            let triangle = self.scene.triangle(id);

            let mut lo = [usize::max_value(); 3];
            let mut hi = [0usize; 3];
            for v in 0..3 {
                let vertex = triangle.vertex(v);
                for a in 0..3 {
                    let idx = self.pos_to_voxel(&vertex, a);
                    lo[a] = lo[a].min(idx);
                    hi[a] = hi[a].max(idx);
                }
            }

            let fast_path = lo == hi;
            for x in lo[0]..=hi[0] {
                for y in lo[1]..=hi[1] {
                    for z in lo[2]..=hi[2] {
                        if fast_path || self.voxel_overlaps_plane(x, y, z, triangle.normal, triangle.d) {
                            let offset = self.offset(x, y, z);
                            self.voxels[offset].insert(id)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn voxel_overlaps_plane(&self, i: usize, j: usize, k: usize, normal: ::geometry::normal::Normal, d: f32) -> bool {
        use geometry::vector::Dot;

        let lo = [self.voxel_to_pos(i, 0), self.voxel_to_pos(j, 1), self.voxel_to_pos(k, 2)];
        let hi = [
            self.voxel_to_pos(i + 1, 0),
            self.voxel_to_pos(j + 1, 1),
            self.voxel_to_pos(k + 1, 2),
        ];

        let mut saw_positive = false;
        let mut saw_negative = false;
        for corner in 0..8 {
            let p = Point::new_with(
                if corner & 1 == 0 { lo[0] } else { hi[0] },
                if corner & 2 == 0 { lo[1] } else { hi[1] },
                if corner & 4 == 0 { lo[2] } else { hi[2] },
            );
            let s = normal.dot(&Vector::from(p)) + d;
            if s > 0.0 {
                saw_positive = true;
            } else if s < 0.0 {
                saw_negative = true;
            } else {
                return true;
            }
            if saw_positive && saw_negative {
                return true;
            }
        }
        false
    }

    /// Finds the voxel a ray should begin traversal from (§4.5). If `ray`
    /// originates inside the grid's domain that is its own entry voxel;
    /// otherwise the two smallest positive slab-crossing parameters are
    /// tried in order, and the first that lands back inside the domain
    /// wins. `Miss` means the ray never reaches the grid at all.
    pub fn locate_entry(&self, ray: &Ray) -> LocateResult {
        let bounds = BBox::new_with(self.dmin, self.dmax);
        if bounds.inside(&ray.o) {
            return LocateResult::Entry(self.point_to_voxel(&ray.o));
        }

        let mut candidates: Vec<f32> = Vec::with_capacity(6);
        for a in 0..3 {
            if ray.d[a] != 0.0 {
                let t_lo = (self.dmin[a] - ray.o[a]) / ray.d[a];
                let t_hi = (self.dmax[a] - ray.o[a]) / ray.d[a];
                if t_lo > 0.0 {
                    candidates.push(t_lo);
                }
                if t_hi > 0.0 {
                    candidates.push(t_hi);
                }
            }
        }
        candidates.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for &t in candidates.iter().take(2) {
            let p = ray.point_at(t);
            if bounds.inside(&p) {
                return LocateResult::Entry(self.point_to_voxel(&p));
            }
        }
        LocateResult::Miss
    }

    /// Walks the grid front-to-back along `ray` starting from `entry`,
    /// stopping at the first voxel with an accepted hit (§4.6). `current`
    /// is skipped wherever it is asked about, so secondary rays cast from
    /// a triangle do not immediately re-hit their own surface.
    pub fn traverse<P: IntersectPredicate>(
        &self,
        ray: &Ray,
        entry: [usize; 3],
        current: Option<TriangleId>,
        predicate: &P,
    ) -> TraceResult {
        let mut pos = [entry[0] as i64, entry[1] as i64, entry[2] as i64];
        let mut step = [0i64; 3];
        let mut out = [0i64; 3];
        let mut t = [0f32; 3];
        let mut dt = [0f32; 3];

        for a in 0..3 {
            if ray.d[a] > 0.0 {
                step[a] = 1;
                out[a] = self.num_voxels[a] as i64;
                let next_plane = self.voxel_to_pos(entry[a] + 1, a);
                t[a] = (next_plane - ray.o[a]) / ray.d[a];
                dt[a] = self.width[a] / ray.d[a];
            } else if ray.d[a] < 0.0 {
                step[a] = -1;
                out[a] = -1;
                let next_plane = self.voxel_to_pos(entry[a], a);
                t[a] = (next_plane - ray.o[a]) / ray.d[a];
                dt[a] = -self.width[a] / ray.d[a];
            } else {
                step[a] = 0;
                t[a] = f32::INFINITY;
                dt[a] = f32::INFINITY;
            }
        }

        loop {
            // The parametric exit distance of the *current* voxel: the
            // nearest of the three upcoming axis-plane crossings. A hit is
            // only accepted within this bound, otherwise it actually lies
            // in a voxel not yet visited and accepting it here would
            // violate front-to-back ordering.
            let exit_dist = t[0].min(t[1]).min(t[2]);

            let voxel = &self.voxels[self.offset(pos[0] as usize, pos[1] as usize, pos[2] as usize)];
            let mut best: Option<(f32, TriangleId)> = None;
            for &id in &voxel.triangles {
                if Some(id) == current {
                    continue;
                }
                if let Some(d) = predicate.intersect(id, &ray.o, &ray.d) {
                    if d > 0.0 && d <= exit_dist && d <= ray.maxt && d >= ray.mint {
                        if best.map_or(true, |(bd, _)| d < bd) {
                            best = Some((d, id));
                        }
                    }
                }
            }
            if let Some((d, id)) = best {
                trace!("grid::traverse: hit {:?} at distance {}", id, d);
                return TraceResult::Hit {
                    triangle: id,
                    ipoint: ray.point_at(d),
                    distance: d,
                };
            }

            let step_axis = if t[0] <= t[1] && t[0] <= t[2] {
                0
            } else if t[1] <= t[2] {
                1
            } else {
                2
            };

            if t[step_axis] > ray.maxt {
                return TraceResult::NoHit;
            }

            pos[step_axis] += step[step_axis];
            if pos[step_axis] == out[step_axis] {
                return TraceResult::NoHit;
            }
            t[step_axis] += dt[step_axis];
        }
    }

    /// Locates and traverses in one call — the common case for callers
    /// that do not need to inspect `LocateResult` themselves.
    pub fn trace<P: IntersectPredicate>(
        &self,
        ray: &Ray,
        current: Option<TriangleId>,
        predicate: &P,
    ) -> TraceResult {
        match self.locate_entry(ray) {
            LocateResult::Entry(entry) => self.traverse(ray, entry, current, predicate),
            LocateResult::Miss => TraceResult::NoHit,
        }
    }

    pub fn resolution(&self) -> [usize; 3] {
        self.num_voxels
    }

    pub fn bounds(&self) -> BBox {
        BBox::new_with(self.dmin, self.dmax)
    }
}

/// Runs `trace` for every `(ray, current)` pair in `queries` concurrently,
/// spreading the work across `num_cpus::get()` threads (§5 "Concurrent
/// queries"). `Grid` takes no lock during a query: every reader only reads
/// `voxels`, so this is sound as long as no `Grid::build` is in flight,
/// which the `&Grid` borrow already guarantees.
pub fn query_many<P: IntersectPredicate + Sync>(
    grid: &Grid,
    queries: &[(Ray, Option<TriangleId>)],
    predicate: &P,
) -> Vec<TraceResult> {
    let mut results = vec![TraceResult::NoHit; queries.len()];
    if queries.is_empty() {
        return results;
    }

    let worker_count = ::num_cpus::get().max(1).min(queries.len());
    let chunk = (queries.len() + worker_count - 1) / worker_count;

    ::std::thread::scope(|scope| {
        for (query_chunk, result_chunk) in queries.chunks(chunk).zip(results.chunks_mut(chunk)) {
            scope.spawn(move || {
                for (slot, (ray, current)) in result_chunk.iter_mut().zip(query_chunk.iter()) {
                    *slot = grid.trace(ray, *current, predicate);
                }
            });
        }
    });

    results
}
