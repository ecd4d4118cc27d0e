//! `Relaxation`: velocity-based fixed-point iteration over tile corners.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::constraints::derive_constraints;
use super::types::{Boundary, Constraint, RelaxCfg, Scheduled};
use crate::dual::{BaseGraph, GraphError, VertexRef};
use crate::geometry::{apply_dir, centroid};
use crate::tile::{TileGraph, TileVertexRef};

/// Owns a tile graph and relaxes its corner positions toward its constraints.
#[derive(Clone, Debug)]
pub struct Relaxation {
    tiles: TileGraph,
    cfg: RelaxCfg,
    boundary: Boundary,
    constraints: Vec<Scheduled>,
    fixed_vertex: Option<usize>,
    padding_error: f64,
}

impl Relaxation {
    /// Derive constraints from `tiles` and re-project its corners.
    pub fn new(tiles: TileGraph, cfg: RelaxCfg) -> Self {
        let constraints = derive_constraints(&tiles, cfg.search_depth);
        Self::with_constraints(tiles, cfg, constraints)
    }

    /// Use a caller-supplied constraint set instead of deriving one.
    pub fn with_constraints(mut tiles: TileGraph, cfg: RelaxCfg, constraints: Vec<Constraint>) -> Self {
        tiles.normalize_vertices();
        Self {
            tiles,
            cfg,
            boundary: Boundary::default(),
            constraints: constraints.into_iter().map(Scheduled::new).collect(),
            fixed_vertex: None,
            padding_error: 0.0,
        }
    }

    #[inline]
    pub fn tiles(&self) -> &TileGraph {
        &self.tiles
    }
    #[inline]
    pub fn tiles_mut(&mut self) -> &mut TileGraph {
        &mut self.tiles
    }
    #[inline]
    pub fn into_tiles(self) -> TileGraph {
        self.tiles
    }
    #[inline]
    pub fn cfg(&self) -> &RelaxCfg {
        &self.cfg
    }
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints.iter().map(|s| &s.constraint)
    }
    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }
    /// Pin one stored corner in place (`None` releases it).
    pub fn set_fixed_vertex(&mut self, index: Option<usize>) {
        self.fixed_vertex = index;
    }
    /// Mean padding error of the last `step` batch.
    #[inline]
    pub fn padding_error(&self) -> f64 {
        self.padding_error
    }

    /// Run `n` ticks; returns the mean total error per tick.
    ///
    /// Constraints without a violation in the batch are afterwards checked only
    /// every `n / 2` ticks until they are violated again.
    pub fn step(&mut self, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        for s in &mut self.constraints {
            s.violations = 0;
        }
        let (mut total, mut padding) = (0.0, 0.0);
        for i in 0..n {
            let (t, p) = self.tick(i);
            total += t;
            padding += p;
        }
        let relaxed = (n / 2).max(1);
        let mut throttled = 0usize;
        for s in &mut self.constraints {
            if s.violations == 0 {
                s.check_frequency = relaxed;
                throttled += 1;
            }
        }
        self.padding_error = padding / n as f64;
        let mean = total / n as f64;
        tracing::info!(
            steps = n,
            error = mean,
            padding_error = self.padding_error,
            throttled,
            "relaxation batch"
        );
        mean
    }

    /// One tick; returns `(total error, padding error)`.
    fn tick(&mut self, index: usize) -> (f64, f64) {
        let cfg = self.cfg;
        let mut vel = vec![Vector3::<f64>::zeros(); self.tiles.num_vertices()];
        let (mut total, mut padding) = (0.0, 0.0);

        for s in &mut self.constraints {
            if index % s.check_frequency != 0 {
                continue;
            }
            let c = s.constraint;
            let a = self.tiles.pos(c.a);
            let b = self.tiles.pos(c.b);
            let dist = (b - a).norm();
            let pad = if c.keep_close && c.keep_far { 0.0 } else { cfg.padding };
            let mut violated = false;

            let close_limit = cfg.tile_diameter - pad;
            if c.keep_close && dist >= close_limit {
                let k = (dist - close_limit) * cfg.gain;
                vel[c.a.index] += local(&self.tiles, c.a, &(b - a)) * k;
                vel[c.b.index] += local(&self.tiles, c.b, &(a - b)) * k;
                total += (dist - cfg.tile_diameter).max(0.0);
                padding += dist - close_limit;
                violated = true;
            }
            let far_limit = cfg.target_distance + pad;
            if c.keep_far && dist <= far_limit {
                let k = (far_limit - dist) * cfg.gain;
                if let Some(dir) = (a - b).try_normalize(f64::EPSILON) {
                    vel[c.a.index] += local(&self.tiles, c.a, &dir) * k;
                    vel[c.b.index] += local(&self.tiles, c.b, &-dir) * k;
                }
                total += (cfg.target_distance - dist).max(0.0);
                padding += far_limit - dist;
                violated = true;
            }
            if violated {
                s.check_frequency = 1;
                s.violations += 1;
            }
        }

        total += self.shape_boundary(&mut vel);

        for (i, v) in vel.iter().enumerate() {
            if self.fixed_vertex == Some(i) || self.tiles.vertices[i].stabilizer.has_symmetry() {
                continue;
            }
            self.tiles.vertices[i].pos += v;
        }
        self.tiles.normalize_vertices();
        (total, padding)
    }

    /// Boundary shaping of perimeter corners; returns the added error.
    fn shape_boundary(&self, vel: &mut [Vector3<f64>]) -> f64 {
        let gain = self.cfg.gain;
        let mut total = 0.0;
        for (i, v) in self.tiles.vertices.iter().enumerate() {
            let p = v.pos;
            let d = p.norm();
            if v.on_perimeter {
                if let Some(r) = self.boundary.outer_radius {
                    if d < r && d > 0.0 {
                        vel[i] += p / d * (r - d) * gain;
                        total += r - d;
                    }
                }
                if let Some((w, h)) = self.boundary.strip {
                    let ex = w / 2.0 - p.x.abs();
                    let ey = h / 2.0 - p.y.abs();
                    if ex >= 0.0 && ey >= 0.0 {
                        let dir = if ex < ey {
                            Vector3::x() * sign(p.x)
                        } else {
                            Vector3::y() * sign(p.y)
                        };
                        let err = ex.max(ey);
                        vel[i] += dir * err * gain;
                        total += err;
                    }
                }
            }
            if v.on_inner_perimeter {
                if let Some(r) = self.boundary.inner_radius {
                    if d > r && r > 0.0 {
                        vel[i] -= p / d * (d - r) * gain;
                        total += d - r;
                    }
                }
            }
        }
        total
    }

    /// Scatter free corners by up to `amplitude` per axis (seeded, reproducible).
    pub fn jitter(&mut self, seed: u64, amplitude: f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let amp = amplitude.abs();
        for (i, v) in self.tiles.vertices.iter_mut().enumerate() {
            let dx = Vector3::new(
                rng.gen_range(-amp..=amp),
                rng.gen_range(-amp..=amp),
                rng.gen_range(-amp..=amp),
            );
            if self.fixed_vertex == Some(i) || v.stabilizer.has_symmetry() {
                continue;
            }
            v.pos += dx;
        }
        self.tiles.normalize_vertices();
    }

    /// Change the sphere radius of both graphs and re-project them.
    pub fn set_radius(&mut self, base: &mut BaseGraph, r: f64) {
        base.set_radius(r);
        self.tiles.set_radius(r);
    }

    /// Move every base vertex to the centroid of its tile's corners.
    ///
    /// Errors if `base` has fewer vertices than there are non-empty tiles.
    pub fn move_dual_to_centroids(&self, base: &mut BaseGraph) -> Result<(), GraphError> {
        for (ti, t) in self.tiles.tiles.iter().enumerate() {
            if t.corners.is_empty() {
                continue;
            }
            let pts: Vec<_> = t.corners.iter().map(|&c| self.tiles.pos(c)).collect();
            base.set_vertex_pos(VertexRef::base(ti), centroid(&pts))?;
        }
        Ok(())
    }
}

/// A world-frame direction at `r`, expressed in the stored corner's frame.
fn local(g: &TileGraph, r: TileVertexRef, d: &Vector3<f64>) -> Vector3<f64> {
    apply_dir(g.symmetry().inverse_matrix(r.sector), d)
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
