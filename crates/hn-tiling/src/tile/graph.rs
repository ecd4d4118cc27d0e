//! `TileGraph`: storage, reference algebra, and read queries.

use std::sync::Arc;

use nalgebra::Vector3;

use super::types::{Tile, TileRef, TileVertex, TileVertexRef};
use crate::dual::GraphCfg;
use crate::geometry::{centroid, Shape};
use crate::stabilizer::Stabilizer;
use crate::symmetry::{Color, Sector, Symmetry};

/// Planar dual of a `BaseGraph`: tiles and their corners.
///
/// Derived wholesale from a base-graph snapshot; edits to the base graph
/// require a rebuild.
#[derive(Clone, Debug)]
pub struct TileGraph {
    pub(crate) sym: Arc<Symmetry>,
    pub(crate) shape: Shape,
    pub(crate) cfg: GraphCfg,
    pub(crate) vertices: Vec<TileVertex>,
    pub(crate) tiles: Vec<Tile>,
}

impl TileGraph {
    /// Empty graph for direct construction via [`TileGraph::add_vertex`].
    pub fn empty(sym: Arc<Symmetry>, shape: Shape, cfg: GraphCfg) -> Self {
        Self {
            sym,
            shape,
            cfg,
            vertices: Vec::new(),
            tiles: Vec::new(),
        }
    }

    #[inline]
    pub fn symmetry(&self) -> &Arc<Symmetry> {
        &self.sym
    }
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }
    #[inline]
    pub fn vertices(&self) -> &[TileVertex] {
        &self.vertices
    }
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }
    #[inline]
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    // ---- references -------------------------------------------------------

    pub fn vref(&self, index: usize, sector: Sector) -> Option<TileVertexRef> {
        let v = self.vertices.get(index)?;
        if sector.index() >= self.sym.num_sectors() {
            return None;
        }
        Some(TileVertexRef {
            index,
            sector: v.stabilizer.canonical(sector),
        })
    }

    pub fn tref(&self, index: usize, sector: Sector) -> Option<TileRef> {
        let t = self.tiles.get(index)?;
        if sector.index() >= self.sym.num_sectors() {
            return None;
        }
        Some(TileRef {
            index,
            sector: t.stabilizer.canonical(sector),
        })
    }

    #[inline]
    pub fn premul(&self, r: TileVertexRef, s: Sector) -> Option<TileVertexRef> {
        self.vref(r.index, self.sym.combine(s, r.sector)?)
    }

    #[inline]
    pub fn premul_tile(&self, t: TileRef, s: Sector) -> Option<TileRef> {
        self.tref(t.index, self.sym.combine(s, t.sector)?)
    }

    pub fn pos(&self, r: TileVertexRef) -> Vector3<f64> {
        self.sym.apply(r.sector, &self.vertices[r.index].pos)
    }

    /// Dense id `index + num_vertices * sector`.
    #[inline]
    pub fn id(&self, r: TileVertexRef) -> usize {
        r.index + self.vertices.len() * r.sector.index()
    }

    pub fn name(&self, r: TileVertexRef) -> String {
        format!("{}-{}", r.index, r.sector)
    }

    /// Corner-adjacent vertices of `r`, in `r`'s sector.
    pub fn neighbors(&self, r: TileVertexRef) -> Vec<TileVertexRef> {
        self.vertices[r.index]
            .neighbors
            .iter()
            .filter_map(|&nb| self.premul(nb, r.sector))
            .collect()
    }

    /// Tiles meeting at `r`, in `r`'s sector.
    pub fn tiles_at(&self, r: TileVertexRef) -> Vec<TileRef> {
        self.vertices[r.index]
            .tiles
            .iter()
            .filter_map(|&t| self.premul_tile(t, r.sector))
            .collect()
    }

    pub fn tile_color(&self, t: TileRef) -> Color {
        self.sym.map_color(t.sector, self.tiles[t.index].color)
    }

    /// Corners of `t` in counterclockwise order.
    pub fn corners(&self, t: TileRef) -> Vec<TileVertexRef> {
        self.tiles[t.index]
            .corners
            .iter()
            .filter_map(|&c| self.premul(c, t.sector))
            .collect()
    }

    /// Mean corner position of `t`.
    pub fn avg_pos(&self, t: TileRef) -> Vector3<f64> {
        let pts: Vec<_> = self.corners(t).into_iter().map(|c| self.pos(c)).collect();
        centroid(&pts)
    }

    /// Corner of `t` after `a` (counterclockwise).
    pub fn next(&self, t: TileRef, a: TileVertexRef) -> Option<TileVertexRef> {
        self.step_corner(t, a, 1)
    }

    /// Corner of `t` before `a`.
    pub fn prev(&self, t: TileRef, a: TileVertexRef) -> Option<TileVertexRef> {
        let n = self.tiles[t.index].corners.len();
        self.step_corner(t, a, n.checked_sub(1)?)
    }

    fn step_corner(&self, t: TileRef, a: TileVertexRef, by: usize) -> Option<TileVertexRef> {
        let local = self.premul(a, self.sym.invert(t.sector)?)?;
        let corners = &self.tiles[t.index].corners;
        let i = corners.iter().position(|&c| c == local)?;
        self.premul(corners[(i + by) % corners.len()], t.sector)
    }

    pub fn raw_tiles(&self) -> Vec<TileRef> {
        (0..self.tiles.len()).map(TileRef::base).collect()
    }

    pub fn raw_vertices(&self) -> Vec<TileVertexRef> {
        (0..self.vertices.len()).map(TileVertexRef::base).collect()
    }

    /// One ref per distinct visible tile image.
    pub fn all_tiles(&self) -> Vec<TileRef> {
        let mut out = Vec::new();
        for (index, t) in self.tiles.iter().enumerate() {
            for &sector in t.stabilizer.unique() {
                if self.sym.is_visible(sector) {
                    out.push(TileRef { index, sector });
                }
            }
        }
        out
    }

    /// One ref per distinct visible corner image.
    pub fn all_vertices(&self) -> Vec<TileVertexRef> {
        let mut out = Vec::new();
        for (index, v) in self.vertices.iter().enumerate() {
            for &sector in v.stabilizer.unique() {
                if self.sym.is_visible(sector) {
                    out.push(TileVertexRef { index, sector });
                }
            }
        }
        out
    }

    /// Closest visible corner strictly within `max_dist` of `pos`.
    pub fn vertex_at(&self, pos: &Vector3<f64>, max_dist: f64) -> Option<TileVertexRef> {
        let mut best = max_dist * max_dist;
        let mut hit = None;
        for r in self.all_vertices() {
            let d2 = (self.pos(r) - pos).norm_squared();
            if d2 < best {
                best = d2;
                hit = Some(r);
            }
        }
        hit
    }

    // ---- edits ------------------------------------------------------------

    /// Append a free-standing corner (no tiles) at `pos`, projected onto the surface.
    pub fn add_vertex(&mut self, pos: Vector3<f64>) -> TileVertexRef {
        let pos = self.shape.to_surface(&pos);
        let stab = Arc::new(Stabilizer::new(&self.sym, &pos, self.cfg.orbit_eps2));
        self.vertices.push(TileVertex::new(pos, stab));
        TileVertexRef::base(self.vertices.len() - 1)
    }

    /// Move `r` to `pos`; the stored position is pulled back through `r`'s sector.
    pub fn set_vertex_pos(&mut self, r: TileVertexRef, pos: Vector3<f64>) {
        let base = self.sym.unapply(r.sector, &pos);
        self.vertices[r.index].pos = self.shape.to_surface(&base);
    }

    /// Set both boundary flags of a stored corner.
    pub fn set_perimeter(&mut self, index: usize, outer: bool, inner: bool) {
        if let Some(v) = self.vertices.get_mut(index) {
            v.on_perimeter = outer;
            v.on_inner_perimeter = inner;
        }
    }

    pub fn normalize_vertices(&mut self) {
        let shape = self.shape;
        for v in &mut self.vertices {
            v.pos = shape.to_surface(&v.pos);
        }
    }

    pub fn set_radius(&mut self, r: f64) {
        self.shape.set_radius(r);
        self.normalize_vertices();
    }
}
