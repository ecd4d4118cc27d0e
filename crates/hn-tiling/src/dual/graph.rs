//! `BaseGraph`: vertex storage, reference algebra, and edits.

use std::sync::Arc;

use nalgebra::Vector3;

use super::types::{BaseVertex, GraphCfg, GraphError, VertexRef, MAX_VERTICES};
use crate::geometry::Shape;
use crate::stabilizer::Stabilizer;
use crate::symmetry::{Color, Sector, Symmetry};

/// Colored seed graph in one fundamental domain, expanded by a shared symmetry.
#[derive(Clone, Debug)]
pub struct BaseGraph {
    sym: Arc<Symmetry>,
    shape: Shape,
    cfg: GraphCfg,
    vertices: Vec<BaseVertex>,
}

impl BaseGraph {
    pub fn new(sym: Arc<Symmetry>, shape: Shape) -> Self {
        Self::with_cfg(sym, shape, GraphCfg::default())
    }

    pub fn with_cfg(sym: Arc<Symmetry>, shape: Shape, cfg: GraphCfg) -> Self {
        Self {
            sym,
            shape,
            cfg,
            vertices: Vec::new(),
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
    pub fn cfg(&self) -> &GraphCfg {
        &self.cfg
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
    #[inline]
    pub fn vertex(&self, index: usize) -> Option<&BaseVertex> {
        self.vertices.get(index)
    }
    #[inline]
    pub fn vertices(&self) -> &[BaseVertex] {
        &self.vertices
    }

    // ---- references -------------------------------------------------------

    /// Canonical reference to `index` in `sector`, or `None` if either is out of range.
    pub fn vref(&self, index: usize, sector: Sector) -> Option<VertexRef> {
        let v = self.vertices.get(index)?;
        if sector.index() >= self.sym.num_sectors() {
            return None;
        }
        Some(VertexRef {
            index,
            sector: v.stabilizer.canonical(sector),
        })
    }

    /// `r` mapped by sector `s` (applied after `r`'s own sector).
    #[inline]
    pub fn premul(&self, r: VertexRef, s: Sector) -> Option<VertexRef> {
        self.vref(r.index, self.sym.combine(s, r.sector)?)
    }

    /// `r` expressed relative to sector `s` (inverse of `premul`).
    #[inline]
    pub fn unpremul(&self, r: VertexRef, s: Sector) -> Option<VertexRef> {
        self.premul(r, self.sym.invert(s)?)
    }

    pub fn pos(&self, r: VertexRef) -> Vector3<f64> {
        self.sym.apply(r.sector, &self.vertices[r.index].pos)
    }

    pub fn color(&self, r: VertexRef) -> Color {
        self.sym.map_color(r.sector, self.vertices[r.index].color)
    }

    /// Dense id `index + len * sector`.
    #[inline]
    pub fn id(&self, r: VertexRef) -> usize {
        r.index + self.vertices.len() * r.sector.index()
    }

    /// `"index"` in the fundamental domain, `"index-sector"` elsewhere.
    pub fn name(&self, r: VertexRef) -> String {
        if r.sector == Sector::IDENTITY {
            r.index.to_string()
        } else {
            format!("{}-{}", r.index, r.sector)
        }
    }

    pub fn vertex_with_id(&self, id: usize) -> Option<VertexRef> {
        let n = self.vertices.len();
        if n == 0 {
            return None;
        }
        self.vref(id % n, Sector((id / n) as u32))
    }

    /// Inverse of [`BaseGraph::name`].
    pub fn vertex_with_name(&self, name: &str) -> Result<VertexRef, GraphError> {
        let unknown = || GraphError::UnknownName(name.to_string());
        let (idx, sec) = match name.split_once('-') {
            Some((i, s)) => (i, s.parse::<u32>().map_err(|_| unknown())?),
            None => (name, 0),
        };
        let idx = idx.parse::<usize>().map_err(|_| unknown())?;
        self.vref(idx, Sector(sec)).ok_or_else(unknown)
    }

    /// Base neighbors of `r.index`, mapped into `r`'s sector (CCW order).
    ///
    /// Neighbors whose sector falls outside the table (past a window edge) are skipped.
    pub fn neighbors(&self, r: VertexRef) -> Vec<VertexRef> {
        self.vertices[r.index]
            .neighbors
            .iter()
            .filter_map(|&nb| self.premul(nb, r.sector))
            .collect()
    }

    /// Neighbor of `center` immediately counterclockwise of `from`.
    pub fn next_ccw(&self, center: VertexRef, from: VertexRef) -> Option<VertexRef> {
        let nbs = self.neighbors(center);
        let i = nbs.iter().position(|&x| x == from)?;
        Some(nbs[(i + 1) % nbs.len()])
    }

    /// Neighbor of `center` immediately clockwise of `from`.
    pub fn prev_ccw(&self, center: VertexRef, from: VertexRef) -> Option<VertexRef> {
        let nbs = self.neighbors(center);
        let i = nbs.iter().position(|&x| x == from)?;
        Some(nbs[(i + nbs.len() - 1) % nbs.len()])
    }

    /// Identity-sector refs, one per stored vertex.
    pub fn raw_vertices(&self) -> Vec<VertexRef> {
        (0..self.vertices.len()).map(VertexRef::base).collect()
    }

    /// One ref per distinct visible image of every vertex.
    pub fn all_visible_vertices(&self) -> Vec<VertexRef> {
        let mut out = Vec::new();
        for (index, v) in self.vertices.iter().enumerate() {
            for &sector in v.stabilizer.unique() {
                if self.sym.is_visible(sector) {
                    out.push(VertexRef { index, sector });
                }
            }
        }
        out
    }

    /// Closest visible vertex strictly within `max_dist` of `pos`.
    pub fn vertex_at(&self, pos: &Vector3<f64>, max_dist: f64) -> Option<VertexRef> {
        let mut best = max_dist * max_dist;
        let mut hit = None;
        for r in self.all_visible_vertices() {
            let d2 = (self.pos(r) - pos).norm_squared();
            if d2 < best {
                best = d2;
                hit = Some(r);
            }
        }
        hit
    }

    // ---- edits ------------------------------------------------------------

    /// Append a vertex; its position is projected onto the surface first.
    pub fn add_vertex(&mut self, color: Color, pos: Vector3<f64>) -> Result<VertexRef, GraphError> {
        if self.vertices.len() >= MAX_VERTICES {
            return Err(GraphError::TooManyVertices { max: MAX_VERTICES });
        }
        let pos = self.shape.to_surface(&pos);
        let stabilizer = Arc::new(Stabilizer::new(&self.sym, &pos, self.cfg.orbit_eps2));
        self.vertices.push(BaseVertex {
            color,
            pos,
            neighbors: Vec::new(),
            stabilizer,
        });
        Ok(VertexRef::base(self.vertices.len() - 1))
    }

    /// Swap-remove: the last vertex takes `index` and every reference is rewritten.
    pub fn delete_vertex(&mut self, index: usize) -> Result<(), GraphError> {
        let len = self.vertices.len();
        if index >= len {
            return Err(GraphError::StaleIndex { index, len });
        }
        let last = len - 1;
        self.vertices.swap_remove(index);
        for v in &mut self.vertices {
            v.neighbors.retain(|nb| nb.index != index);
            for nb in &mut v.neighbors {
                if nb.index == last {
                    nb.index = index;
                }
            }
        }
        self.sort_neighbors();
        Ok(())
    }

    /// Store `color` so that `r` displays it.
    pub fn set_vertex_color(&mut self, r: VertexRef, color: Color) -> Result<(), GraphError> {
        self.check(r.index)?;
        self.vertices[r.index].color = self.sym.unmap_color(r.sector, color);
        Ok(())
    }

    /// Move `r` to `pos`; the base position is pulled back through `r`'s sector.
    pub fn set_vertex_pos(&mut self, r: VertexRef, pos: Vector3<f64>) -> Result<(), GraphError> {
        self.check(r.index)?;
        let base = self.sym.unapply(r.sector, &pos);
        self.vertices[r.index].pos = self.shape.to_surface(&base);
        self.sort_neighbors();
        Ok(())
    }

    /// Add the edge `a`-`b` if absent, remove it if present. Returns whether it now exists.
    ///
    /// Each endpoint stores the other relative to its own frame, once per element
    /// of its stabilizer, so toggling the same pair twice restores both lists.
    pub fn toggle_edge(&mut self, a: VertexRef, b: VertexRef) -> Result<bool, GraphError> {
        self.check(a.index)?;
        self.check(b.index)?;
        if a == b {
            return Err(GraphError::SelfEdge { index: a.index });
        }
        let b_rel = self.unpremul(b, a.sector).ok_or(GraphError::UnresolvedSector {
            index: b.index,
            sector: a.sector,
        })?;
        let a_rel = self.unpremul(a, b.sector).ok_or(GraphError::UnresolvedSector {
            index: a.index,
            sector: b.sector,
        })?;
        let had = self.vertices[a.index].neighbors.contains(&b_rel);
        let a_side = self.orbit(a.index, b_rel);
        let b_side = self.orbit(b.index, a_rel);
        if had {
            self.vertices[a.index].neighbors.retain(|nb| !a_side.contains(nb));
            self.vertices[b.index].neighbors.retain(|nb| !b_side.contains(nb));
        } else {
            for (at, side) in [(a.index, a_side), (b.index, b_side)] {
                for nb in side {
                    if !self.vertices[at].neighbors.contains(&nb) {
                        self.vertices[at].neighbors.push(nb);
                    }
                }
            }
        }
        self.sort_neighbors();
        tracing::trace!(a = %self.name(a), b = %self.name(b), added = !had, "toggled edge");
        Ok(!had)
    }

    /// Toggle the edge between two fundamental-domain vertices.
    pub fn toggle_edge_by_index(&mut self, a: usize, b: usize) -> Result<bool, GraphError> {
        self.toggle_edge(VertexRef::base(a), VertexRef::base(b))
    }

    /// `rel` replicated over the stabilizer of vertex `at`.
    fn orbit(&self, at: usize, rel: VertexRef) -> Vec<VertexRef> {
        let mut out: Vec<VertexRef> = Vec::new();
        for &g in self.vertices[at].stabilizer.fixing() {
            if let Some(r) = self.premul(rel, g) {
                if !out.contains(&r) {
                    out.push(r);
                }
            }
        }
        out
    }

    /// Replace a vertex's neighbor list wholesale (document loading).
    pub(crate) fn set_neighbors(&mut self, index: usize, neighbors: Vec<VertexRef>) {
        self.vertices[index].neighbors = neighbors;
    }

    /// Re-project every vertex onto the surface.
    pub fn normalize_vertices(&mut self) {
        let shape = self.shape;
        for v in &mut self.vertices {
            v.pos = shape.to_surface(&v.pos);
        }
        self.sort_neighbors();
    }

    /// Change the sphere radius and re-project (no effect on the plane).
    pub fn set_radius(&mut self, r: f64) {
        self.shape.set_radius(r);
        self.normalize_vertices();
    }

    /// Order every neighbor list counterclockwise around its vertex.
    pub fn sort_neighbors(&mut self) {
        for i in 0..self.vertices.len() {
            let center = self.vertices[i].pos;
            let mut keyed: Vec<(f64, VertexRef)> = self.vertices[i]
                .neighbors
                .iter()
                .map(|&nb| {
                    let p = self.sym.apply(nb.sector, &self.vertices[nb.index].pos);
                    (self.shape.tangent_angle(&center, &p), nb)
                })
                .collect();
            keyed.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
            self.vertices[i].neighbors = keyed.into_iter().map(|(_, nb)| nb).collect();
        }
    }

    fn check(&self, index: usize) -> Result<(), GraphError> {
        if index < self.vertices.len() {
            Ok(())
        } else {
            Err(GraphError::StaleIndex {
                index,
                len: self.vertices.len(),
            })
        }
    }
}
