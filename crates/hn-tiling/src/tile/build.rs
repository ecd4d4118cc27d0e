//! Tile-graph construction by face tracing on the base graph.
//!
//! Each base vertex `a` becomes a tile. For every neighbor `b` of `a` (in
//! counterclockwise order) the face `polygon(a, b)` becomes one corner. Faces
//! are keyed by their set of base refs; a face is matched against every
//! sector image of the keys seen so far, so symmetric faces share one stored
//! corner and differ only by sector.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::graph::TileGraph;
use super::types::{Tile, TileRef, TileVertex, TileVertexRef};
use crate::dual::{BaseGraph, VertexRef};
use crate::geometry::centroid;
use crate::stabilizer::Stabilizer;
use crate::symmetry::BLANK;

type FaceKey = BTreeSet<VertexRef>;

impl TileGraph {
    /// Build the tile graph of `base`.
    ///
    /// Faces whose walk does not close are skipped (logged at `warn`), so the
    /// affected tiles lose that corner.
    pub fn build(base: &BaseGraph) -> Self {
        let mut g = TileGraph::empty(base.symmetry().clone(), base.shape(), *base.cfg());
        let mut seen: HashMap<FaceKey, usize> = HashMap::new();
        let mut open_faces = 0usize;

        for a in base.raw_vertices() {
            let mut corners = Vec::new();
            for b in base.neighbors(a) {
                let poly = base.polygon(a, b);
                if poly.is_empty() {
                    open_faces += 1;
                    continue;
                }
                // Drop the closing repeat of `a`.
                let face = &poly[..poly.len() - 1];
                let corner = match g.find_face(base, &seen, face) {
                    Some(c) => c,
                    None => {
                        let key: FaceKey = face.iter().copied().collect();
                        let c = g.create_corner(base, face);
                        seen.insert(key, c.index);
                        c
                    }
                };
                corners.push(corner);
            }
            let v = &base.vertices()[a.index];
            g.tiles.push(Tile {
                color: v.color,
                corners,
                stabilizer: v.stabilizer.clone(),
            });
        }

        g.link_tiles();
        g.link_neighbors();
        g.mark_blank_perimeter();
        tracing::debug!(
            tiles = g.tiles.len(),
            vertices = g.vertices.len(),
            open_faces,
            "tile graph built"
        );
        g
    }

    /// Existing corner whose key is a sector image of `face`, expressed in the caller's frame.
    fn find_face(
        &self,
        base: &BaseGraph,
        seen: &HashMap<FaceKey, usize>,
        face: &[VertexRef],
    ) -> Option<TileVertexRef> {
        for t in self.sym.all_sectors() {
            let key: Option<FaceKey> = face.iter().map(|&c| base.premul(c, t)).collect();
            let Some(key) = key else { continue };
            if let Some(&idx) = seen.get(&key) {
                return self.vref(idx, self.sym.invert(t)?);
            }
        }
        None
    }

    fn create_corner(&mut self, base: &BaseGraph, face: &[VertexRef]) -> TileVertexRef {
        let pts: Vec<_> = face.iter().map(|&c| base.pos(c)).collect();
        let pos = self.shape.to_surface(&centroid(&pts));
        let stab = Arc::new(Stabilizer::new(&self.sym, &pos, self.cfg.orbit_eps2));
        self.vertices.push(TileVertex::new(pos, stab));
        TileVertexRef::base(self.vertices.len() - 1)
    }

    /// Fill each corner's tile list from the tile corner cycles.
    fn link_tiles(&mut self) {
        let mut lists: Vec<Vec<TileRef>> = vec![Vec::new(); self.vertices.len()];
        for ti in 0..self.tiles.len() {
            for &c in &self.tiles[ti].corners {
                // Corner `c` of the base tile means the base corner sees the tile in `c.sector⁻¹`.
                let Some(inv) = self.sym.invert(c.sector) else {
                    continue;
                };
                for &g in self.vertices[c.index].stabilizer.fixing() {
                    let Some(s) = self.sym.combine(g, inv) else {
                        continue;
                    };
                    if let Some(t) = self.tref(ti, s) {
                        if !lists[c.index].contains(&t) {
                            lists[c.index].push(t);
                        }
                    }
                }
            }
        }
        for (vi, mut tiles) in lists.into_iter().enumerate() {
            let center = self.vertices[vi].pos;
            let mut keyed: Vec<(f64, TileRef)> = tiles
                .drain(..)
                .map(|t| (self.shape.tangent_angle(&center, &self.avg_pos(t)), t))
                .collect();
            keyed.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
            self.vertices[vi].tiles = keyed.into_iter().map(|(_, t)| t).collect();
        }
    }

    /// Neighbors of a corner are the next and previous corners of every tile at it.
    fn link_neighbors(&mut self) {
        for vi in 0..self.vertices.len() {
            let me = TileVertexRef::base(vi);
            let mut nbs: Vec<TileVertexRef> = Vec::new();
            for &t in &self.vertices[vi].tiles {
                for nb in [self.next(t, me), self.prev(t, me)].into_iter().flatten() {
                    if nb != me && !nbs.contains(&nb) {
                        nbs.push(nb);
                    }
                }
            }
            self.vertices[vi].neighbors = nbs;
        }
    }

    /// Corners of blank tiles border the region being tiled.
    fn mark_blank_perimeter(&mut self) {
        for vi in 0..self.vertices.len() {
            let blank = self.vertices[vi]
                .tiles
                .iter()
                .any(|t| self.tiles[t.index].color == BLANK);
            self.vertices[vi].on_perimeter = blank;
        }
    }
}
