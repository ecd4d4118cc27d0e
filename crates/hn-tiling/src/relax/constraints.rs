//! Constraint derivation by bounded breadth-first search over corners.

use std::collections::{BTreeMap, HashSet};

use super::types::Constraint;
use crate::symmetry::{Color, BLANK};
use crate::tile::{TileGraph, TileRef, TileVertexRef};

/// Constraints between every stored corner and the corners within `depth` edges.
///
/// - `keep_close`: the two corners share a tile.
/// - `keep_far`: for some non-blank color both corners touch a tile of that
///   color, but no tile of that color touches both.
///
/// Each unordered pair appears once, written from the side with the smaller
/// `(a, b)` after moving `a` to the identity sector.
pub fn derive_constraints(g: &TileGraph, depth: usize) -> Vec<Constraint> {
    let mut seen: HashSet<(TileVertexRef, TileVertexRef)> = HashSet::new();
    let mut out = Vec::new();
    for a in g.raw_vertices() {
        let tiles_a = g.tiles_at(a);
        for b in within(g, a, depth) {
            let Some(key) = normalized(g, a, b) else {
                continue;
            };
            if !seen.insert(key) {
                continue;
            }
            let tiles_b = g.tiles_at(b);
            let keep_close = tiles_a.iter().any(|t| tiles_b.contains(t));
            let keep_far = separated_color(g, &tiles_a, &tiles_b);
            if keep_close || keep_far {
                out.push(Constraint {
                    a: key.0,
                    b: key.1,
                    keep_close,
                    keep_far,
                });
            }
        }
    }
    tracing::debug!(
        constraints = out.len(),
        close = out.iter().filter(|c| c.keep_close).count(),
        far = out.iter().filter(|c| c.keep_far).count(),
        depth,
        "derived constraints"
    );
    out
}

/// Corners at graph distance `1..=depth` from `start` (iterative BFS).
fn within(g: &TileGraph, start: TileVertexRef, depth: usize) -> Vec<TileVertexRef> {
    let mut visited: HashSet<TileVertexRef> = HashSet::from([start]);
    let mut frontier = vec![start];
    let mut out = Vec::new();
    for _ in 0..depth {
        let mut next = Vec::new();
        for r in frontier {
            for nb in g.neighbors(r) {
                if visited.insert(nb) {
                    next.push(nb);
                    out.push(nb);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    out
}

/// The pair written from `a`'s side or from `b`'s side, whichever sorts first.
fn normalized(
    g: &TileGraph,
    a: TileVertexRef,
    b: TileVertexRef,
) -> Option<(TileVertexRef, TileVertexRef)> {
    let sym = g.symmetry();
    let ia = sym.invert(a.sector)?;
    let ib = sym.invert(b.sector)?;
    let from_a = (g.premul(a, ia)?, g.premul(b, ia)?);
    let from_b = (g.premul(b, ib)?, g.premul(a, ib)?);
    if from_a.0 == from_a.1 {
        return None;
    }
    Some(from_a.min(from_b))
}

fn separated_color(g: &TileGraph, tiles_a: &[TileRef], tiles_b: &[TileRef]) -> bool {
    let by_color = |tiles: &[TileRef]| {
        let mut m: BTreeMap<Color, Vec<TileRef>> = BTreeMap::new();
        for &t in tiles {
            let c = g.tile_color(t);
            if c != BLANK {
                m.entry(c).or_default().push(t);
            }
        }
        m
    };
    let ca = by_color(tiles_a);
    let cb = by_color(tiles_b);
    ca.iter().any(|(c, ta)| match cb.get(c) {
        Some(tb) => !ta.iter().any(|t| tb.contains(t)),
        None => false,
    })
}
