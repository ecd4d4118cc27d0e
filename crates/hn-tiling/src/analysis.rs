//! Consistency checks on a colored base graph.
//!
//! Runs over the fundamental domain (symmetry applied through refs) and stops
//! at the first failure, in this order:
//! 1. adjacent vertices share a non-blank color;
//! 2. two neighbors of one vertex share a non-blank color;
//! 3. an edge is forced to curve toward both of its faces;
//! 4. two colors interleave around a vertex (`c .. d .. c .. d`), so the
//!    tiles cannot be drawn without crossings.
//!
//! "Diagonals" of a vertex `v` are the vertices on faces around `v` that are
//! not `v` and not adjacent to it.

use std::fmt;

use crate::dual::{BaseGraph, VertexRef};
use crate::symmetry::{Color, BLANK};

/// Outcome of [`check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub valid: bool,
    /// Empty when valid.
    pub message: String,
    /// Vertices implicated in the first failure.
    pub error_vertices: Vec<VertexRef>,
}

impl CheckResult {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
            error_vertices: Vec::new(),
        }
    }

    fn fail(message: String, error_vertices: Vec<VertexRef>) -> Self {
        tracing::debug!(%message, "check failed");
        Self {
            valid: false,
            message,
            error_vertices,
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "valid")
        } else {
            write!(f, "invalid: {}", self.message)
        }
    }
}

#[inline]
fn same_color(a: Color, b: Color) -> bool {
    a == b && a != BLANK
}

/// Run every check; the first failure wins.
pub fn check(g: &BaseGraph) -> CheckResult {
    adjacent_colors(g)
        .or_else(|| two_hop_colors(g))
        .or_else(|| curvature(g))
        .or_else(|| crossings(g))
        .unwrap_or_else(CheckResult::ok)
}

fn adjacent_colors(g: &BaseGraph) -> Option<CheckResult> {
    for a in g.raw_vertices() {
        for b in g.neighbors(a) {
            if same_color(g.color(a), g.color(b)) {
                return Some(CheckResult::fail(
                    format!("neighbors {} and {} are the same color", g.name(a), g.name(b)),
                    vec![a, b],
                ));
            }
        }
    }
    None
}

fn two_hop_colors(g: &BaseGraph) -> Option<CheckResult> {
    for a in g.raw_vertices() {
        let nbs = g.neighbors(a);
        for &b in &nbs {
            for &c in &nbs {
                if g.id(b) < g.id(c) && same_color(g.color(b), g.color(c)) {
                    return Some(CheckResult::fail(
                        format!(
                            "{} and {} share neighbor {} and are the same color",
                            g.name(b),
                            g.name(c),
                            g.name(a)
                        ),
                        vec![b, c],
                    ));
                }
            }
        }
    }
    None
}

/// Face vertices that are neither `v` nor adjacent to `v`, in walk order.
fn diagonals(g: &BaseGraph, v: VertexRef, face: &[VertexRef]) -> Vec<VertexRef> {
    let nbs = g.neighbors(v);
    face.iter()
        .copied()
        .filter(|x| *x != v && !nbs.contains(x))
        .collect()
}

/// True if the face holds a diagonal of one endpoint colored like the other.
fn curves_into(g: &BaseGraph, a: VertexRef, b: VertexRef, face: &[VertexRef]) -> bool {
    let hits = |from: VertexRef, other: VertexRef| {
        diagonals(g, from, face)
            .iter()
            .any(|&d| d != other && same_color(g.color(d), g.color(other)))
    };
    hits(a, b) || hits(b, a)
}

fn curvature(g: &BaseGraph) -> Option<CheckResult> {
    for a in g.raw_vertices() {
        for b in g.neighbors(a) {
            let left = g.polygon(a, b);
            let right = g.polygon(b, a);
            if left.is_empty() || right.is_empty() {
                continue;
            }
            if curves_into(g, a, b, &left) && curves_into(g, a, b, &right) {
                return Some(CheckResult::fail(
                    format!("edge {}-{} must curve both ways", g.name(a), g.name(b)),
                    vec![a, b],
                ));
            }
        }
    }
    None
}

/// Neighbors and face diagonals of `v` in counterclockwise order.
fn rotation(g: &BaseGraph, v: VertexRef) -> Vec<VertexRef> {
    let mut out = Vec::new();
    for b in g.neighbors(v) {
        out.push(b);
        let face = g.polygon(v, b);
        if face.len() > 1 {
            // Skip the leading `v, b` and the closing `v`.
            out.extend(diagonals(g, v, &face[2..face.len() - 1]));
        }
    }
    out
}

fn crossings(g: &BaseGraph) -> Option<CheckResult> {
    for v in g.raw_vertices() {
        let ring = rotation(g, v);
        let colored: Vec<(Color, VertexRef)> = ring
            .iter()
            .map(|&x| (g.color(x), x))
            .filter(|(c, _)| *c != BLANK)
            .collect();
        let mut colors: Vec<Color> = colored.iter().map(|(c, _)| *c).collect();
        colors.sort_unstable();
        colors.dedup();
        for (i, &c) in colors.iter().enumerate() {
            for &d in &colors[i + 1..] {
                if let Some((x, y)) = interleaved(&colored, c, d) {
                    return Some(CheckResult::fail(
                        format!(
                            "colors {c} and {d} cross around {} ({} and {} cannot be joined)",
                            g.name(v),
                            g.name(x),
                            g.name(y)
                        ),
                        vec![x, y],
                    ));
                }
            }
        }
    }
    None
}

/// If `c` and `d` alternate at least twice around the ring, the first
/// occurrences of the first two `c` runs.
fn interleaved(ring: &[(Color, VertexRef)], c: Color, d: Color) -> Option<(VertexRef, VertexRef)> {
    let seq: Vec<(Color, VertexRef)> = ring
        .iter()
        .copied()
        .filter(|(x, _)| *x == c || *x == d)
        .collect();
    // Start right after a color change so runs are not split by the wrap.
    let start = (0..seq.len()).find(|&i| seq[i].0 != seq[(i + seq.len() - 1) % seq.len()].0)?;
    let mut runs: Vec<(Color, VertexRef)> = Vec::new();
    for k in 0..seq.len() {
        let (col, r) = seq[(start + k) % seq.len()];
        if runs.last().map(|l| l.0) != Some(col) {
            runs.push((col, r));
        }
    }
    if runs.len() < 4 {
        return None;
    }
    let mut firsts = runs.iter().filter(|(col, _)| *col == c).map(|&(_, r)| r);
    Some((firsts.next()?, firsts.next()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{rotated_wheel, wheel};
    use crate::geometry::Shape;
    use crate::symmetry::Symmetry;
    use nalgebra::vector;
    use std::sync::Arc;

    fn plain() -> BaseGraph {
        BaseGraph::new(Arc::new(Symmetry::trivial()), Shape::Plane)
    }

    #[test]
    fn proper_wheels_are_valid() {
        for g in [wheel(), rotated_wheel()] {
            let r = check(&g);
            assert!(r.valid, "{r}");
            assert!(r.error_vertices.is_empty());
        }
    }

    #[test]
    fn same_colored_neighbors_are_reported() {
        let mut g = plain();
        let a = g.add_vertex(2, vector![0.0, 0.0, 0.0]).unwrap();
        let b = g.add_vertex(2, vector![1.0, 0.0, 0.0]).unwrap();
        g.toggle_edge(a, b).unwrap();
        let r = check(&g);
        assert!(!r.valid);
        assert_eq!(r.error_vertices, vec![a, b]);
        assert!(r.message.contains("same color"));
    }

    #[test]
    fn blank_never_conflicts() {
        let mut g = plain();
        let a = g.add_vertex(BLANK, vector![0.0, 0.0, 0.0]).unwrap();
        let b = g.add_vertex(BLANK, vector![1.0, 0.0, 0.0]).unwrap();
        g.toggle_edge(a, b).unwrap();
        assert!(check(&g).valid);
    }

    #[test]
    fn two_hop_conflict_is_reported() {
        let mut g = wheel();
        g.set_vertex_color(VertexRef::base(2), 0).unwrap();
        let r = check(&g);
        assert!(!r.valid);
        let mut got = r.error_vertices.clone();
        got.sort();
        assert_eq!(got, vec![VertexRef::base(0), VertexRef::base(2)]);
    }

    #[test]
    fn interleaving_colors_are_found() {
        let v = |i| VertexRef::base(i);
        let ring = [(0, v(0)), (1, v(1)), (0, v(2)), (1, v(3))];
        assert_eq!(interleaved(&ring, 0, 1), Some((v(0), v(2))));
        let ring = [(1, v(0)), (0, v(1)), (0, v(2)), (1, v(3)), (2, v(4))];
        assert_eq!(interleaved(&ring, 0, 1), None);
        let ring = [(0, v(0)), (0, v(1))];
        assert_eq!(interleaved(&ring, 0, 1), None);
    }

    #[test]
    fn interleaved_colors_around_a_hub_are_a_crossing() {
        // Hub 0, spokes 1..=4 on the axes, outer corners 5..=8 between them.
        let mut g = plain();
        let hub = g.add_vertex(5, vector![0.0, 0.0, 0.0]).unwrap();
        for (k, c) in [0, 2, 3, 4].into_iter().enumerate() {
            let t = std::f64::consts::FRAC_PI_2 * k as f64;
            g.add_vertex(c, vector![t.cos(), t.sin(), 0.0]).unwrap();
        }
        for (k, c) in [1, 0, 1, 6].into_iter().enumerate() {
            let t = std::f64::consts::FRAC_PI_4 * (2 * k + 1) as f64;
            g.add_vertex(c, vector![1.5 * t.cos(), 1.5 * t.sin(), 0.0]).unwrap();
        }
        for i in 0..4 {
            g.toggle_edge(hub, VertexRef::base(1 + i)).unwrap();
            g.toggle_edge_by_index(1 + i, 5 + i).unwrap();
            g.toggle_edge_by_index(5 + i, 1 + (i + 1) % 4).unwrap();
        }
        // Around the hub: 4 6 0 1 2 0 3 1, so 0 and 1 alternate.
        let r = check(&g);
        assert!(!r.valid);
        assert_eq!(r.message, "colors 0 and 1 cross around 0 (1 and 6 cannot be joined)");
        assert_eq!(r.error_vertices, vec![VertexRef::base(1), VertexRef::base(6)]);
    }

    #[test]
    fn edge_pulled_into_both_faces_fails_curvature() {
        // Two hexagons share the vertical edge 0-1; 4 and 8 sit across from it.
        let mut g = plain();
        let pts = [
            (1, [0.0, 0.0]),
            (0, [0.0, 1.0]),
            (2, [-1.0, 1.5]),
            (3, [-2.0, 1.0]),
            (0, [-2.0, 0.0]),
            (4, [-1.0, -0.5]),
            (3, [1.0, 1.5]),
            (2, [2.0, 1.0]),
            (0, [2.0, 0.0]),
            (5, [1.0, -0.5]),
        ];
        for (c, [x, y]) in pts {
            g.add_vertex(c, vector![x, y, 0.0]).unwrap();
        }
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 0),
            (1, 6),
            (6, 7),
            (7, 8),
            (8, 9),
            (9, 0),
        ];
        for (a, b) in edges {
            g.toggle_edge_by_index(a, b).unwrap();
        }
        let r = check(&g);
        assert!(!r.valid);
        assert_eq!(r.message, "edge 0-1 must curve both ways");
        assert_eq!(r.error_vertices, vec![VertexRef::base(0), VertexRef::base(1)]);
    }

    #[test]
    fn shared_neighbor_colors_around_a_pentagon() {
        // Hub inside a 5-cycle.
        let mut g = plain();
        let pts = (0..5).map(|k| {
            let t = 2.0 * std::f64::consts::PI * k as f64 / 5.0;
            vector![t.cos(), t.sin(), 0.0]
        });
        let colors = [0, 1, 2, 3, 1];
        for (c, p) in colors.iter().zip(pts) {
            g.add_vertex(*c, p).unwrap();
        }
        let hub = g.add_vertex(5, vector![0.0, 0.0, 0.0]).unwrap();
        for i in 0..5 {
            g.toggle_edge_by_index(i, (i + 1) % 5).unwrap();
            g.toggle_edge(hub, VertexRef::base(i)).unwrap();
        }
        // Vertices 1 and 4 are both color 1 and share the hub.
        let r = check(&g);
        assert!(!r.valid);
        assert!(r.message.contains("share neighbor"));
    }
}
