//! Face tracing on the base graph.

use super::graph::BaseGraph;
use super::types::VertexRef;

impl BaseGraph {
    /// Boundary of the face to the left of the directed edge `a -> b`.
    ///
    /// At each step the walk leaves `cur` along the neighbor just clockwise of
    /// the edge it arrived on, which keeps the face on the left. The result is
    /// `[a, b, .., a]`; it is empty if `b` is not a neighbor of `a`, the walk
    /// leaves the symmetry table, or it does not return to `a -> b` within
    /// `GraphCfg::max_face_len` steps. At `a`, the face lies between `b` and
    /// `next_ccw(a, b)`.
    pub fn polygon(&self, a: VertexRef, b: VertexRef) -> Vec<VertexRef> {
        if !self.neighbors(a).contains(&b) {
            return Vec::new();
        }
        let mut out = vec![a, b];
        let (mut prev, mut cur) = (a, b);
        for _ in 0..self.cfg().max_face_len {
            let Some(next) = self.prev_ccw(cur, prev) else {
                break;
            };
            (prev, cur) = (cur, next);
            if (prev, cur) == (a, b) {
                return out;
            }
            out.push(cur);
        }
        tracing::warn!(
            a = %self.name(a),
            b = %self.name(b),
            steps = out.len(),
            "face walk did not close"
        );
        Vec::new()
    }
}
