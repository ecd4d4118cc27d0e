//! Small graphs shared by the unit tests.

use std::sync::Arc;

use nalgebra::vector;

use crate::dual::BaseGraph;
use crate::geometry::Shape;
use crate::symmetry::Symmetry;

/// Trivial symmetry: center (color 4) ringed by colors 0..4 at the unit axes,
/// spokes to every ring vertex and the ring closed 0-1-2-3-0.
pub fn wheel() -> BaseGraph {
    let mut g = BaseGraph::new(Arc::new(Symmetry::trivial()), Shape::Plane);
    g.add_vertex(0, vector![1.0, 0.0, 0.0]).unwrap();
    g.add_vertex(1, vector![0.0, 1.0, 0.0]).unwrap();
    g.add_vertex(2, vector![-1.0, 0.0, 0.0]).unwrap();
    g.add_vertex(3, vector![0.0, -1.0, 0.0]).unwrap();
    g.add_vertex(4, vector![0.0, 0.0, 0.0]).unwrap();
    for i in 0..4 {
        g.toggle_edge_by_index(4, i).unwrap();
        g.toggle_edge_by_index(i, (i + 1) % 4).unwrap();
    }
    g
}

/// The same wheel as one spoke under a 4-fold rotation that also cycles colors 0..4.
///
/// Vertex 0 is the center (color 4, fixed by every sector), vertex 1 the ring
/// vertex at `(1, 0)` with color 0.
pub fn rotated_wheel() -> BaseGraph {
    let sym = Arc::new(Symmetry::planar_rotation(4).unwrap());
    let mut g = BaseGraph::new(sym, Shape::Plane);
    let c = g.add_vertex(4, vector![0.0, 0.0, 0.0]).unwrap();
    let v = g.add_vertex(0, vector![1.0, 0.0, 0.0]).unwrap();
    g.toggle_edge(c, v).unwrap();
    let v1 = g.vref(v.index, crate::symmetry::Sector(1)).unwrap();
    g.toggle_edge(v, v1).unwrap();
    g
}
