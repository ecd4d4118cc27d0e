//! Tile graph: the planar dual of the base graph.
//!
//! Purpose
//! - Turn colored base vertices into tiles and base faces into tile corners,
//!   then recover the corner 1-skeleton from the tile cycles alone.
//!
//! Why this design
//! - Faces are deduplicated up to symmetry (key = set of base refs), which keeps
//!   the stored graph finite under large or windowed-infinite groups.
//! - Corners carry their own `Stabilizer`, computed from the seed position, so
//!   refs to corners canonicalize like base refs.
//!
//! Code cross-refs: `dual::BaseGraph::polygon`, `relax::Relaxation`.

mod build;
mod graph;
mod types;

pub use graph::TileGraph;
pub use types::{Tile, TileRef, TileVertex, TileVertexRef};
