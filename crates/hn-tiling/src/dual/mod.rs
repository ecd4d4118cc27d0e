//! Base (dual) graph: colored vertices of one fundamental domain.
//!
//! Purpose
//! - Hold the seed graph whose vertices become tiles and whose edges mean
//!   "these tiles touch". Adjacency is stored relative to each vertex's own
//!   frame and expanded through the shared `Symmetry` on demand.
//! - Provide the face walk (`polygon`) that the tile graph is built from.
//!
//! Why this design
//! - Arena of vertex records plus `(index, sector)` refs; no back-pointers.
//! - Refs are canonicalized through the referenced vertex's `Stabilizer`, so
//!   equality of refs is equality of images.
//! - Every mutation re-sorts neighbor rotations, so the counterclockwise order
//!   `polygon` depends on is never stale.
//!
//! Code cross-refs: `symmetry::Symmetry`, `stabilizer::Stabilizer`,
//! `tile::TileGraph::build`, `analysis::check`.

mod faces;
mod graph;
mod types;

pub use graph::BaseGraph;
pub use types::{BaseVertex, GraphCfg, GraphError, VertexRef, MAX_VERTICES};
