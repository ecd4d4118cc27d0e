//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI, benches
//!   and demos. Breaking changes are allowed.

// Symmetry
pub use crate::symmetry::{
    icosahedron_vertices, legacy_sector, Color, ColorPerm, Generator, Sector, Symmetry,
    SymmetryCfg, SymmetryError, BLANK, MAX_SECTORS,
};
// Geometry
pub use crate::geometry::{frame_map, rotation, translation, Shape};
pub use crate::stabilizer::Stabilizer;
// Graphs
pub use crate::dual::{BaseGraph, BaseVertex, GraphCfg, GraphError, VertexRef, MAX_VERTICES};
pub use crate::tile::{Tile, TileGraph, TileRef, TileVertex, TileVertexRef};
// Relaxation and checks
pub use crate::analysis::{check, CheckResult};
pub use crate::relax::{derive_constraints, Boundary, Constraint, RelaxCfg, Relaxation};
// Documents
pub use crate::io::{
    from_doc, load_str, load_str_with, save_string, tile_doc, to_doc, GraphDoc, LoadError,
    TileGraphDoc,
};
