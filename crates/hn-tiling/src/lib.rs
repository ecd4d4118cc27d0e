//! Symmetric colored tilings: sector algebra, dual/tile graphs, relaxation and checks.
//!
//! Pipeline
//! - `symmetry`: finite table of group elements ("sectors") for a direct product
//!   of cyclic generators, with O(1) combine/invert.
//! - `dual`: colored base graph in one fundamental domain; edges replicate
//!   over each endpoint's stabilizer.
//! - `tile`: the planar dual of the base graph, rebuilt wholesale after edits.
//! - `relax`: keep-close/keep-far constraints and the velocity relaxation.
//! - `analysis`: coloring and drawability checks on the base graph.
//! - `io`: JSON documents (current and legacy layouts).
//!
//! API Policy
//! - Project-internal; no stable public API. `api` collects the entry points
//!   callers are expected to use.

pub mod analysis;
pub mod api;
pub mod dual;
pub mod geometry;
pub mod io;
pub mod relax;
pub mod stabilizer;
pub mod symmetry;
pub mod tile;

#[cfg(test)]
mod fixtures;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::{Matrix4 as Mat4, Vector3 as Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::analysis::{check, CheckResult};
    pub use crate::dual::{BaseGraph, GraphCfg, VertexRef};
    pub use crate::geometry::Shape;
    pub use crate::relax::{Boundary, RelaxCfg, Relaxation};
    pub use crate::symmetry::{Color, Sector, Symmetry, BLANK};
    pub use crate::tile::{TileGraph, TileVertexRef};
    pub use nalgebra::{Matrix4 as Mat4, Vector3 as Vec3};
}
