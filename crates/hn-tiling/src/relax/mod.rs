//! Constraint relaxation of tile-corner positions.
//!
//! Purpose
//! - Derive keep-close / keep-far pairs from tile membership and colors, then
//!   nudge corners toward satisfying them with small velocity steps.
//!
//! Why this design
//! - Fixed-point relaxation with tuned gains (`RelaxCfg`); the returned error is
//!   a stopping heuristic, not a proof of validity.
//! - Velocities are accumulated in each stored corner's own frame, so every
//!   sector image of a corner moves identically. Corners with a non-trivial
//!   stabilizer never move.
//! - Constraint evaluation dominates a tick; quiet constraints are re-checked
//!   less often (see `Relaxation::step`).
//!
//! Code cross-refs: `tile::TileGraph`, `geometry::apply_dir`.

mod constraints;
mod solver;
mod types;

pub use constraints::derive_constraints;
pub use solver::Relaxation;
pub use types::{Boundary, Constraint, RelaxCfg};

#[cfg(test)]
mod tests;
