//! Symmetry algebra: sectors of a direct product of cyclic generators.
//!
//! Purpose
//! - Model a symmetry group acting on the embedding surface as an ordered list
//!   of generators (rigid transform + color permutation), each finite or
//!   windowed-infinite, and expose its elements as a finite table of sectors.
//! - Give O(1) `combine`/`invert` lookups so graph code never multiplies
//!   matrices on hot paths.
//!
//! Why this design
//! - The table is immutable once built and shared behind `Arc` by every graph
//!   using it; no global state.
//! - Transform identity is decided by coordinate rounding (`SymmetryCfg::hash_eps`).
//!   Lookups that miss return `None` rather than a nearby sector.
//!
//! Code cross-refs: `geometry::{quantize16, frame_map}`,
//! `stabilizer::Stabilizer` (orbits of points under the table).

mod generator;
mod icosahedron;
mod perm;
mod table;
mod types;

pub use generator::Generator;
pub use icosahedron::{icosahedron_vertices, legacy_sector};
pub use perm::ColorPerm;
pub use table::Symmetry;
pub use types::{Color, Sector, SymmetryCfg, SymmetryError, BLANK, MAX_SECTORS};

#[cfg(test)]
mod tests;
