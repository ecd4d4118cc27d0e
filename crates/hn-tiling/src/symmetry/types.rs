//! Basic symmetry types: sector ids, colors, tolerances, and errors.
//!
//! - `Sector`: index into a `Symmetry` sector table; `Sector::IDENTITY` is always 0.
//! - `SymmetryCfg`: centralizes the equality/hash tolerances and window padding.

use std::fmt;

/// Tile color. Non-negative values are real colors; see [`BLANK`].
pub type Color = i32;

/// Reserved "no color" value; never permuted, never conflicts.
pub const BLANK: Color = -1;

/// Upper bound on distinct sectors (the combine table is quadratic in this).
pub const MAX_SECTORS: usize = 2048;

/// One element of the symmetry group (one image of the fundamental domain).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sector(pub u32);

impl Sector {
    pub const IDENTITY: Sector = Sector(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symmetry tolerances.
#[derive(Clone, Copy, Debug)]
pub struct SymmetryCfg {
    /// Max-abs tolerance when testing a generator power against the identity.
    pub eq_eps: f64,
    /// Rounding step of the transform hash. Transforms within the same bucket
    /// are the same sector.
    pub hash_eps: f64,
    /// Powers tried before a generator is declared infinite.
    pub order_cap: u32,
    /// Extra indices on both sides of an infinite generator's visible window.
    pub window_margin: i32,
}

impl Default for SymmetryCfg {
    fn default() -> Self {
        Self {
            eq_eps: 1e-9,
            hash_eps: 1e-3,
            order_cap: 100,
            window_margin: 1,
        }
    }
}

/// Errors raised while building a symmetry table.
#[derive(Debug, Clone, PartialEq)]
pub enum SymmetryError {
    /// Generator has no finite order below the cap and no visible window was given.
    InfiniteWithoutWindow { generator: usize },
    /// Visible window `[lo, hi)` is empty.
    EmptyWindow { generator: usize, lo: i32, hi: i32 },
    /// Visible window `[lo, hi)` cannot be padded without leaving the `i32` range.
    WindowOutOfRange { generator: usize, lo: i32, hi: i32 },
    /// Color permutation does not return to the identity after the transform's order.
    PermOrderMismatch { generator: usize, order: u32 },
    /// Color permutation is not a bijection on `0..n`.
    InvalidPerm { reason: String },
    /// A transform (or one of its powers) is not invertible.
    SingularTransform { generator: usize },
    /// The composite transform at these generator indexes is not invertible.
    SingularSector { indexes: Vec<i32> },
    /// Cartesian product of generator ranges is too large.
    TooManySectors { count: usize, max: usize },
}

impl fmt::Display for SymmetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymmetryError::InfiniteWithoutWindow { generator } => write!(
                f,
                "generator {generator} has infinite order and needs a visible window"
            ),
            SymmetryError::EmptyWindow { generator, lo, hi } => {
                write!(f, "generator {generator} has empty window [{lo}, {hi})")
            }
            SymmetryError::WindowOutOfRange { generator, lo, hi } => write!(
                f,
                "generator {generator}: window [{lo}, {hi}) is out of range once padded"
            ),
            SymmetryError::PermOrderMismatch { generator, order } => write!(
                f,
                "generator {generator}: color permutation is not the identity at the transform order {order}"
            ),
            SymmetryError::InvalidPerm { reason } => write!(f, "invalid color permutation: {reason}"),
            SymmetryError::SingularTransform { generator } => {
                write!(f, "generator {generator} has a singular transform")
            }
            SymmetryError::SingularSector { indexes } => {
                write!(f, "sector at generator indexes {indexes:?} has a singular transform")
            }
            SymmetryError::TooManySectors { count, max } => {
                write!(f, "symmetry has {count} sectors (max {max})")
            }
        }
    }
}

impl std::error::Error for SymmetryError {}
