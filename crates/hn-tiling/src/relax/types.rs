//! Relaxation knobs and constraint records.

use crate::tile::TileVertexRef;

/// Gains and thresholds of the relaxation (empirically tuned defaults).
#[derive(Clone, Copy, Debug)]
pub struct RelaxCfg {
    /// Fraction of a violation corrected per tick.
    pub gain: f64,
    /// Safety margin applied to both distance thresholds.
    pub padding: f64,
    /// Corners of one tile must stay within this distance.
    pub tile_diameter: f64,
    /// Corners of distinct same-colored tiles must stay at least this far apart.
    pub target_distance: f64,
    /// Graph distance searched for constraint partners.
    pub search_depth: usize,
}

impl Default for RelaxCfg {
    fn default() -> Self {
        Self {
            gain: 0.03,
            padding: 1e-4,
            tile_diameter: 1.0,
            target_distance: 1.0,
            search_depth: 5,
        }
    }
}

/// Optional shaping of perimeter-flagged vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Boundary {
    /// Outer-perimeter vertices are pushed out to at least this radius.
    pub outer_radius: Option<f64>,
    /// Inner-perimeter vertices are pulled in to at most this radius.
    pub inner_radius: Option<f64>,
    /// `(width, height)`: outer-perimeter vertices are pushed out of this centered rectangle.
    ///
    /// A corner inside moves along the axis of the nearer edge, but both its
    /// step and its error use the larger of the two edge distances.
    pub strip: Option<(f64, f64)>,
}

/// Distance requirement between two corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub a: TileVertexRef,
    pub b: TileVertexRef,
    /// Share a tile: distance at most the tile diameter.
    pub keep_close: bool,
    /// Lie on distinct tiles of one color: distance at least the target.
    pub keep_far: bool,
}

/// Constraint plus its scheduling state.
#[derive(Clone, Debug)]
pub(crate) struct Scheduled {
    pub(crate) constraint: Constraint,
    pub(crate) check_frequency: usize,
    pub(crate) violations: usize,
}

impl Scheduled {
    pub(crate) fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            check_frequency: 1,
            violations: 0,
        }
    }
}
