//! Tile-graph records and references.

use std::sync::Arc;

use nalgebra::Vector3;

use crate::stabilizer::Stabilizer;
use crate::symmetry::{Color, Sector};

/// Non-owning reference to tile corner `index` as seen in `sector` (canonical).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileVertexRef {
    pub index: usize,
    pub sector: Sector,
}

/// Non-owning reference to tile `index` as seen in `sector` (canonical).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileRef {
    pub index: usize,
    pub sector: Sector,
}

impl TileVertexRef {
    #[inline]
    pub fn base(index: usize) -> Self {
        Self {
            index,
            sector: Sector::IDENTITY,
        }
    }
}

impl TileRef {
    #[inline]
    pub fn base(index: usize) -> Self {
        Self {
            index,
            sector: Sector::IDENTITY,
        }
    }
}

/// One tile per base vertex.
#[derive(Clone, Debug)]
pub struct Tile {
    pub color: Color,
    /// Corners in counterclockwise order.
    pub corners: Vec<TileVertexRef>,
    /// Shared with the base vertex the tile came from.
    pub stabilizer: Arc<Stabilizer>,
}

/// A tile corner.
#[derive(Clone, Debug)]
pub struct TileVertex {
    pub pos: Vector3<f64>,
    pub stabilizer: Arc<Stabilizer>,
    /// Tiles meeting here, relative to this vertex's frame, counterclockwise.
    pub tiles: Vec<TileRef>,
    /// Adjacent corners along tile edges, relative to this vertex's frame.
    pub neighbors: Vec<TileVertexRef>,
    /// Pushed outward by an outer-radius or strip boundary.
    pub on_perimeter: bool,
    /// Pulled inward by an inner-radius boundary.
    pub on_inner_perimeter: bool,
}

impl TileVertex {
    pub(crate) fn new(pos: Vector3<f64>, stabilizer: Arc<Stabilizer>) -> Self {
        Self {
            pos,
            stabilizer,
            tiles: Vec::new(),
            neighbors: Vec::new(),
            on_perimeter: false,
            on_inner_perimeter: false,
        }
    }
}
