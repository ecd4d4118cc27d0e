//! Base-graph data types: references, vertex records, tolerances, errors.

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector3;

use crate::stabilizer::Stabilizer;
use crate::symmetry::{Color, Sector};

/// Upper bound on base vertices per graph.
pub const MAX_VERTICES: usize = 4096;

/// Non-owning reference to base vertex `index` as seen in `sector`.
///
/// Invariants:
/// - `sector` is canonical for the referenced vertex's stabilizer, so two refs
///   to the same image compare equal.
/// - Stale after `BaseGraph::delete_vertex`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexRef {
    pub index: usize,
    pub sector: Sector,
}

impl VertexRef {
    /// Reference to a vertex in the fundamental domain.
    #[inline]
    pub fn base(index: usize) -> Self {
        Self {
            index,
            sector: Sector::IDENTITY,
        }
    }
}

/// One colored vertex of the fundamental domain.
#[derive(Clone, Debug)]
pub struct BaseVertex {
    pub color: Color,
    pub pos: Vector3<f64>,
    /// Neighbor refs relative to this vertex's frame, sorted counterclockwise.
    pub neighbors: Vec<VertexRef>,
    /// Fixed at creation; not recomputed when the vertex moves.
    pub stabilizer: Arc<Stabilizer>,
}

/// Graph tolerances.
#[derive(Clone, Copy, Debug)]
pub struct GraphCfg {
    /// Squared-distance tolerance for "same point" in stabilizer and orbit tests.
    pub orbit_eps2: f64,
    /// Face walks longer than this are treated as unclosed.
    pub max_face_len: usize,
}

impl Default for GraphCfg {
    fn default() -> Self {
        Self {
            orbit_eps2: 1e-12,
            max_face_len: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Index does not name a live vertex.
    StaleIndex { index: usize, len: usize },
    /// Both endpoints of an edge are the same reference.
    SelfEdge { index: usize },
    /// A sector product fell outside the symmetry table.
    UnresolvedSector { index: usize, sector: Sector },
    TooManyVertices { max: usize },
    /// `vertex_with_name` could not parse or resolve the name.
    UnknownName(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::StaleIndex { index, len } => {
                write!(f, "vertex index {index} out of range (graph has {len})")
            }
            GraphError::SelfEdge { index } => write!(f, "edge from vertex {index} to itself"),
            GraphError::UnresolvedSector { index, sector } => write!(
                f,
                "vertex {index}: relative sector {sector} is not in the symmetry table"
            ),
            GraphError::TooManyVertices { max } => write!(f, "graph is full ({max} vertices)"),
            GraphError::UnknownName(name) => write!(f, "no vertex named {name:?}"),
        }
    }
}

impl std::error::Error for GraphError {}
