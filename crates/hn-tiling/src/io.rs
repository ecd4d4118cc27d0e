//! JSON documents for base graphs (and a read-only tile-graph summary).
//!
//! Purpose
//! - Persist a `BaseGraph` together with its symmetry generators and surface so
//!   that loading reproduces the same sector ids, colors, positions and edges.
//! - Load legacy documents (top-level `edges` array) onto the fixed icosahedral
//!   group.
//!
//! Why this design
//! - Documents are plain serde structs; conversion to and from the graph goes
//!   through the public graph API, so every loaded graph satisfies the same
//!   invariants as one built by hand.
//! - Generator matrices are stored row-major as `[[f64; 4]; 4]`.
//!
//! Code cross-refs: `symmetry::Symmetry::new`, `symmetry::legacy_sector`.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::dual::{BaseGraph, GraphCfg, GraphError, VertexRef};
use crate::geometry::Shape;
use crate::symmetry::{
    legacy_sector, Color, ColorPerm, Generator, Sector, Symmetry, SymmetryCfg, SymmetryError,
};
use crate::tile::TileGraph;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphDoc {
    pub symmetry: Vec<GeneratorDoc>,
    /// Tolerances the sector table was built with; absent means the defaults.
    #[serde(
        default,
        rename = "symmetryCfg",
        skip_serializing_if = "Option::is_none"
    )]
    pub symmetry_cfg: Option<SymmetryCfgDoc>,
    pub shape: ShapeDoc,
    pub vertices: Vec<VertexDoc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorDoc {
    /// Row-major homogeneous transform.
    pub matrix: [[f64; 4]; 4],
    pub color_perm: Vec<usize>,
    /// Visible window, only for generators of infinite order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lo: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hi: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetryCfgDoc {
    pub eq_eps: f64,
    pub hash_eps: f64,
    pub order_cap: u32,
    pub window_margin: i32,
}

impl From<&SymmetryCfg> for SymmetryCfgDoc {
    fn from(cfg: &SymmetryCfg) -> Self {
        Self {
            eq_eps: cfg.eq_eps,
            hash_eps: cfg.hash_eps,
            order_cap: cfg.order_cap,
            window_margin: cfg.window_margin,
        }
    }
}

impl From<SymmetryCfgDoc> for SymmetryCfg {
    fn from(doc: SymmetryCfgDoc) -> Self {
        Self {
            eq_eps: doc.eq_eps,
            hash_eps: doc.hash_eps,
            order_cap: doc.order_cap,
            window_margin: doc.window_margin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeDoc {
    /// `"plane"` or `"sphere"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexDoc {
    pub index: usize,
    pub color: Color,
    pub pos: [f64; 3],
    pub neighbors: Vec<RefDoc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefDoc {
    pub index: usize,
    pub sector_id: u32,
}

/// Legacy layout: vertices in index order, edges as `[a, b, code]`.
#[derive(Clone, Debug, Deserialize)]
struct LegacyDoc {
    vertices: Vec<LegacyVertex>,
    edges: Vec<(usize, usize, i64)>,
}

#[derive(Clone, Debug, Deserialize)]
struct LegacyVertex {
    color: Color,
    pos: [f64; 3],
}

/// Corner positions and tiles of a built tile graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGraphDoc {
    pub vertices: Vec<TileVertexDoc>,
    pub tiles: Vec<TileDoc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileVertexDoc {
    pub index: usize,
    pub pos: [f64; 3],
    pub on_perimeter: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDoc {
    pub index: usize,
    pub color: Color,
    pub corners: Vec<RefDoc>,
}

#[derive(Debug)]
pub enum LoadError {
    Json(serde_json::Error),
    UnsupportedShape(String),
    /// Vertex list is not indexed `0..n`, or a neighbor does not resolve or
    /// is not listed back.
    MalformedVertex { index: usize, reason: String },
    /// Legacy edge code outside {0, 10, 20, 30}.
    UnknownEdgeCode(i64),
    Symmetry(SymmetryError),
    Graph(GraphError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Json(e) => write!(f, "invalid JSON document: {e}"),
            LoadError::UnsupportedShape(kind) => write!(f, "unsupported shape type {kind:?}"),
            LoadError::MalformedVertex { index, reason } => {
                write!(f, "vertex {index}: {reason}")
            }
            LoadError::UnknownEdgeCode(code) => write!(f, "unknown legacy edge code {code}"),
            LoadError::Symmetry(e) => write!(f, "symmetry: {e}"),
            LoadError::Graph(e) => write!(f, "graph: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Json(e) => Some(e),
            LoadError::Symmetry(e) => Some(e),
            LoadError::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

impl From<SymmetryError> for LoadError {
    fn from(e: SymmetryError) -> Self {
        LoadError::Symmetry(e)
    }
}

impl From<GraphError> for LoadError {
    fn from(e: GraphError) -> Self {
        LoadError::Graph(e)
    }
}

fn rows(m: &Matrix4<f64>) -> [[f64; 4]; 4] {
    std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]))
}

fn arr3(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn ref_doc(index: usize, sector: Sector) -> RefDoc {
    RefDoc {
        index,
        sector_id: sector.0,
    }
}

/// Snapshot a base graph as a document.
pub fn to_doc(g: &BaseGraph) -> GraphDoc {
    let symmetry = g
        .symmetry()
        .generators()
        .iter()
        .map(|gen| {
            let window = gen.window().filter(|_| !gen.is_finite());
            GeneratorDoc {
                matrix: rows(gen.matrix()),
                color_perm: gen.perm().as_slice().to_vec(),
                lo: window.map(|w| w.0),
                hi: window.map(|w| w.1),
            }
        })
        .collect();
    let shape = match g.shape() {
        Shape::Plane => ShapeDoc {
            kind: "plane".into(),
            radius: None,
        },
        Shape::Sphere { radius } => ShapeDoc {
            kind: "sphere".into(),
            radius: Some(radius),
        },
    };
    let vertices = g
        .vertices()
        .iter()
        .enumerate()
        .map(|(index, v)| VertexDoc {
            index,
            color: v.color,
            pos: arr3(&v.pos),
            neighbors: v.neighbors.iter().map(|r| ref_doc(r.index, r.sector)).collect(),
        })
        .collect();
    GraphDoc {
        symmetry,
        symmetry_cfg: Some(SymmetryCfgDoc::from(g.symmetry().cfg())),
        shape,
        vertices,
    }
}

fn shape_of(doc: &ShapeDoc) -> Result<Shape, LoadError> {
    match doc.kind.as_str() {
        "plane" => Ok(Shape::Plane),
        "sphere" => Ok(Shape::Sphere {
            radius: doc.radius.unwrap_or(1.0),
        }),
        other => Err(LoadError::UnsupportedShape(other.to_string())),
    }
}

fn symmetry_of(docs: &[GeneratorDoc], cfg: SymmetryCfg) -> Result<Symmetry, LoadError> {
    let mut generators = Vec::with_capacity(docs.len());
    for (id, d) in docs.iter().enumerate() {
        let m = Matrix4::from_fn(|r, c| d.matrix[r][c]);
        let perm = ColorPerm::new(d.color_perm.clone())?;
        let window = d.lo.zip(d.hi);
        generators.push(Generator::new(id, m, perm, window, &cfg)?);
    }
    Ok(Symmetry::new(generators, cfg)?)
}

/// Rebuild a base graph from a document.
pub fn from_doc(doc: &GraphDoc, cfg: GraphCfg) -> Result<BaseGraph, LoadError> {
    let sym_cfg = doc.symmetry_cfg.map(SymmetryCfg::from).unwrap_or_default();
    let sym = Arc::new(symmetry_of(&doc.symmetry, sym_cfg)?);
    let shape = shape_of(&doc.shape)?;
    let mut g = BaseGraph::with_cfg(sym, shape, cfg);

    let mut order: Vec<&VertexDoc> = doc.vertices.iter().collect();
    order.sort_by_key(|v| v.index);
    for (expected, v) in order.iter().enumerate() {
        if v.index != expected {
            return Err(LoadError::MalformedVertex {
                index: v.index,
                reason: format!("expected index {expected}"),
            });
        }
        g.add_vertex(v.color, Vector3::from(v.pos))?;
    }
    for v in &order {
        let mut neighbors = Vec::with_capacity(v.neighbors.len());
        for nb in &v.neighbors {
            let r = g
                .vref(nb.index, Sector(nb.sector_id))
                .ok_or_else(|| LoadError::MalformedVertex {
                    index: v.index,
                    reason: format!("neighbor {}-{} does not resolve", nb.index, nb.sector_id),
                })?;
            neighbors.push(r);
        }
        g.set_neighbors(v.index, neighbors);
    }
    // Every edge is stored on both endpoints.
    for (index, v) in g.vertices().iter().enumerate() {
        for &r in &v.neighbors {
            let back = g.unpremul(VertexRef::base(index), r.sector);
            if !back.is_some_and(|b| g.vertices()[r.index].neighbors.contains(&b)) {
                return Err(LoadError::MalformedVertex {
                    index,
                    reason: format!("neighbor {} does not list it back", g.name(r)),
                });
            }
        }
    }
    g.sort_neighbors();
    Ok(g)
}

fn from_legacy(doc: &LegacyDoc, cfg: GraphCfg) -> Result<BaseGraph, LoadError> {
    let sym = Arc::new(Symmetry::icosahedral()?);
    let mut g = BaseGraph::with_cfg(sym, Shape::Sphere { radius: 1.0 }, cfg);
    for v in &doc.vertices {
        g.add_vertex(v.color, Vector3::from(v.pos))?;
    }
    for &(a, b, code) in &doc.edges {
        let s = legacy_sector(code).ok_or(LoadError::UnknownEdgeCode(code))?;
        let b = g.vref(b, s).ok_or(LoadError::MalformedVertex {
            index: b,
            reason: "edge endpoint out of range".into(),
        })?;
        g.toggle_edge(VertexRef::base(a), b)?;
    }
    Ok(g)
}

/// Parse either document layout; a top-level `edges` key selects the legacy one.
pub fn load_str(s: &str) -> Result<BaseGraph, LoadError> {
    load_str_with(s, GraphCfg::default())
}

pub fn load_str_with(s: &str, cfg: GraphCfg) -> Result<BaseGraph, LoadError> {
    let value: serde_json::Value = serde_json::from_str(s)?;
    let g = if value.get("edges").is_some() {
        from_legacy(&serde_json::from_value(value)?, cfg)?
    } else {
        from_doc(&serde_json::from_value(value)?, cfg)?
    };
    tracing::debug!(
        vertices = g.len(),
        sectors = g.symmetry().num_sectors(),
        "loaded graph document"
    );
    Ok(g)
}

pub fn save_string(g: &BaseGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_doc(g))
}

/// Summary of a tile graph's fundamental domain.
pub fn tile_doc(t: &TileGraph) -> TileGraphDoc {
    TileGraphDoc {
        vertices: t
            .vertices()
            .iter()
            .enumerate()
            .map(|(index, v)| TileVertexDoc {
                index,
                pos: arr3(&v.pos),
                on_perimeter: v.on_perimeter,
            })
            .collect(),
        tiles: t
            .tiles()
            .iter()
            .enumerate()
            .map(|(index, tile)| TileDoc {
                index,
                color: tile.color,
                corners: tile.corners.iter().map(|c| ref_doc(c.index, c.sector)).collect(),
            })
            .collect(),
    }
}
