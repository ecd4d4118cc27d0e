//! The fixed icosahedral group used by legacy `edges` documents.
//!
//! Four generators, each the linear map sending one triple of icosahedron
//! vertices onto another, with hand-picked color permutations on 10 colors.
//! Their direct product collapses to the 60 rotations of the icosahedron.

use nalgebra::Vector3;

use super::generator::Generator;
use super::perm::ColorPerm;
use super::table::Symmetry;
use super::types::{Sector, SymmetryCfg, SymmetryError};
use crate::geometry::frame_map;

/// Unit-length icosahedron vertices, in the order the legacy maps index them.
pub fn icosahedron_vertices() -> [Vector3<f64>; 12] {
    let phi = 0.5 + 1.25f64.sqrt();
    [
        Vector3::new(-1.0, 0.0, -phi),
        Vector3::new(1.0, 0.0, -phi),
        Vector3::new(0.0, phi, -1.0),
        Vector3::new(-phi, 1.0, 0.0),
        Vector3::new(-phi, -1.0, 0.0),
        Vector3::new(0.0, -phi, -1.0),
        Vector3::new(1.0, 0.0, phi),
        Vector3::new(-1.0, 0.0, phi),
        Vector3::new(0.0, -phi, 1.0),
        Vector3::new(phi, -1.0, 0.0),
        Vector3::new(phi, 1.0, 0.0),
        Vector3::new(0.0, phi, 1.0),
    ]
    .map(|v| v.normalize())
}

/// `(target vertex triple, color permutation)`; every source triple is `{0, 1, 2}`.
const LEGACY_GENERATORS: [([usize; 3], [usize; 10]); 4] = [
    ([5, 4, 8], [5, 4, 2, 3, 1, 0, 6, 7, 8, 9]),
    ([11, 7, 3], [5, 1, 3, 2, 4, 0, 6, 7, 8, 9]),
    ([1, 2, 0], [1, 2, 0, 5, 3, 4, 6, 7, 8, 9]),
    ([0, 2, 3], [0, 2, 3, 4, 5, 1, 6, 7, 8, 9]),
];

/// Legacy edge codes and the sector each one denotes.
const LEGACY_CODES: [(i64, u32); 4] = [(0, 0), (10, 6), (20, 5), (30, 4)];

impl Symmetry {
    /// Rotation group of the icosahedron, built from the legacy generators.
    pub fn icosahedral() -> Result<Self, SymmetryError> {
        let cfg = SymmetryCfg::default();
        let v = icosahedron_vertices();
        let src = [v[0], v[1], v[2]];
        let mut generators = Vec::with_capacity(LEGACY_GENERATORS.len());
        for (id, (dst, perm)) in LEGACY_GENERATORS.iter().enumerate() {
            let m = frame_map(src, dst.map(|k| v[k]))
                .ok_or(SymmetryError::SingularTransform { generator: id })?;
            let perm = ColorPerm::new(perm.to_vec())?;
            generators.push(Generator::finite(id, m, perm, &cfg)?);
        }
        Symmetry::new(generators, cfg)
    }
}

/// Sector denoted by a legacy edge code, if the code is known.
pub fn legacy_sector(code: i64) -> Option<Sector> {
    LEGACY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, s)| Sector(s))
}
