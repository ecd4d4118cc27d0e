//! Composite symmetry: the sector table of a direct product of generators.
//!
//! Construction enumerates the Cartesian product of generator indices, composes
//! transforms (matrix product in generator order) and color permutations, and
//! hashes every transform by coordinate rounding. Transforms landing in an
//! already-used bucket are the same sector and are collapsed. The combine and
//! invert tables are then filled by hashing products and inverses, so both are
//! O(1) lookups afterwards; entries with no matching sector are "not found".

use std::collections::HashMap;
use std::f64::consts::PI;

use nalgebra::{Matrix4, Vector3};

use super::generator::Generator;
use super::perm::ColorPerm;
use super::types::{Color, Sector, SymmetryCfg, SymmetryError, MAX_SECTORS};
use crate::geometry::{apply_point, quantize16, rotation};

const NOT_FOUND: u32 = u32::MAX;

#[derive(Clone, Debug)]
struct SectorData {
    indexes: Vec<i32>,
    matrix: Matrix4<f64>,
    inverse: Matrix4<f64>,
    perm: ColorPerm,
    perm_inv: ColorPerm,
    visible: bool,
}

/// Immutable sector table shared (behind `Arc`) by every graph using the group.
#[derive(Clone, Debug)]
pub struct Symmetry {
    cfg: SymmetryCfg,
    generators: Vec<Generator>,
    sectors: Vec<SectorData>,
    lookup: HashMap<[i64; 16], Sector>,
    combine: Vec<u32>,
    invert: Vec<u32>,
    collapsed: usize,
}

impl Symmetry {
    /// Build the table for the direct product of `generators`.
    pub fn new(generators: Vec<Generator>, cfg: SymmetryCfg) -> Result<Self, SymmetryError> {
        let count = generators
            .iter()
            .try_fold(1usize, |acc, g| acc.checked_mul(g.len()))
            .unwrap_or(usize::MAX);
        if count > MAX_SECTORS {
            return Err(SymmetryError::TooManySectors {
                count,
                max: MAX_SECTORS,
            });
        }

        let mut sectors: Vec<SectorData> = Vec::with_capacity(count);
        let mut lookup = HashMap::with_capacity(count);
        let mut collapsed = 0usize;
        for indexes in index_tuples(&generators) {
            let mut matrix = Matrix4::identity();
            let mut perm = ColorPerm::identity();
            let mut visible = true;
            for (g, &k) in generators.iter().zip(&indexes) {
                matrix *= g.power(k);
                perm = perm.compose(g.perm_power(k));
                visible &= g.is_visible(k);
            }
            let key = quantize16(&matrix, cfg.hash_eps);
            if lookup.contains_key(&key) {
                collapsed += 1;
                continue;
            }
            let Some(inverse) = matrix.try_inverse() else {
                return Err(SymmetryError::SingularSector { indexes });
            };
            lookup.insert(key, Sector(sectors.len() as u32));
            sectors.push(SectorData {
                indexes,
                matrix,
                inverse,
                perm_inv: perm.inverse(),
                perm,
                visible,
            });
        }

        let mut sym = Self {
            cfg,
            generators,
            sectors,
            lookup,
            combine: Vec::new(),
            invert: Vec::new(),
            collapsed,
        };
        sym.fill_tables();
        tracing::debug!(
            sectors = sym.num_sectors(),
            collapsed = sym.collapsed,
            generators = sym.generators.len(),
            "symmetry table built"
        );
        Ok(sym)
    }

    /// Group with a single sector (the identity).
    pub fn trivial() -> Self {
        Self {
            cfg: SymmetryCfg::default(),
            generators: Vec::new(),
            sectors: vec![SectorData {
                indexes: Vec::new(),
                matrix: Matrix4::identity(),
                inverse: Matrix4::identity(),
                perm: ColorPerm::identity(),
                perm_inv: ColorPerm::identity(),
                visible: true,
            }],
            lookup: HashMap::from([(
                quantize16(&Matrix4::identity(), SymmetryCfg::default().hash_eps),
                Sector::IDENTITY,
            )]),
            combine: vec![0],
            invert: vec![0],
            collapsed: 0,
        }
    }

    /// `n`-fold rotation about the z axis, shifting colors `0..n` cyclically.
    pub fn planar_rotation(n: u32) -> Result<Self, SymmetryError> {
        let cfg = SymmetryCfg::default();
        let g = Generator::finite(
            0,
            rotation(Vector3::z(), 2.0 * PI / n.max(1) as f64),
            ColorPerm::cyclic(n as usize),
            &cfg,
        )?;
        Self::new(vec![g], cfg)
    }

    fn fill_tables(&mut self) {
        let n = self.sectors.len();
        let mut combine = vec![NOT_FOUND; n * n];
        for a in 0..n {
            for b in 0..n {
                let m = self.sectors[a].matrix * self.sectors[b].matrix;
                if let Some(s) = self.sector_of(&m) {
                    combine[a * n + b] = s.0;
                }
            }
        }
        let invert = (0..n)
            .map(|a| {
                self.sector_of(&self.sectors[a].inverse)
                    .map_or(NOT_FOUND, |s| s.0)
            })
            .collect();
        self.combine = combine;
        self.invert = invert;
    }

    #[inline]
    pub fn num_sectors(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn identity(&self) -> Sector {
        Sector::IDENTITY
    }

    #[inline]
    pub fn cfg(&self) -> &SymmetryCfg {
        &self.cfg
    }

    #[inline]
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Number of index tuples that hashed onto an earlier sector.
    #[inline]
    pub fn collapsed(&self) -> usize {
        self.collapsed
    }

    /// Sector whose transform rounds to the same hash bucket as `m`.
    pub fn sector_of(&self, m: &Matrix4<f64>) -> Option<Sector> {
        self.lookup.get(&quantize16(m, self.cfg.hash_eps)).copied()
    }

    /// Sector of `M_a * M_b` (apply `b` first, then `a`).
    #[inline]
    pub fn combine(&self, a: Sector, b: Sector) -> Option<Sector> {
        let s = self.combine[a.index() * self.sectors.len() + b.index()];
        (s != NOT_FOUND).then_some(Sector(s))
    }

    #[inline]
    pub fn invert(&self, a: Sector) -> Option<Sector> {
        let s = self.invert[a.index()];
        (s != NOT_FOUND).then_some(Sector(s))
    }

    #[inline]
    pub fn matrix(&self, s: Sector) -> &Matrix4<f64> {
        &self.sectors[s.index()].matrix
    }

    #[inline]
    pub fn inverse_matrix(&self, s: Sector) -> &Matrix4<f64> {
        &self.sectors[s.index()].inverse
    }

    /// Position of a fundamental-domain point in sector `s`.
    #[inline]
    pub fn apply(&self, s: Sector, p: &Vector3<f64>) -> Vector3<f64> {
        apply_point(self.matrix(s), p)
    }

    /// Pull a point in sector `s` back into the fundamental domain.
    #[inline]
    pub fn unapply(&self, s: Sector, p: &Vector3<f64>) -> Vector3<f64> {
        apply_point(self.inverse_matrix(s), p)
    }

    /// Color seen in sector `s` for a base color.
    #[inline]
    pub fn map_color(&self, s: Sector, c: Color) -> Color {
        self.sectors[s.index()].perm.apply(c)
    }

    /// Base color that sector `s` displays as `c`.
    #[inline]
    pub fn unmap_color(&self, s: Sector, c: Color) -> Color {
        self.sectors[s.index()].perm_inv.apply(c)
    }

    #[inline]
    pub fn is_visible(&self, s: Sector) -> bool {
        self.sectors[s.index()].visible
    }

    /// Per-generator indices of the sector (first tuple that produced it).
    #[inline]
    pub fn indexes(&self, s: Sector) -> &[i32] {
        &self.sectors[s.index()].indexes
    }

    /// Display name: generator indices joined by `.`, empty for the identity.
    pub fn name(&self, s: Sector) -> String {
        if s == Sector::IDENTITY {
            return String::new();
        }
        self.indexes(s)
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn all_sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        (0..self.sectors.len() as u32).map(Sector)
    }

    pub fn visible_sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        self.all_sectors().filter(|&s| self.is_visible(s))
    }
}

/// Odometer over generator indices; the last generator varies fastest.
fn index_tuples(generators: &[Generator]) -> Vec<Vec<i32>> {
    let ranges: Vec<Vec<i32>> = generators.iter().map(|g| g.indices().collect()).collect();
    if ranges.iter().any(|r| r.is_empty()) {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut pos = vec![0usize; ranges.len()];
    loop {
        out.push(pos.iter().zip(&ranges).map(|(&p, r)| r[p]).collect());
        let mut i = ranges.len();
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            pos[i] += 1;
            if pos[i] < ranges[i].len() {
                break;
            }
            pos[i] = 0;
        }
    }
}
