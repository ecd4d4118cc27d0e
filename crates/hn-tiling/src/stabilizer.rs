//! Orbit canonicalization of a single point under a symmetry table.
//!
//! For a point `p`, two sectors are equivalent when they send `p` to the same
//! place. `canonical(s)` is the least equivalent sector, `fixing()` lists the
//! sectors equivalent to the identity (the stabilizer proper), and `unique()`
//! lists one representative per distinct image of `p`.

use nalgebra::Vector3;

use crate::symmetry::{Sector, Symmetry};

#[derive(Clone, Debug)]
pub struct Stabilizer {
    canonical: Vec<Sector>,
    fixing: Vec<Sector>,
    unique: Vec<Sector>,
}

impl Stabilizer {
    /// Stabilizer of `pos`; images closer than `sqrt(eps2)` count as equal.
    pub fn new(sym: &Symmetry, pos: &Vector3<f64>, eps2: f64) -> Self {
        let images: Vec<Vector3<f64>> = sym.all_sectors().map(|s| sym.apply(s, pos)).collect();
        let mut canonical = Vec::with_capacity(images.len());
        for (i, img) in images.iter().enumerate() {
            let k = images[..i]
                .iter()
                .position(|other| (other - img).norm_squared() < eps2)
                .unwrap_or(i);
            // Indices below `i` were already resolved to their own least representative.
            canonical.push(if k < i { canonical[k] } else { Sector(i as u32) });
        }
        let fixing = (0..canonical.len())
            .filter(|&i| canonical[i] == Sector::IDENTITY)
            .map(|i| Sector(i as u32))
            .collect();
        let unique = (0..canonical.len())
            .filter(|&i| canonical[i].index() == i)
            .map(|i| Sector(i as u32))
            .collect();
        Self {
            canonical,
            fixing,
            unique,
        }
    }

    /// Stabilizer of a point with no symmetry (every sector is its own class).
    pub fn free(num_sectors: usize) -> Self {
        let all: Vec<Sector> = (0..num_sectors as u32).map(Sector).collect();
        Self {
            canonical: all.clone(),
            fixing: vec![Sector::IDENTITY],
            unique: all,
        }
    }

    #[inline]
    pub fn canonical(&self, s: Sector) -> Sector {
        self.canonical[s.index()]
    }

    /// Sectors fixing the point (always contains the identity).
    #[inline]
    pub fn fixing(&self) -> &[Sector] {
        &self.fixing
    }

    /// One sector per distinct image of the point.
    #[inline]
    pub fn unique(&self) -> &[Sector] {
        &self.unique
    }

    /// True if some non-identity sector fixes the point.
    #[inline]
    pub fn has_symmetry(&self) -> bool {
        self.fixing.len() > 1
    }
}
