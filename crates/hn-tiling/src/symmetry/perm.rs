//! Color permutations induced by symmetry generators.

use super::types::{Color, SymmetryError};

/// Permutation of the colors `0..n`; colors outside that range (including
/// `BLANK`) are fixed.
///
/// Invariants:
/// - `map` is a bijection on `0..map.len()`; the empty map is the identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorPerm {
    map: Vec<usize>,
}

impl ColorPerm {
    #[inline]
    pub fn identity() -> Self {
        Self { map: Vec::new() }
    }

    /// Validate that `map` is a bijection on `0..map.len()`.
    pub fn new(map: Vec<usize>) -> Result<Self, SymmetryError> {
        let mut seen = vec![false; map.len()];
        for &c in &map {
            if c >= map.len() {
                return Err(SymmetryError::InvalidPerm {
                    reason: format!("image {c} out of range 0..{}", map.len()),
                });
            }
            if std::mem::replace(&mut seen[c], true) {
                return Err(SymmetryError::InvalidPerm {
                    reason: format!("image {c} appears twice"),
                });
            }
        }
        Ok(Self { map })
    }

    /// Cyclic shift `c ↦ c + 1 (mod n)` on the first `n` colors.
    pub fn cyclic(n: usize) -> Self {
        Self {
            map: (0..n).map(|c| (c + 1) % n).collect(),
        }
    }

    #[inline]
    pub fn apply(&self, c: Color) -> Color {
        match usize::try_from(c) {
            Ok(i) if i < self.map.len() => self.map[i] as Color,
            _ => c,
        }
    }

    /// `self ∘ inner`: first `inner`, then `self` (same order as matrix products).
    pub fn compose(&self, inner: &ColorPerm) -> ColorPerm {
        let n = self.map.len().max(inner.map.len());
        let map = (0..n)
            .map(|c| self.apply(inner.apply(c as Color)) as usize)
            .collect();
        ColorPerm { map }
    }

    pub fn inverse(&self) -> ColorPerm {
        let mut map = vec![0; self.map.len()];
        for (c, &img) in self.map.iter().enumerate() {
            map[img] = c;
        }
        ColorPerm { map }
    }

    /// `self^k`; negative powers use the inverse.
    pub fn pow(&self, k: i32) -> ColorPerm {
        let base = if k < 0 { self.inverse() } else { self.clone() };
        let mut out = ColorPerm::identity();
        for _ in 0..k.unsigned_abs() {
            out = base.compose(&out);
        }
        out
    }

    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(c, &img)| c == img)
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }
}
