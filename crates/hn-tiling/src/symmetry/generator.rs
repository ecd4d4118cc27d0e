//! Cyclic symmetry generators (finite order or windowed-infinite).

use nalgebra::Matrix4;

use super::perm::ColorPerm;
use super::types::{SymmetryCfg, SymmetryError, MAX_SECTORS};
use crate::geometry::approx_eq;

/// A rigid transform plus its induced color permutation, iterated over `[lo, hi)`.
///
/// Invariants:
/// - Finite generators cover `[0, order)` and are fully visible.
/// - Infinite generators cover the caller's visible window padded by
///   `SymmetryCfg::window_margin` on both sides.
/// - `powers[k - lo]` caches `matrix^k`, `perm_powers[k - lo]` caches `perm^k`.
#[derive(Clone, Debug)]
pub struct Generator {
    matrix: Matrix4<f64>,
    perm: ColorPerm,
    window: Option<(i32, i32)>,
    order: Option<u32>,
    lo: i32,
    hi: i32,
    visible: (i32, i32),
    powers: Vec<Matrix4<f64>>,
    perm_powers: Vec<ColorPerm>,
}

impl Generator {
    /// Build a generator; `window` is only consulted when the order is infinite.
    ///
    /// `id` is the generator's position in the composite (used in errors only).
    pub fn new(
        id: usize,
        matrix: Matrix4<f64>,
        perm: ColorPerm,
        window: Option<(i32, i32)>,
        cfg: &SymmetryCfg,
    ) -> Result<Self, SymmetryError> {
        let order = detect_order(&matrix, cfg);
        let (lo, hi, visible) = match order {
            Some(n) => {
                if !perm.pow(n as i32).is_identity() {
                    return Err(SymmetryError::PermOrderMismatch {
                        generator: id,
                        order: n,
                    });
                }
                (0, n as i32, (0, n as i32))
            }
            None => {
                let (vlo, vhi) =
                    window.ok_or(SymmetryError::InfiniteWithoutWindow { generator: id })?;
                if vlo >= vhi {
                    return Err(SymmetryError::EmptyWindow {
                        generator: id,
                        lo: vlo,
                        hi: vhi,
                    });
                }
                let m = cfg.window_margin.max(0);
                let (plo, phi) = vlo
                    .checked_sub(m)
                    .zip(vhi.checked_add(m))
                    .ok_or(SymmetryError::WindowOutOfRange {
                        generator: id,
                        lo: vlo,
                        hi: vhi,
                    })?;
                // Index 0 always exists so the identity is representable.
                (plo.min(0), phi.max(1), (vlo, vhi))
            }
        };
        let span = i64::from(hi) - i64::from(lo);
        if span > MAX_SECTORS as i64 {
            return Err(SymmetryError::TooManySectors {
                count: usize::try_from(span).unwrap_or(usize::MAX),
                max: MAX_SECTORS,
            });
        }

        // lo <= 0 < hi; walk up from the identity, then down with the inverse.
        let zero = (-lo) as usize;
        let mut powers = vec![Matrix4::identity(); span as usize];
        let mut perm_powers = vec![ColorPerm::identity(); span as usize];
        for i in zero + 1..powers.len() {
            powers[i] = matrix * powers[i - 1];
            perm_powers[i] = perm.compose(&perm_powers[i - 1]);
        }
        if zero > 0 {
            let inverse = matrix
                .try_inverse()
                .ok_or(SymmetryError::SingularTransform { generator: id })?;
            let perm_inverse = perm.inverse();
            for i in (0..zero).rev() {
                powers[i] = inverse * powers[i + 1];
                perm_powers[i] = perm_inverse.compose(&perm_powers[i + 1]);
            }
        }
        Ok(Self {
            matrix,
            perm,
            window,
            order,
            lo,
            hi,
            visible,
            powers,
            perm_powers,
        })
    }

    /// Finite generator; errors if the transform has no order below the cap.
    pub fn finite(
        id: usize,
        matrix: Matrix4<f64>,
        perm: ColorPerm,
        cfg: &SymmetryCfg,
    ) -> Result<Self, SymmetryError> {
        Self::new(id, matrix, perm, None, cfg)
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }
    #[inline]
    pub fn perm(&self) -> &ColorPerm {
        &self.perm
    }
    /// Caller-supplied visible window (as given, before padding).
    #[inline]
    pub fn window(&self) -> Option<(i32, i32)> {
        self.window
    }
    #[inline]
    pub fn order(&self) -> Option<u32> {
        self.order
    }
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.order.is_some()
    }
    #[inline]
    pub fn lo(&self) -> i32 {
        self.lo
    }
    #[inline]
    pub fn hi(&self) -> i32 {
        self.hi
    }
    #[inline]
    pub fn len(&self) -> usize {
        (self.hi - self.lo) as usize
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }
    #[inline]
    pub fn is_visible(&self, k: i32) -> bool {
        self.visible.0 <= k && k < self.visible.1
    }

    /// Indices in enumeration order: `0, 1, .., hi-1, -1, -2, .., lo`.
    ///
    /// Putting 0 first makes the all-zero tuple (the identity) sector 0.
    pub fn indices(&self) -> impl Iterator<Item = i32> + '_ {
        (0.max(self.lo)..self.hi).chain((self.lo..0.min(self.hi)).rev())
    }

    /// `matrix^k` for `k` in `[lo, hi)`.
    #[inline]
    pub fn power(&self, k: i32) -> &Matrix4<f64> {
        &self.powers[(k - self.lo) as usize]
    }

    /// `perm^k` for `k` in `[lo, hi)`.
    #[inline]
    pub fn perm_power(&self, k: i32) -> &ColorPerm {
        &self.perm_powers[(k - self.lo) as usize]
    }
}

/// Smallest `n <= order_cap` with `matrix^n ≈ I`, if any.
fn detect_order(matrix: &Matrix4<f64>, cfg: &SymmetryCfg) -> Option<u32> {
    let id = Matrix4::identity();
    let mut m = *matrix;
    let mut n = 1;
    while !approx_eq(&m, &id, cfg.eq_eps) {
        if n >= cfg.order_cap {
            return None;
        }
        m = matrix * m;
        n += 1;
    }
    Some(n)
}
