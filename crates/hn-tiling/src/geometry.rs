//! Rigid transforms in homogeneous coordinates and the embedding surface.
//!
//! - Transforms are `Matrix4<f64>` acting on `[x, y, z, 1]`; directions use `w = 0`.
//! - `Shape` decouples stored coordinates from the surface the graph lives on
//!   (the plane `z = 0`, or a sphere of given radius about the origin).
//!
//! Code cross-refs: `symmetry::Symmetry` (sector matrices), `dual::BaseGraph` and
//! `tile::TileGraph` (re-projection after edits and relaxation ticks).

use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};

/// Apply a homogeneous transform to a point.
#[inline]
pub fn apply_point(m: &Matrix4<f64>, p: &Vector3<f64>) -> Vector3<f64> {
    let r = m * Vector4::new(p.x, p.y, p.z, 1.0);
    Vector3::new(r.x, r.y, r.z)
}

/// Apply the linear part of a homogeneous transform to a direction.
#[inline]
pub fn apply_dir(m: &Matrix4<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    let r = m * Vector4::new(v.x, v.y, v.z, 0.0);
    Vector3::new(r.x, r.y, r.z)
}

/// Entrywise (max-abs) comparison.
#[inline]
pub fn approx_eq(a: &Matrix4<f64>, b: &Matrix4<f64>, eps: f64) -> bool {
    (a - b).amax() <= eps
}

/// Round every entry to a multiple of `step`; equal keys mean "same transform".
pub fn quantize16(m: &Matrix4<f64>, step: f64) -> [i64; 16] {
    let s = 1.0 / step;
    let mut key = [0i64; 16];
    for r in 0..4 {
        for c in 0..4 {
            key[4 * r + c] = (m[(r, c)] * s).round() as i64;
        }
    }
    key
}

/// `m^k`; negative powers go through the inverse. `None` if `m` is singular.
pub fn matrix_pow(m: &Matrix4<f64>, k: i32) -> Option<Matrix4<f64>> {
    let base = if k < 0 { m.try_inverse()? } else { *m };
    let mut out = Matrix4::identity();
    for _ in 0..k.unsigned_abs() {
        out = base * out;
    }
    Some(out)
}

#[inline]
pub fn translation(t: Vector3<f64>) -> Matrix4<f64> {
    Matrix4::new_translation(&t)
}

/// Rotation by `angle` (radians, right-handed) about `axis` through the origin.
#[inline]
pub fn rotation(axis: Vector3<f64>, angle: f64) -> Matrix4<f64> {
    Matrix4::from_axis_angle(&Unit::new_normalize(axis), angle)
}

/// Linear map sending the columns `a` to the columns `b` (3 vectors each).
///
/// Returns `None` if the `a` frame is degenerate.
pub fn frame_map(a: [Vector3<f64>; 3], b: [Vector3<f64>; 3]) -> Option<Matrix4<f64>> {
    let ma = Matrix3::from_columns(&a);
    let mb = Matrix3::from_columns(&b);
    let lin = mb * ma.try_inverse()?;
    Some(lin.to_homogeneous())
}

pub fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    if points.is_empty() {
        return Vector3::zeros();
    }
    let sum: Vector3<f64> = points.iter().sum();
    sum / points.len() as f64
}

/// Surface on which graph vertices live.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// The plane `z = 0`, normal `+z`.
    Plane,
    /// Sphere about the origin.
    Sphere { radius: f64 },
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Plane
    }
}

impl Shape {
    /// Closest point on the surface (radial projection for the sphere).
    pub fn to_surface(&self, p: &Vector3<f64>) -> Vector3<f64> {
        match *self {
            Shape::Plane => Vector3::new(p.x, p.y, 0.0),
            Shape::Sphere { radius } => match p.try_normalize(f64::EPSILON) {
                Some(u) => u * radius,
                None => Vector3::new(0.0, 0.0, radius),
            },
        }
    }

    /// Outward unit normal at a surface point.
    pub fn normal_at(&self, p: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Shape::Plane => Vector3::z(),
            Shape::Sphere { .. } => p.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z),
        }
    }

    /// Right-handed orthonormal tangent basis `(u, w)` at `p`, with `u × w = normal`.
    ///
    /// On the plane this is the standard `(x, y)` pair so angles match the usual
    /// counterclockwise convention.
    pub fn tangent_basis(&self, p: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
        let n = self.normal_at(p);
        if let Shape::Plane = self {
            return (Vector3::x(), Vector3::y());
        }
        // Seed with the axis least aligned with n.
        let seed = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
            Vector3::x()
        } else if n.y.abs() <= n.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = (seed - n * n.dot(&seed)).normalize();
        let w = n.cross(&u);
        (u, w)
    }

    /// Counterclockwise angle of `q` around `center`, measured in the tangent plane at `center`.
    pub fn tangent_angle(&self, center: &Vector3<f64>, q: &Vector3<f64>) -> f64 {
        let n = self.normal_at(center);
        let (u, w) = self.tangent_basis(center);
        let d = q - center;
        let d = d - n * n.dot(&d);
        d.dot(&w).atan2(d.dot(&u))
    }

    /// Radius for the sphere; `None` for the plane.
    pub fn radius(&self) -> Option<f64> {
        match *self {
            Shape::Plane => None,
            Shape::Sphere { radius } => Some(radius),
        }
    }

    /// Changes the sphere radius; no effect on the plane.
    pub fn set_radius(&mut self, r: f64) {
        if let Shape::Sphere { radius } = self {
            *radius = r;
        }
    }
}
