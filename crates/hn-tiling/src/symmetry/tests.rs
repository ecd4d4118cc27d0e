//! Group-law and construction tests for the sector table.

use super::*;
use crate::geometry::{apply_point, rotation, translation};
use nalgebra::{vector, Matrix4, Vector3};
use proptest::prelude::*;
use std::f64::consts::PI;

fn strip_group() -> Symmetry {
    // 4-fold rotation times a windowed x translation.
    let cfg = SymmetryCfg::default();
    let rot = Generator::finite(
        0,
        rotation(Vector3::z(), PI / 2.0),
        ColorPerm::cyclic(4),
        &cfg,
    )
    .unwrap();
    let shift = Generator::new(
        1,
        translation(vector![10.0, 0.0, 0.0]),
        ColorPerm::identity(),
        Some((-1, 2)),
        &cfg,
    )
    .unwrap();
    Symmetry::new(vec![rot, shift], cfg).unwrap()
}

#[test]
fn trivial_has_only_identity() {
    let s = Symmetry::trivial();
    assert_eq!(s.num_sectors(), 1);
    assert_eq!(s.combine(Sector(0), Sector(0)), Some(Sector(0)));
    assert_eq!(s.invert(Sector(0)), Some(Sector(0)));
    assert_eq!(s.sector_of(&Matrix4::identity()), Some(Sector::IDENTITY));
    assert_eq!(s.name(Sector(0)), "");
}

#[test]
fn planar_rotation_table() {
    let s = Symmetry::planar_rotation(6).unwrap();
    assert_eq!(s.num_sectors(), 6);
    assert_eq!(s.combine(Sector(2), Sector(3)), Some(Sector(5)));
    assert_eq!(s.combine(Sector(4), Sector(5)), Some(Sector(3)));
    assert_eq!(s.invert(Sector(1)), Some(Sector(5)));
    assert_eq!(s.map_color(Sector(2), 5), 1);
    assert_eq!(s.unmap_color(Sector(2), 1), 5);
    assert_eq!(s.map_color(Sector(2), 9), 9);
    assert_eq!(s.map_color(Sector(2), BLANK), BLANK);
    assert_eq!(s.name(Sector(3)), "3");
    let p = s.apply(Sector(1), &vector![1.0, 0.0, 0.0]);
    assert!((p - vector![0.5, 3f64.sqrt() / 2.0, 0.0]).norm() < 1e-12);
    assert!((s.unapply(Sector(1), &p) - vector![1.0, 0.0, 0.0]).norm() < 1e-12);
}

#[test]
fn unknown_transform_is_not_found() {
    let s = Symmetry::planar_rotation(4).unwrap();
    let m = rotation(Vector3::z(), PI / 3.0);
    assert_eq!(s.sector_of(&m), None);
    let far = translation(vector![5.0, 0.0, 0.0]);
    assert_eq!(s.sector_of(&far), None);
}

#[test]
fn windowed_translation_sectors_and_visibility() {
    let s = strip_group();
    // 4 rotations times indices -2..3.
    assert_eq!(s.num_sectors(), 20);
    assert_eq!(s.collapsed(), 0);
    let visible = s.visible_sectors().count();
    assert_eq!(visible, 4 * 3);
    // Shifting past the padded window falls off the table.
    let last = s
        .all_sectors()
        .find(|&x| s.indexes(x) == [0, 2])
        .unwrap();
    assert!(!s.is_visible(last));
    assert_eq!(s.combine(last, last), None);
    let back = s.invert(last).unwrap();
    assert_eq!(s.indexes(back), [0, -2]);
    assert_eq!(s.name(last), "0.2");
}

#[test]
fn duplicate_transforms_collapse() {
    let cfg = SymmetryCfg::default();
    let a = Generator::finite(0, rotation(Vector3::z(), PI / 2.0), ColorPerm::identity(), &cfg)
        .unwrap();
    let b = Generator::finite(1, rotation(Vector3::z(), PI), ColorPerm::identity(), &cfg).unwrap();
    let s = Symmetry::new(vec![a, b], cfg).unwrap();
    assert_eq!(s.num_sectors(), 4);
    assert_eq!(s.collapsed(), 4);
}

#[test]
fn too_many_sectors_is_an_error() {
    let cfg = SymmetryCfg::default();
    let gens: Vec<_> = (0..4)
        .map(|i| {
            Generator::finite(i, rotation(Vector3::z(), 2.0 * PI / 7.0), ColorPerm::identity(), &cfg)
                .unwrap()
        })
        .collect();
    match Symmetry::new(gens, cfg) {
        Err(SymmetryError::TooManySectors { count, .. }) => assert_eq!(count, 7 * 7 * 7 * 7),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn singular_composite_reports_its_indexes() {
    // A projection never returns to the identity, so it needs a window.
    let cfg = SymmetryCfg {
        window_margin: 0,
        ..SymmetryCfg::default()
    };
    let flatten = Matrix4::from_diagonal(&nalgebra::vector![1.0, 1.0, 0.0, 1.0]);
    let g = Generator::new(0, flatten, ColorPerm::identity(), Some((0, 2)), &cfg).unwrap();
    assert_eq!(
        Symmetry::new(vec![g], cfg).unwrap_err(),
        SymmetryError::SingularSector { indexes: vec![1] }
    );
}

#[test]
fn icosahedral_group_is_closed() {
    let s = Symmetry::icosahedral().unwrap();
    assert_eq!(s.num_sectors(), 60);
    for a in s.all_sectors() {
        assert_eq!(s.combine(a, s.invert(a).unwrap()), Some(Sector::IDENTITY));
        for b in s.all_sectors() {
            assert!(s.combine(a, b).is_some());
        }
    }
    // Rotations keep the unit sphere and its vertex set.
    let verts = icosahedron_vertices();
    for x in s.all_sectors() {
        let img = apply_point(s.matrix(x), &verts[0]);
        assert!(verts.iter().any(|v| (v - img).norm() < 1e-9));
    }
    assert_eq!(legacy_sector(20), Some(Sector(5)));
    assert_eq!(legacy_sector(15), None);
}

#[test]
fn icosahedral_colors_follow_composition() {
    let s = Symmetry::icosahedral().unwrap();
    for a in s.all_sectors() {
        for b in s.all_sectors() {
            let ab = s.combine(a, b).unwrap();
            for c in 0..10 {
                assert_eq!(s.map_color(ab, c), s.map_color(a, s.map_color(b, c)));
            }
        }
    }
}

proptest! {
    #[test]
    fn group_laws_planar(n in 1u32..9, a in 0u32..64, b in 0u32..64, c in 0u32..64) {
        let s = Symmetry::planar_rotation(n).unwrap();
        let (a, b, c) = (Sector(a % n), Sector(b % n), Sector(c % n));
        let ab = s.combine(a, b).unwrap();
        let bc = s.combine(b, c).unwrap();
        prop_assert_eq!(s.combine(ab, c), s.combine(a, bc));
        prop_assert_eq!(s.combine(a, s.invert(a).unwrap()), Some(Sector::IDENTITY));
        prop_assert_eq!(s.combine(Sector::IDENTITY, a), Some(a));
    }

    #[test]
    fn group_laws_icosahedral(a in 0u32..60, b in 0u32..60, c in 0u32..60) {
        let s = Symmetry::icosahedral().unwrap();
        let (a, b, c) = (Sector(a), Sector(b), Sector(c));
        let ab = s.combine(a, b).unwrap();
        let bc = s.combine(b, c).unwrap();
        prop_assert_eq!(s.combine(ab, c), s.combine(a, bc));
    }
}
