//! Relaxation ticks and constraint derivation.

use std::sync::Arc;

use super::*;
use crate::dual::{BaseGraph, GraphCfg, VertexRef};
use crate::fixtures::{rotated_wheel, wheel};
use crate::geometry::Shape;
use crate::symmetry::Symmetry;
use crate::tile::{TileGraph, TileVertexRef};
use nalgebra::vector;

fn free_pair(dist: f64) -> TileGraph {
    let mut g = TileGraph::empty(Arc::new(Symmetry::trivial()), Shape::Plane, GraphCfg::default());
    g.add_vertex(vector![0.0, 0.0, 0.0]);
    g.add_vertex(vector![dist, 0.0, 0.0]);
    g
}

fn pair(keep_close: bool, keep_far: bool) -> Constraint {
    Constraint {
        a: TileVertexRef::base(0),
        b: TileVertexRef::base(1),
        keep_close,
        keep_far,
    }
}

fn separation(r: &Relaxation) -> f64 {
    let t = r.tiles();
    (t.pos(TileVertexRef::base(0)) - t.pos(TileVertexRef::base(1))).norm()
}

#[test]
fn keep_far_step_increases_separation() {
    let cfg = RelaxCfg {
        padding: 0.0,
        ..RelaxCfg::default()
    };
    let mut r = Relaxation::with_constraints(free_pair(0.5), cfg, vec![pair(false, true)]);
    let err = r.step(1);
    assert!((err - 0.5).abs() < 1e-12);
    // Each end moves 0.5 * 0.03 outward.
    assert!((separation(&r) - 0.53).abs() < 1e-12);
}

#[test]
fn keep_close_step_decreases_separation() {
    let mut r = Relaxation::with_constraints(free_pair(1.5), RelaxCfg::default(), vec![pair(true, false)]);
    r.step(1);
    assert!(separation(&r) < 1.5);
    assert!(r.padding_error() > 0.0);
}

#[test]
fn satisfied_constraints_leave_positions_alone() {
    let mut r = Relaxation::with_constraints(free_pair(2.0), RelaxCfg::default(), vec![pair(false, true)]);
    assert_eq!(r.step(10), 0.0);
    assert_eq!(separation(&r), 2.0);
    assert_eq!(r.padding_error(), 0.0);
}

#[test]
fn fixed_vertex_never_moves() {
    let mut r = Relaxation::with_constraints(free_pair(0.5), RelaxCfg::default(), vec![pair(false, true)]);
    r.set_fixed_vertex(Some(0));
    r.step(20);
    assert_eq!(r.tiles().vertices()[0].pos, vector![0.0, 0.0, 0.0]);
    assert!(r.tiles().vertices()[1].pos.x > 0.5);
}

#[test]
fn symmetric_vertices_never_move() {
    let sym = Arc::new(Symmetry::planar_rotation(3).unwrap());
    let mut g = TileGraph::empty(sym, Shape::Plane, GraphCfg::default());
    let center = g.add_vertex(vector![0.0, 0.0, 0.0]);
    let v = g.add_vertex(vector![0.4, 0.0, 0.0]);
    let c = Constraint {
        a: center,
        b: v,
        keep_close: false,
        keep_far: true,
    };
    let mut r = Relaxation::with_constraints(g, RelaxCfg::default(), vec![c]);
    r.jitter(7, 0.1);
    assert_eq!(r.tiles().vertices()[0].pos, vector![0.0, 0.0, 0.0]);
    r.step(50);
    assert_eq!(r.tiles().vertices()[0].pos, vector![0.0, 0.0, 0.0]);
    assert!(r.tiles().vertices()[1].pos.norm() > 0.4);
}

#[test]
fn velocities_follow_the_sector_frame() {
    // Corner 1 referenced through a 90 degree image: moving that image away
    // from corner 0 must move the stored corner consistently.
    let sym = Arc::new(Symmetry::planar_rotation(4).unwrap());
    let mut g = TileGraph::empty(sym, Shape::Plane, GraphCfg::default());
    let a = g.add_vertex(vector![0.0, 0.5, 0.0]);
    let b = g.add_vertex(vector![0.0, -0.3, 0.0]);
    // Image of `b` in sector 1 sits at (0.3, 0).
    let b1 = g.vref(b.index, crate::symmetry::Sector(1)).unwrap();
    let c = Constraint {
        a,
        b: b1,
        keep_close: false,
        keep_far: true,
    };
    let mut r = Relaxation::with_constraints(g, RelaxCfg::default(), vec![c]);
    let before = (r.tiles().pos(a) - r.tiles().pos(b1)).norm();
    r.step(1);
    let after = (r.tiles().pos(a) - r.tiles().pos(b1)).norm();
    assert!(after > before);
}

#[test]
fn quiet_constraints_are_throttled_then_resume() {
    let mut r = Relaxation::with_constraints(free_pair(2.0), RelaxCfg::default(), vec![pair(false, true)]);
    r.step(10);
    // Moving the pair together is caught at the next checked tick (index 0).
    r.tiles_mut().set_vertex_pos(TileVertexRef::base(1), vector![0.5, 0.0, 0.0]);
    r.step(10);
    assert!(separation(&r) > 0.5);
}

#[test]
fn derived_wheel_constraints_keep_tiles_together() {
    let tiles = TileGraph::build(&wheel());
    let cs = derive_constraints(&tiles, 5);
    assert!(!cs.is_empty());
    // Every color is distinct, so only keep-close constraints arise.
    assert!(cs.iter().all(|c| c.keep_close && !c.keep_far));
    // Corners of the quad tile pairwise share it.
    let quad: Vec<_> = tiles.tiles()[4].corners.clone();
    for (i, &p) in quad.iter().enumerate() {
        for &q in &quad[i + 1..] {
            assert!(
                cs.iter().any(|c| (c.a, c.b) == (p, q) || (c.a, c.b) == (q, p)),
                "missing {p:?}-{q:?}"
            );
        }
    }
    // Unordered pairs are unique.
    for (i, c) in cs.iter().enumerate() {
        assert!(cs[i + 1..].iter().all(|d| (d.a, d.b) != (c.a, c.b) && (d.a, d.b) != (c.b, c.a)));
    }
}

#[test]
fn same_colored_tiles_derive_keep_far() {
    let mut base = wheel();
    base.set_vertex_color(VertexRef::base(2), 0).unwrap();
    base.set_vertex_color(VertexRef::base(3), 1).unwrap();
    let tiles = TileGraph::build(&base);
    let cs = derive_constraints(&tiles, 5);
    // Opposite triangles share the quad but touch different tiles of color 0.
    assert!(cs.iter().any(|c| c.keep_far && c.keep_close));
    assert!(cs.iter().any(|c| !c.keep_far));
}

#[test]
fn symmetric_wheel_relaxes_without_moving_the_fixed_corner() {
    let tiles = TileGraph::build(&rotated_wheel());
    let mut r = Relaxation::new(tiles, RelaxCfg::default());
    assert!(r.constraints().count() > 0);
    let outer = r.tiles().vertices()[1].pos;
    r.step(100);
    assert_eq!(r.tiles().vertices()[1].pos, outer);
}

#[test]
fn boundary_pushes_perimeter_out() {
    let mut g = free_pair(3.0);
    g.set_perimeter(1, true, false);
    let mut r = Relaxation::with_constraints(g, RelaxCfg::default(), Vec::new());
    r.set_boundary(Boundary {
        outer_radius: Some(5.0),
        ..Boundary::default()
    });
    let err = r.step(1);
    assert!((err - 2.0).abs() < 1e-12);
    assert!((r.tiles().vertices()[1].pos.x - (3.0 + 2.0 * 0.03)).abs() < 1e-12);
    // Corner 0 is not on the perimeter.
    assert_eq!(r.tiles().vertices()[0].pos, vector![0.0, 0.0, 0.0]);
}

#[test]
fn inner_boundary_pulls_perimeter_in() {
    let mut g = free_pair(3.0);
    g.set_perimeter(1, false, true);
    let mut r = Relaxation::with_constraints(g, RelaxCfg::default(), Vec::new());
    r.set_boundary(Boundary {
        inner_radius: Some(2.0),
        // Ignored: corner 1 is not on the outer perimeter.
        outer_radius: Some(5.0),
        ..Boundary::default()
    });
    let err = r.step(1);
    assert!((err - 1.0).abs() < 1e-12);
    assert!((r.tiles().vertices()[1].pos.x - (3.0 - 0.03)).abs() < 1e-12);
    assert_eq!(r.tiles().vertices()[0].pos, vector![0.0, 0.0, 0.0]);
}

#[test]
fn strip_pushes_along_the_nearer_edge_by_the_larger_distance() {
    let mut g = TileGraph::empty(Arc::new(Symmetry::trivial()), Shape::Plane, GraphCfg::default());
    g.add_vertex(vector![0.5, 0.2, 0.0]);
    g.add_vertex(vector![1.8, -0.1, 0.0]);
    g.add_vertex(vector![3.0, 0.0, 0.0]);
    for i in 0..3 {
        g.set_perimeter(i, true, false);
    }
    let mut r = Relaxation::with_constraints(g, RelaxCfg::default(), Vec::new());
    r.set_boundary(Boundary {
        strip: Some((4.0, 3.0)),
        ..Boundary::default()
    });
    let err = r.step(1);
    // Corner 0: x gap 1.5, y gap 1.3. Corner 1: x gap 0.2, y gap 1.4.
    assert!((err - (1.5 + 1.4)).abs() < 1e-12);
    let v = r.tiles().vertices();
    assert!((v[0].pos - vector![0.5, 0.2 + 1.5 * 0.03, 0.0]).norm() < 1e-12);
    assert!((v[1].pos - vector![1.8 + 1.4 * 0.03, -0.1, 0.0]).norm() < 1e-12);
    // Already outside the strip.
    assert_eq!(v[2].pos, vector![3.0, 0.0, 0.0]);
}

#[test]
fn move_dual_to_centroids_recenters_base_vertices() {
    let mut base = wheel();
    let r = Relaxation::new(TileGraph::build(&base), RelaxCfg::default());
    r.move_dual_to_centroids(&mut base).unwrap();
    // The center tile is symmetric about the origin.
    assert!(base.vertices()[4].pos.norm() < 1e-12);
    let p0 = base.vertices()[0].pos;
    assert!((p0 - vector![1.0 / 9.0 * 2.0, 0.0, 0.0]).norm() < 1e-12);
}

#[test]
fn sphere_radius_change_reprojects_both_graphs() {
    let sym = Arc::new(Symmetry::trivial());
    let mut base = BaseGraph::new(sym, Shape::Sphere { radius: 1.0 });
    base.add_vertex(0, vector![0.0, 0.0, 1.0]).unwrap();
    let mut tiles = TileGraph::build(&base);
    tiles.add_vertex(vector![1.0, 0.0, 0.0]);
    let mut r = Relaxation::with_constraints(tiles, RelaxCfg::default(), Vec::new());
    r.set_radius(&mut base, 2.0);
    assert!((base.vertices()[0].pos.norm() - 2.0).abs() < 1e-12);
    assert!((r.tiles().vertices()[0].pos.norm() - 2.0).abs() < 1e-12);
}
