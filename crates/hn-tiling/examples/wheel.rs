//! Seed a 4-fold symmetric wheel, check it, build its tiles, and relax.
//!
//! Usage:
//!   cargo run -p hn-tiling --example wheel
//!   cargo run -p hn-tiling --example wheel -- 500
//!
//! Prints the check result, tile and corner counts, then the mean error of a
//! few relaxation batches (the optional argument is the total tick count).

use std::sync::Arc;

use hn_tiling::api::{
    check, tile_doc, BaseGraph, RelaxCfg, Relaxation, Sector, Shape, Symmetry, TileGraph,
};
use nalgebra::Vector3;

fn main() {
    let ticks: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);

    let sym = Arc::new(Symmetry::planar_rotation(4).expect("4-fold rotation"));
    let mut g = BaseGraph::new(sym, Shape::Plane);
    let center = g.add_vertex(4, Vector3::zeros()).expect("center");
    let ring = g.add_vertex(0, Vector3::new(1.0, 0.0, 0.0)).expect("ring");
    let next = g.vref(ring.index, Sector(1)).expect("sector 1");
    g.toggle_edge(center, ring).expect("spoke");
    g.toggle_edge(ring, next).expect("rim");

    println!("check: {}", check(&g));
    let tiles = TileGraph::build(&g);
    println!(
        "tiles: {} stored ({} visible), corners: {} stored ({} visible)",
        tiles.num_tiles(),
        tiles.all_tiles().len(),
        tiles.num_vertices(),
        tiles.all_vertices().len()
    );
    println!(
        "{}",
        serde_json::to_string(&tile_doc(&tiles)).expect("tile summary")
    );

    let mut relax = Relaxation::new(tiles, RelaxCfg::default());
    println!("constraints: {}", relax.constraints().count());
    let batch = (ticks / 4).max(1);
    for k in 0..4 {
        let err = relax.step(batch);
        println!("batch {k}: error {err:.6}, padding {:.6}", relax.padding_error());
    }
}
