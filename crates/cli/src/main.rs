use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hn_tiling::api::{
    check, load_str, save_string, tile_doc, BaseGraph, Boundary, RelaxCfg, Relaxation, TileGraph,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "hn")]
#[command(about = "Check, tile and relax symmetric colored graphs")]
struct Cmd {
    /// Log at DEBUG instead of INFO
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Validate the coloring and drawability of a graph document
    Check {
        #[arg(long)]
        input: PathBuf,
    },
    /// Build the tile graph and write its summary
    Tiles {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Relax tile corners and write the resulting tile summary
    Relax(RelaxArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Serialize)]
struct RelaxArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// Also write the base graph with every vertex moved to its tile centroid
    #[arg(long)]
    dual_out: Option<PathBuf>,
    #[arg(long, default_value_t = 1000)]
    steps: usize,
    /// Ticks per batch; the tolerance is tested after each batch
    #[arg(long, default_value_t = 100)]
    batch: usize,
    #[arg(long, default_value_t = 0.0)]
    tolerance: f64,
    #[arg(long, default_value_t = RelaxCfg::default().gain)]
    gain: f64,
    #[arg(long, default_value_t = RelaxCfg::default().padding)]
    padding: f64,
    #[arg(long, default_value_t = RelaxCfg::default().tile_diameter)]
    tile_diameter: f64,
    #[arg(long, default_value_t = RelaxCfg::default().target_distance)]
    target_distance: f64,
    #[arg(long, default_value_t = RelaxCfg::default().search_depth)]
    search_depth: usize,
    /// Jitter free corners before relaxing (reproducible per seed)
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 0.01)]
    jitter: f64,
    #[arg(long)]
    outer_radius: Option<f64>,
    #[arg(long)]
    inner_radius: Option<f64>,
    /// Rectangular strip boundary as WIDTH,HEIGHT
    #[arg(long, value_delimiter = ',', num_args = 2)]
    strip: Option<Vec<f64>>,
    /// Pin one stored tile corner in place
    #[arg(long)]
    fix_vertex: Option<usize>,
}

impl RelaxArgs {
    fn cfg(&self) -> RelaxCfg {
        RelaxCfg {
            gain: self.gain,
            padding: self.padding,
            tile_diameter: self.tile_diameter,
            target_distance: self.target_distance,
            search_depth: self.search_depth,
        }
    }

    fn boundary(&self) -> Result<Boundary> {
        let strip = match self.strip.as_deref() {
            None => None,
            Some(&[w, h]) => Some((w, h)),
            Some(other) => bail!("--strip expects WIDTH,HEIGHT, got {other:?}"),
        };
        Ok(Boundary {
            outer_radius: self.outer_radius,
            inner_radius: self.inner_radius,
            strip,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport {
    valid: bool,
    message: String,
    error_vertices: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelaxReport {
    steps_run: usize,
    error: f64,
    padding_error: f64,
    constraints: usize,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    dispatch(cmd.action)
}

fn dispatch(action: Action) -> Result<()> {
    match action {
        Action::Check { input } => {
            let report = check_graph(&input)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.valid {
                bail!("{} is invalid: {}", input.display(), report.message);
            }
            Ok(())
        }
        Action::Tiles { input, out } => tiles(&input, &out),
        Action::Relax(args) => relax(&args).map(|_| ()),
        Action::Report => report(),
    }
}

fn load_graph(path: &Path) -> Result<BaseGraph> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    load_str(&text).with_context(|| format!("loading graph document {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn check_graph(input: &Path) -> Result<CheckReport> {
    let g = load_graph(input)?;
    let result = check(&g);
    tracing::info!(input = %input.display(), valid = result.valid, "check");
    Ok(CheckReport {
        valid: result.valid,
        message: result.message,
        error_vertices: result.error_vertices.iter().map(|&r| g.name(r)).collect(),
    })
}

fn tiles(input: &Path, out: &Path) -> Result<()> {
    let g = load_graph(input)?;
    let t = TileGraph::build(&g);
    tracing::info!(
        tiles = t.num_tiles(),
        corners = t.num_vertices(),
        out = %out.display(),
        "tiles"
    );
    write_text(out, &serde_json::to_string_pretty(&tile_doc(&t))?)?;
    let payload = Payload::new(serde_json::json!({ "command": "tiles" }))
        .with_input(input.to_string_lossy());
    write_sidecar(out, payload)?;
    Ok(())
}

fn relax(args: &RelaxArgs) -> Result<RelaxReport> {
    if args.batch == 0 {
        bail!("--batch must be positive");
    }
    let mut base = load_graph(&args.input)?;
    let mut r = Relaxation::new(TileGraph::build(&base), args.cfg());
    r.set_boundary(args.boundary()?);
    r.set_fixed_vertex(args.fix_vertex);
    if let Some(seed) = args.seed {
        r.jitter(seed, args.jitter);
    }

    let (mut done, mut error) = (0usize, 0.0);
    while done < args.steps {
        let n = args.batch.min(args.steps - done);
        error = r.step(n);
        done += n;
        if error <= args.tolerance {
            break;
        }
    }
    let summary = RelaxReport {
        steps_run: done,
        error,
        padding_error: r.padding_error(),
        constraints: r.constraints().count(),
    };
    tracing::info!(
        steps = summary.steps_run,
        error = summary.error,
        out = %args.out.display(),
        "relax done"
    );

    write_text(&args.out, &serde_json::to_string_pretty(&tile_doc(r.tiles()))?)?;
    let params = serde_json::json!({
        "command": "relax",
        "args": serde_json::to_value(args)?,
        "result": serde_json::to_value(&summary)?,
    });
    let input = args.input.to_string_lossy();
    write_sidecar(&args.out, Payload::new(params.clone()).with_input(input.clone()))?;

    if let Some(dual_out) = &args.dual_out {
        r.move_dual_to_centroids(&mut base)
            .context("moving base vertices to tile centroids")?;
        write_text(dual_out, &save_string(&base)?)?;
        write_sidecar(dual_out, Payload::new(params).with_input(input))?;
    }
    Ok(summary)
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": hn_tiling::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
