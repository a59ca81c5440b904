use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::fmt::SubscriberBuilder;

use snet::{
    active_selection_matrix, average_outer_edge_length, load_obj, save_obj, selection_radius,
    shortest_outer_edge_length, AnimateMode, MeshSelection, PolygonId, SurfaceNet,
    SurfaceNetConfig,
};

#[derive(Parser)]
#[command(name = "snet")]
#[command(about = "Grow surface nets and inspect mesh selections")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Instant,
    Redraw,
    Animate,
}

impl From<Mode> for AnimateMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Instant => AnimateMode::Instant,
            Mode::Redraw => AnimateMode::Redraw,
            Mode::Animate => AnimateMode::Animate,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Grow a surface net and write the result as OBJ
    Grow {
        /// JSON config; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        grid_size: Option<usize>,
        /// Seconds per full value swing of a cell
        #[arg(long)]
        grow_time: Option<f64>,
        #[arg(long, value_enum)]
        animate: Option<Mode>,
        /// Keep the grid origin instead of centring the mesh
        #[arg(long)]
        no_center: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print selection measurements for polygons of an OBJ file
    Inspect {
        #[arg(long)]
        input: PathBuf,
        /// Polygon indices to select, comma separated
        #[arg(long, value_delimiter = ',')]
        select: Vec<usize>,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Grow {
            config,
            grid_size,
            grow_time,
            animate,
            no_center,
            out,
        } => grow(config, grid_size, grow_time, animate, no_center, out),
        Action::Inspect { input, select } => inspect(input, select),
    }
}

fn grow(
    config_path: Option<PathBuf>,
    grid_size: Option<usize>,
    grow_time: Option<f64>,
    animate: Option<Mode>,
    no_center: bool,
    out: PathBuf,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => SurfaceNetConfig::from_json_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => SurfaceNetConfig::default(),
    };
    if let Some(n) = grid_size {
        config = config.grid_size(n);
    }
    if let Some(t) = grow_time {
        config = config.grow_time(t);
    }
    if let Some(mode) = animate {
        config = config.animate(mode.into());
    }
    if no_center {
        config = config.center_object(false);
    }
    tracing::info!(grid_size = config.grid_size, grow_time = config.grow_time, animate = ?config.animate, "grow");

    let started = Instant::now();
    let mut net = SurfaceNet::new(config)?;
    if net.config().animate == AnimateMode::Redraw {
        // No host scene to drive updates; replay its ticks at the increment rate.
        net.run_to_completion();
    }
    let mesh = net.to_mesh()?;
    save_obj(&mesh, &out).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(
        steps = net.steps(),
        polygons = mesh.polygons.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}

fn inspect(input: PathBuf, select: Vec<usize>) -> Result<()> {
    let mut mesh = load_obj(&input).with_context(|| format!("reading {}", input.display()))?;
    for &i in &select {
        if i >= mesh.polygons.len() {
            bail!("polygon {i} out of range (mesh has {})", mesh.polygons.len());
        }
        mesh.select_polygon(PolygonId::from(i));
    }

    let selection = MeshSelection::capture(&mesh);
    let basis = active_selection_matrix(&mesh);
    println!(
        "selected: {} vertices, {} edges, {} polygons",
        selection.vertices.len(),
        selection.edges.len(),
        selection.polygons.len()
    );
    println!("basis:{basis}");
    println!("radius: {}", selection_radius(&mesh));
    match shortest_outer_edge_length(&mesh) {
        Some(len) => println!("shortest outer edge: {len}"),
        None => println!("shortest outer edge: none"),
    }
    println!("average outer edge: {}", average_outer_edge_length(&mesh));
    Ok(())
}
