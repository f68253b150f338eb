//! wingloop CLI - inspect, subdivide and flatten closed triangle meshes.
//!
//! Usage: wingloop <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `wingloop --help` for available commands. Set `RUST_LOG=debug` for
//! build and subdivision summaries.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use wingloop::algo::subdivide::{loop_subdivide_with_progress, EvenStencil, SubdivideOptions};
use wingloop::algo::Progress;
use wingloop::io;
use wingloop::mesh::WingedMesh;
use wingloop::render::{as_bytes, flatten, FlatVertex, Smoothing};

#[derive(Parser)]
#[command(name = "wingloop")]
#[command(author, version, about = "Winged-edge Loop subdivision CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Subdivide a closed triangle mesh
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Ring used to reposition original vertices
        #[arg(short, long, value_enum, default_value = "original")]
        stencil: StencilArg,
    },

    /// Write the render vertex stream as raw bytes
    Flatten {
        /// Input mesh file
        input: PathBuf,

        /// Output stream file
        output: PathBuf,

        /// Number of subdivision iterations before flattening
        #[arg(short, long, default_value = "0")]
        iterations: usize,

        /// Use vertex normals instead of face normals
        #[arg(long)]
        smooth: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StencilArg {
    /// Classical Loop: neighbors from the mesh before the split
    Original,
    /// Neighbors from the refined mesh (inserted vertices only)
    Refined,
}

impl From<StencilArg> for EvenStencil {
    fn from(arg: StencilArg) -> Self {
        match arg {
            StencilArg::Original => EvenStencil::OriginalRing,
            StencilArg::Refined => EvenStencil::RefinedRing,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,
        Commands::Subdivide {
            input,
            output,
            iterations,
            stencil,
        } => cmd_subdivide(&input, &output, iterations, stencil.into())?,
        Commands::Flatten {
            input,
            output,
            iterations,
            smooth,
        } => {
            let smoothing = if smooth { Smoothing::Smooth } else { Smoothing::Flat };
            cmd_flatten(&input, &output, iterations, smoothing)?
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Monotonic: a later report never draws a shorter bar.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            raw_percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn load_mesh(input: &Path) -> Result<WingedMesh, Box<dyn std::error::Error>> {
    let geometry = io::load(input)?;
    let mesh = WingedMesh::build(&geometry)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    Ok(mesh)
}

fn refine(
    mesh: &WingedMesh,
    iterations: usize,
    stencil: EvenStencil,
) -> Result<WingedMesh, Box<dyn std::error::Error>> {
    let options = SubdivideOptions::new(iterations).with_stencil(stencil);
    let progress = create_progress();

    println!("Applying Loop subdivision ({} iterations, {:?})...", iterations, stencil);
    let start = Instant::now();
    let refined = loop_subdivide_with_progress(mesh, &options, &progress)?;
    println!(
        "Result: {} vertices, {} faces ({:.2?})",
        refined.num_vertices(),
        refined.num_faces(),
        start.elapsed()
    );

    Ok(refined)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", geometry.num_vertices());
    println!("Triangles: {}", geometry.num_triangles());
    println!("Unique edges: {}", geometry.unique_edge_count());

    let mesh = match WingedMesh::build(&geometry) {
        Ok(mesh) => mesh,
        Err(e) => {
            println!("Topology: not a closed manifold ({})", e);
            return Ok(());
        }
    };

    println!("Topology: Closed (every edge has a twin)");
    println!("Directed edges: {}", mesh.num_edges());

    let euler = mesh.num_vertices() as i64 - mesh.num_unique_edges() as i64
        + mesh.num_faces() as i64;
    println!("Euler characteristic: {}", euler);
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let mut isolated = 0;
    let mut off_unit = 0;
    for (_, vertex) in mesh.vertices() {
        let length = vertex.normal.norm();
        if length == 0.0 {
            isolated += 1;
        } else if (length - 1.0).abs() > 1e-4 {
            off_unit += 1;
        }
    }
    if off_unit == 0 {
        println!("Vertex normals: unit length ({} isolated)", isolated);
    } else {
        println!("Vertex normals: {} not unit length ({} isolated)", off_unit, isolated);
    }

    Ok(())
}

fn cmd_subdivide(
    input: &Path,
    output: &Path,
    iterations: usize,
    stencil: EvenStencil,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load_mesh(input)?;
    let refined = refine(&mesh, iterations, stencil)?;

    io::save(&refined.to_geometry(), output)?;
    println!("Saved: {}", output.display());

    Ok(())
}

fn cmd_flatten(
    input: &Path,
    output: &Path,
    iterations: usize,
    smoothing: Smoothing,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load_mesh(input)?;
    if iterations > 0 {
        mesh = refine(&mesh, iterations, EvenStencil::default())?;
    }

    let stream = flatten(&mesh, smoothing);
    let mut writer = BufWriter::new(File::create(output)?);
    writer.write_all(as_bytes(&stream))?;
    writer.flush()?;

    println!(
        "Saved: {} ({} records, {:?} normals, stride {} bytes)",
        output.display(),
        stream.len(),
        smoothing,
        FlatVertex::STRIDE
    );

    Ok(())
}
