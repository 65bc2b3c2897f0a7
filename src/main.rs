//! symmap CLI - symmetric map post-processor.
//!
//! Reads a map folder, places mexes, expansions and AI markers under the
//! requested symmetry, and writes the result to another folder.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::prelude::*;

use symmap::io::{load_map, save_map};
use symmap::map::MarkerKind;
use symmap::pipeline::{Pipeline, TransformConfig, TransformContext};
use symmap::symmetry::SymmetryHierarchy;

/// Places symmetric mexes and AI markers on an existing map.
#[derive(Parser)]
#[command(name = "symmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder holding map.json and the heightmap (required).
    #[arg(long)]
    in_folder_path: Option<PathBuf>,

    /// Folder the transformed map is written to (required).
    #[arg(long)]
    out_folder_path: Option<PathBuf>,

    /// Symmetry of the terrain: POINT, X, Y, XY, YX, QUAD or DIAG (required).
    #[arg(long)]
    terrain_symmetry: Option<String>,

    /// Symmetry between teams (required).
    #[arg(long)]
    team_symmetry: Option<String>,

    /// Symmetry pairing spawns and placed entities; two-fold only (required).
    #[arg(long)]
    spawn_symmetry: Option<String>,

    /// Dump intermediate masks as PNGs into <out-folder-path>/debug.
    #[arg(long)]
    debug: bool,

    /// Seed for reproducible placement (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Target number of mexes (overrides map.json).
    #[arg(long)]
    mex_count: Option<usize>,

    /// JSON file with transform settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(in_folder) = cli.in_folder_path else {
        eprintln!("Error: --in-folder-path is required");
        std::process::exit(1);
    };
    let Some(out_folder) = cli.out_folder_path else {
        eprintln!("Error: --out-folder-path is required");
        std::process::exit(2);
    };
    let (Some(terrain), Some(team), Some(spawn)) = (&cli.terrain_symmetry, &cli.team_symmetry, &cli.spawn_symmetry) else {
        eprintln!("Error: --terrain-symmetry, --team-symmetry and --spawn-symmetry are required");
        std::process::exit(3);
    };
    let symmetry = SymmetryHierarchy::parse(terrain, team, spawn).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(3);
    });

    let mut config = match &cli.config {
        Some(path) => TransformConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error reading config {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => TransformConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.debug {
        config.debug = true;
    }
    if config.debug && config.debug_dir.is_none() {
        config.debug_dir = Some(out_folder.join("debug"));
    }
    if config.debug {
        let dir = config.debug_dir();
        if dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                warn!(dir = %dir.display(), error = %e, "could not clear debug directory");
            }
        }
    }

    println!("Transforming map {}", in_folder.display());
    let start = Instant::now();

    let (document, mut map) = load_map(&in_folder, Arc::new(symmetry)).unwrap_or_else(|e| {
        eprintln!("Error while reading the map: {}", e);
        std::process::exit(1);
    });
    if let Some(count) = cli.mex_count {
        map.set_mex_target(count);
    }
    println!("Size: {}x{}, spawns: {}, mex target: {}", map.size(), map.size(), map.spawn_count(), map.mex_target());

    let mut ctx = TransformContext::new(map);
    let pipeline = Pipeline::standard(config);
    pipeline
        .run_with_callbacks(
            &mut ctx,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during transform: {}", e);
            std::process::exit(1);
        });
    println!("Transform completed in {:.2?}", start.elapsed());

    let map = ctx.into_map();
    save_map(&out_folder, &document, &map).unwrap_or_else(|e| {
        eprintln!("Error while saving the map: {}", e);
        std::process::exit(1);
    });

    println!("Saving map to {}", out_folder.display());
    println!("Terrain Symmetry: {}", symmetry.terrain_symmetry());
    println!("Team Symmetry: {}", symmetry.team_symmetry());
    println!("Spawn Symmetry: {}", symmetry.spawn_symmetry());
    println!("Mexes: {}/{}", map.mex_count(), map.mex_target());
    println!(
        "Expansions: {} small, {} large",
        map.marker_count(MarkerKind::Expansion) / 2,
        map.marker_count(MarkerKind::LargeExpansion) / 2
    );
    for kind in [MarkerKind::Land, MarkerKind::Amphibious, MarkerKind::Naval, MarkerKind::Air] {
        println!("{} markers: {}", kind.prefix(), map.marker_count(kind));
    }
    println!("Done");
}
