#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a maze and plays it headlessly.

mod autopilot;
mod headless;
mod maze_transfer;
mod timeline;

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use maze_walker_core::Capabilities;
use maze_walker_rendering::{
    assets::{AssetManifest, LoadedAssets},
    timer_text, victory_text, Presentation, RenderingBackend, Scene,
};
use maze_walker_world::{self as world, query, GameConfig, World};
use serde::Serialize;

use crate::{
    autopilot::Autopilot,
    headless::HeadlessBackend,
    timeline::{Recorder, Timeline},
};

const WINDOW_TITLE: &str = "Maze Walker";

#[derive(Parser, Debug)]
#[command(
    name = "maze-walker",
    version,
    about = "Generate a maze and walk it through the day/night cycle"
)]
struct CliArgs {
    /// Number of maze columns; odd and at least five.
    #[arg(long)]
    columns: Option<u32>,
    /// Number of maze rows; odd and at least five.
    #[arg(long)]
    rows: Option<u32>,
    /// Seed for reproducible mazes.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with game settings; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Asset manifest; without one the torch is unavailable.
    #[arg(long, value_name = "PATH")]
    assets: Option<PathBuf>,
    /// Play a maze from a share code instead of generating one.
    #[arg(long, value_name = "CODE")]
    share_code: Option<String>,
    /// Print the share code of the maze being played.
    #[arg(long)]
    print_share_code: bool,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Length of one simulated frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Steer the player along the shortest route to the exit.
    #[arg(long)]
    autopilot: bool,
    /// Record a timeline sample every N frames; zero keeps only the last frame.
    #[arg(long, default_value_t = 60)]
    sample_every: u32,
    /// Emit the run report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    maze: Vec<String>,
    share_code: Option<String>,
    solution_length: Option<usize>,
    timeline: Timeline,
}

/// Entry point for the Maze Walker command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = load_config(&args)?;
    let capabilities = load_capabilities(args.assets.as_deref())?;
    let world = match args.share_code.as_deref() {
        Some(code) => {
            let grid = maze_transfer::decode(code).context("invalid share code")?;
            World::with_grid(config, grid, capabilities)?
        }
        None => World::new(config, capabilities)?,
    };

    let maze = query::maze(&world);
    let solution_length = maze
        .shortest_path(maze.start(), maze.end())
        .map(|path| path.len());
    let share_code = if args.print_share_code {
        Some(maze_transfer::encode(maze).context("failed to encode share code")?)
    } else {
        None
    };

    if !args.json {
        println!("{}", query::welcome_banner(&world));
        println!("{maze}");
        if let Some(length) = solution_length {
            println!("Solution length: {length} cells");
        }
        if let Some(code) = &share_code {
            println!("Share code: {code}");
        }
    }

    let maze_rows = maze.to_ascii().lines().map(str::to_owned).collect();
    let (world, timeline) = play(world, &args)?;

    if args.json {
        let report = RunReport {
            maze: maze_rows,
            share_code,
            solution_length,
            timeline,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialise run report")?
        );
    } else {
        let session = query::session(&world);
        match session.final_time() {
            Some(elapsed) => println!("{}", victory_text(elapsed)),
            None => println!(
                "Exit not reached after {} frames ({})",
                timeline.frames,
                timer_text(session.elapsed())
            ),
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &CliArgs) -> Result<GameConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => read_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))
}

fn load_capabilities(manifest: Option<&Path>) -> Result<Capabilities> {
    let Some(path) = manifest else {
        return Ok(Capabilities::default());
    };
    let manifest = AssetManifest::from_path(path)?;
    let assets = LoadedAssets::load(&manifest)?;
    tracing::info!(loaded = assets.len(), "assets ready");
    Ok(assets.capabilities())
}

fn play(world: World, args: &CliArgs) -> Result<(World, Timeline)> {
    let pilot = if args.autopilot {
        let pilot = Autopilot::plan(query::layout(&world));
        match &pilot {
            Some(pilot) => tracing::info!(waypoints = pilot.remaining(), "autopilot planned"),
            None => tracing::warn!("maze has no route to the exit; autopilot disabled"),
        }
        pilot
    } else {
        None
    };

    let presentation = Presentation::for_world(WINDOW_TITLE, &world);
    let world = Rc::new(RefCell::new(world));
    let recorder = Rc::new(RefCell::new(Recorder::new(args.sample_every)));

    let frame_world = Rc::clone(&world);
    let frame_recorder = Rc::clone(&recorder);
    HeadlessBackend::new(args.frames, Duration::from_millis(args.frame_ms), pilot)
        .run(presentation, move |dt, input, scene| {
            let mut world = frame_world.borrow_mut();
            let mut events = Vec::new();
            for command in input.commands(dt) {
                world::apply(&mut world, command, &mut events);
            }
            *scene = Scene::capture(&world, &events);
            frame_recorder.borrow_mut().record(&world, &events);
        })?;

    let world = Rc::try_unwrap(world)
        .map_err(|_| anyhow!("world is still shared with the backend"))?
        .into_inner();
    let timeline = recorder.replace(Recorder::new(0)).finish(&world);
    Ok((world, timeline))
}
