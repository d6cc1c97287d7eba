//! doorweave
//!
//! Generates a dungeon from a room catalog and shows it in the terminal.
//! Press `g` for a new dungeon.

use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use dw_core::{Catalog, DungeonRng, Generator, GeneratorConfig};
use dw_tui::stage::DEFAULT_CELL_SIZE;
use dw_tui::widgets::describe;
use dw_tui::{App, TileStage, materialize};

/// Backtracking dungeon generator
#[derive(Parser, Debug)]
#[command(name = "doorweave")]
#[command(author, version, about = "Weave a dungeon from room blueprints", long_about = None)]
struct Args {
    /// Room catalog (JSON); the bundled catalog is used if omitted
    #[arg(short = 'c', long = "catalog")]
    catalog: Option<PathBuf>,

    /// Generator config (JSON)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Seed for catalog ordering
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Fewest rooms a layout may have
    #[arg(long = "min-rooms")]
    min_rooms: Option<usize>,

    /// Most rooms a layout may have
    #[arg(long = "max-rooms")]
    max_rooms: Option<usize>,

    /// Iteration budget for one search
    #[arg(short = 'i', long = "max-iterations")]
    max_iterations: Option<u32>,

    /// Tiles per grid cell
    #[arg(long = "cell-size", default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: i32,

    /// Print the dungeon once instead of opening the viewer
    #[arg(short = 'p', long = "print")]
    print: bool,

    /// Print the placement plan as JSON instead of the map
    #[arg(long = "plan-json")]
    plan_json: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let generator = match build_generator(&args) {
        Ok(generator) => generator,
        Err(message) => {
            eprintln!("doorweave: {message}");
            process::exit(2);
        }
    };

    if args.print || args.plan_json {
        // Logging goes to stderr and would tear the viewer, so only here
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .init();
        return print_once(&generator, &args);
    }

    run_viewer(generator, &args)
}

fn build_generator(args: &Args) -> Result<Generator, String> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => Catalog::builtin().map_err(|e| e.to_string())?,
    };

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(min_rooms) = args.min_rooms {
        config.min_rooms = min_rooms;
    }
    if args.max_rooms.is_some() {
        config.max_rooms = args.max_rooms;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().map_err(|e| e.to_string())?;

    Ok(Generator::new(catalog, config))
}

fn print_once(generator: &Generator, args: &Args) -> io::Result<()> {
    let generation = match generator.generate() {
        Ok(generation) => generation,
        Err(err) => {
            eprintln!("doorweave: {err}");
            process::exit(1);
        }
    };

    if args.plan_json {
        let json = serde_json::to_string_pretty(&generation.plan).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    let mut stage = TileStage::new(args.cell_size);
    materialize(&mut stage, &generation);
    for row in stage.rows() {
        println!("{row}");
    }
    println!("{}", describe(&generation.plan));
    Ok(())
}

fn run_viewer(generator: Generator, args: &Args) -> io::Result<()> {
    let rng = match args.seed {
        Some(seed) => DungeonRng::new(seed),
        None => DungeonRng::from_entropy(),
    };
    let mut app = App::new(generator, TileStage::new(args.cell_size), rng);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;
            if let Some(command) = app.handle_event(event) {
                app.execute(command);
            }
        }
    }
    Ok(())
}
