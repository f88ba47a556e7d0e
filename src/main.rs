//! Headless colony runner.
//!
//! Plays the part of the timer and input collaborators: places the requested
//! structures, then ticks the simulation at the configured speed and prints a
//! text view of each generation.

use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use mars_colony::{
    AdvanceRejected, Algorithm, Cell, FileStore, GameConfig, GameState, GenerationReport, SaveSlot,
    Status, StructureKind,
};
use tracing_subscriber::EnvFilter;

/// Mars colony simulation, headless
#[derive(Parser, Debug)]
#[command(name = "mars-colony")]
#[command(about = "Grow a Mars colony on a cellular-automaton grid")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for save files; without it nothing is persisted
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Ignore (and delete) any existing save
    #[arg(long)]
    fresh: bool,

    /// Level to start a new colony at
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Structure to place before the run, as `row,col,kind` (repeatable)
    #[arg(long = "place", value_parser = parse_placement)]
    placements: Vec<(usize, usize, StructureKind)>,

    /// Number of generations to run
    #[arg(long, default_value_t = 20)]
    generations: u32,

    /// Milliseconds between generations (overrides the config)
    #[arg(long)]
    speed: Option<u64>,

    /// Random seed for reproducible hazards (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Evolve rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Wait in real time between generations instead of running flat out
    #[arg(long)]
    realtime: bool,
}

fn parse_placement(s: &str) -> Result<(usize, usize, StructureKind), String> {
    let parts: Vec<_> = s.split(',').map(str::trim).collect();
    let [row, col, kind] = parts.as_slice() else {
        return Err(format!("expected row,col,kind but got `{s}`"));
    };
    let row = row.parse().map_err(|e| format!("bad row `{row}`: {e}"))?;
    let col = col.parse().map_err(|e| format!("bad col `{col}`: {e}"))?;
    let kind = StructureKind::from_tag(kind)
        .ok_or_else(|| format!("unknown structure `{kind}` (habitat, oxygen, water, energy, shield)"))?;
    Ok((row, col, kind))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mars_colony=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.speed_ms = speed;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.parallel {
        config.algorithm = Algorithm::Parallel;
    }

    let mut game = GameState::from_config(&config);
    game.initialize(args.level);

    if let Some(dir) = &args.save_dir {
        let mut slot = SaveSlot::new(Box::new(FileStore::open(dir)?), config.save_key.clone());
        if args.fresh {
            slot.clear();
        }
        tracing::info!(dir = %dir.display(), key = slot.key(), "using save slot");
        game = game.with_save_slot(slot);
    }

    tracing::info!(
        level = game.level(),
        grid = game.grid().size(),
        algorithm = game.algorithm().name(),
        "colony ready"
    );
    tracing::debug!("{}", game.algorithm().description());

    for &(row, col, kind) in &args.placements {
        match game.place_structure(row, col, kind) {
            Ok(()) => tracing::info!(row, col, kind = kind.name(), "placed"),
            Err(rejected) => tracing::warn!(row, col, kind = kind.name(), "{rejected}"),
        }
    }

    print_colony(&game);
    game.set_running(true);

    let interval = Duration::from_millis(game.speed());
    let mut ran = 0;
    let mut last = Instant::now();
    while ran < args.generations {
        let elapsed = if args.realtime {
            std::thread::sleep(interval.saturating_sub(last.elapsed()));
            last.elapsed()
        } else {
            interval
        };
        last = Instant::now();

        match game.tick(elapsed) {
            None => continue,
            Some(Ok(report)) => {
                ran += 1;
                print_report(&report);
                print_colony(&game);
                if report.game_over {
                    println!("Colony lost after {} generations.", report.generation);
                    break;
                }
                if report.leveled_up.is_some() {
                    game.set_running(true);
                }
            }
            Some(Err(AdvanceRejected::OutOfTurns)) => {
                println!("Out of turns at level {} with score {}.", game.level(), game.score());
                break;
            }
            Some(Err(AdvanceRejected::GameOver)) => break,
        }
    }

    game.set_running(false);
    Ok(())
}

fn glyph(cell: &Cell) -> char {
    let Some(kind) = cell.structure() else {
        return '.';
    };
    let c = match kind {
        StructureKind::Habitat => 'h',
        StructureKind::Oxygen => 'o',
        StructureKind::Water => 'w',
        StructureKind::Energy => 'e',
        StructureKind::Shield => 's',
    };
    match cell.status() {
        Status::Thriving => c.to_ascii_uppercase(),
        Status::Dying => '!',
        _ => c,
    }
}

fn print_report(report: &GenerationReport) {
    println!(
        "gen {:>4} | weather {:<10} | +{:<3} score {:<5} | colonists {:<3} | turns {}",
        report.generation,
        report.weather.tag(),
        report.score_delta,
        report.score,
        report.occupied,
        report.turns_left,
    );
    if let Some(level) = report.leveled_up {
        println!("Level complete! Now on level {level}.");
    }
}

fn print_colony(game: &GameState) {
    let res = game.resources();
    let cfg = game.level_config();
    println!(
        "level {} ({}/{}) | energy {} water {} oxygen {}",
        cfg.level, game.score(), cfg.required_score, res.energy, res.water, res.oxygen
    );
    for row in game.grid().rows() {
        let line: String = row.iter().map(glyph).collect();
        println!("  {line}");
    }
}
