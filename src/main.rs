//! Headless runner: loads one or more level files and steps each level with a
//! fixed time step until it ends or the tick budget runs out.
//!
//! Usage: `tilemaze [--ticks N] [--seed N] <level>...`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use tilemaze::asset::AssetResolver;
use tilemaze::config::GameSettings;
use tilemaze::constants::LOOP_TIME;
use tilemaze::game::Game;
use tilemaze::logging::setup_logging;
use tilemaze::map::builder::Map;
use tilemaze::systems::{LevelInfo, OutcomeKind};
use tilemaze::texture::{FsTextureLoader, SpriteTextures, TextureCache};

/// Ticks simulated per level when `--ticks` is not given (one minute at 60 Hz).
const DEFAULT_TICKS: u64 = 3600;

/// Steps tile maze levels headlessly, in order, until one is lost.
#[derive(Parser, Debug)]
#[command(name = "tilemaze", version)]
struct RunnerArgs {
    /// Level files, played in the order given.
    #[arg(required = true)]
    levels: Vec<PathBuf>,

    /// Tick budget per level.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,

    /// Enemy RNG seed; overrides `TILEMAZE_SEED`.
    #[arg(long)]
    seed: Option<u64>,
}

pub fn main() -> Result<()> {
    setup_logging();

    let args = RunnerArgs::parse();

    let mut settings = GameSettings::from_env()?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let resolver = AssetResolver::from_env();
    let mut cache = TextureCache::new(FsTextureLoader);
    let textures = SpriteTextures::load(&mut cache, &resolver);

    let dt = LOOP_TIME.as_secs_f32();
    let count = args.levels.len();

    for (index, path) in args.levels.iter().enumerate() {
        let source = fs::read_to_string(path).with_context(|| format!("Failed to read level {}", path.display()))?;
        let map = Map::load(&source).with_context(|| format!("Invalid level {}", path.display()))?;
        let mut game = Game::new(map, settings.clone(), LevelInfo { index, count }, textures)?;

        info!(level = %path.display(), index, seed = settings.seed, "Running level");

        let mut outcome = None;
        while outcome.is_none() && game.ticks() < args.ticks {
            outcome = game.tick(dt)?;
        }

        match outcome {
            Some(outcome) if outcome.kind == OutcomeKind::Victory => {
                info!(ticks = game.ticks(), final_level = outcome.final_level_completed, "Level won");
            }
            Some(_) => {
                info!(ticks = game.ticks(), "Player died, ending run");
                return Ok(());
            }
            None => {
                warn!(ticks = game.ticks(), "Level did not finish within the tick budget");
                return Ok(());
            }
        }
    }

    info!("Run complete");
    Ok(())
}
