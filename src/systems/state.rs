use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::config::GameSettings;
use crate::error::GameError;
use crate::map::builder::Map;
use crate::systems::dev::DevToggles;
use crate::systems::{DeltaTime, PlayerControlled, Position, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Victory,
    Death,
}

/// How the current level ended. Present in the world only once the level is over.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub kind: OutcomeKind,
    /// Set when the victory was on the last level of the run.
    pub final_level_completed: bool,
}

impl LevelOutcome {
    pub fn death() -> Self {
        Self {
            kind: OutcomeKind::Death,
            final_level_completed: false,
        }
    }

    pub fn victory(final_level_completed: bool) -> Self {
        Self {
            kind: OutcomeKind::Victory,
            final_level_completed,
        }
    }

    pub fn is_victory(&self) -> bool {
        self.kind == OutcomeKind::Victory
    }
}

/// Position of the current level within the run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub index: usize,
    pub count: usize,
}

impl Default for LevelInfo {
    fn default() -> Self {
        Self { index: 0, count: 1 }
    }
}

impl LevelInfo {
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }
}

/// Remaining time for the level, if it has a limit.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelClock {
    pub remaining: Option<f32>,
}

impl LevelClock {
    pub fn new(limit: Option<f32>) -> Self {
        Self { remaining: limit }
    }

    pub fn expired(&self) -> bool {
        self.remaining.is_some_and(|remaining| remaining <= 0.0)
    }
}

/// Counts the level clock down, unless infinite time is on.
pub fn level_clock_system(delta_time: Res<DeltaTime>, toggles: Res<DevToggles>, mut clock: ResMut<LevelClock>) {
    if toggles.infinite_time {
        return;
    }
    if let Some(remaining) = clock.remaining.as_mut() {
        if *remaining > 0.0 {
            *remaining = (*remaining - delta_time.seconds).max(0.0);
            if *remaining == 0.0 {
                debug!("Level clock ran out");
            }
        }
    }
}

/// Decides whether the level is over, publishing a [`LevelOutcome`] if so.
///
/// Death (no lives left, or the clock ran out) takes precedence over victory.
/// Victory requires standing on the exit holding at least as many keys as the
/// level started with.
pub fn outcome_system(
    mut commands: Commands,
    map: Res<Map>,
    settings: Res<GameSettings>,
    level: Res<LevelInfo>,
    clock: Res<LevelClock>,
    player: Query<(&Position, &Stats), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let (position, stats) = match player.single() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for outcome system: {}",
                e
            )));
            return;
        }
    };

    let outcome = if stats.lives <= 0 {
        info!(lives = stats.lives, "Player is out of lives");
        LevelOutcome::death()
    } else if clock.expired() {
        info!("Player ran out of time");
        LevelOutcome::death()
    } else if map.is_exit(position.tile(settings.tile_size)) && stats.keys_collected >= map.total_keys {
        info!(
            keys = stats.keys_collected,
            level = level.index,
            last = level.is_last(),
            "Level completed"
        );
        LevelOutcome::victory(level.is_last())
    } else {
        return;
    };

    commands.insert_resource(outcome);
}
