use bevy_ecs::resource::Resource;
use figment::{providers::Env, Figment};
use serde::Deserialize;

use crate::constants;
use crate::error::{GameError, GameResult};

/// Prefix of every environment override, e.g. `TILEMAZE_SEED` or `TILEMAZE_TIME_LIMIT`.
pub const ENV_PREFIX: &str = "TILEMAZE_";

/// Per-run gameplay parameters. `Default` mirrors the compile-time constants.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub tile_size: f32,
    pub player_speed: f32,
    pub start_lives: i32,
    pub invulnerability_duration: f32,
    pub enemy_speed: f32,
    pub detection_range: f32,
    pub retreat_duration: f32,
    pub decision_cooldown: f32,
    pub spike_interval: f32,
    pub seed: u64,
    /// Seconds before the level is lost; `None` disables the clock.
    pub time_limit: Option<f32>,
}

/// Overrides as read from the environment, before they are folded into [`GameSettings`].
/// Unknown keys (such as `TILEMAZE_ASSETS`) are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    seed: Option<u64>,
    time_limit: Option<f32>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tile_size: constants::TILE_SIZE,
            player_speed: constants::player::SPEED,
            start_lives: constants::player::START_LIVES,
            invulnerability_duration: constants::player::INVULNERABILITY_DURATION,
            enemy_speed: constants::enemy::SPEED,
            detection_range: constants::enemy::DETECTION_RANGE,
            retreat_duration: constants::enemy::RETREAT_DURATION,
            decision_cooldown: constants::enemy::DECISION_COOLDOWN,
            spike_interval: constants::spike::TOGGLE_INTERVAL,
            seed: 0,
            time_limit: None,
        }
    }
}

impl GameSettings {
    /// Defaults, overridden by `TILEMAZE_SEED` and `TILEMAZE_TIME_LIMIT` when set.
    pub fn from_env() -> GameResult<Self> {
        Self::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Defaults, overridden by the `seed` and `time_limit` keys of `figment`.
    ///
    /// A time limit that is not a positive, finite number disables the clock.
    pub fn from_figment(figment: Figment) -> GameResult<Self> {
        let raw: RawSettings = figment
            .extract()
            .map_err(|e| GameError::InvalidState(format!("Invalid {ENV_PREFIX}* setting: {e}")))?;

        let mut settings = Self::default();
        if let Some(seed) = raw.seed {
            settings.seed = seed;
        }
        if let Some(limit) = raw.time_limit {
            settings.time_limit = (limit.is_finite() && limit > 0.0).then_some(limit);
        }
        Ok(settings)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_time_limit(mut self, seconds: f32) -> Self {
        self.time_limit = Some(seconds);
        self
    }
}
