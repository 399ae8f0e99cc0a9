use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    resource::Resource,
    system::{Query, ResMut},
};
use tracing::{debug, info};

use crate::error::GameError;
use crate::events::GameCommand;
use crate::systems::state::LevelClock;
use crate::systems::{Cheats, PlayerControlled, Stats};

/// World-wide developer switches. Per-player cheats live on [`Cheats`].
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DevToggles {
    pub freeze_enemies: bool,
    pub infinite_time: bool,
}

/// Applies the developer commands sent since the previous tick.
pub fn dev_command_system(
    mut commands: EventReader<GameCommand>,
    mut toggles: ResMut<DevToggles>,
    mut clock: ResMut<LevelClock>,
    mut players: Query<(&mut Cheats, &mut Stats), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    if commands.is_empty() {
        return;
    }

    let (mut cheats, mut stats) = match players.single_mut() {
        Ok(player) => player,
        Err(e) => {
            commands.clear();
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for dev command system: {}",
                e
            )));
            return;
        }
    };

    for command in commands.read() {
        match *command {
            GameCommand::ToggleGodMode => {
                cheats.god_mode = !cheats.god_mode;
                info!(enabled = cheats.god_mode, "God mode toggled");
            }
            GameCommand::ToggleNoClip => {
                cheats.no_clip = !cheats.no_clip;
                info!(enabled = cheats.no_clip, "No-clip toggled");
            }
            GameCommand::ToggleFreezeEnemies => {
                toggles.freeze_enemies = !toggles.freeze_enemies;
                info!(enabled = toggles.freeze_enemies, "Enemy freeze toggled");
            }
            GameCommand::ToggleInfiniteTime => {
                toggles.infinite_time = !toggles.infinite_time;
                info!(enabled = toggles.infinite_time, "Infinite time toggled");
            }
            GameCommand::AddKey => {
                stats.keys_collected += 1;
                debug!(keys = stats.keys_collected, "Key granted");
            }
            GameCommand::AddLife => {
                stats.lives += 1;
                debug!(lives = stats.lives, "Life granted");
            }
            GameCommand::AddTime(seconds) => match clock.remaining.as_mut() {
                Some(remaining) if seconds.is_finite() && seconds > 0.0 => {
                    *remaining += seconds;
                    debug!(remaining = *remaining, "Time granted");
                }
                Some(_) => debug!(seconds, "Ignoring non-positive time grant"),
                None => debug!("Level has no clock, ignoring time grant"),
            },
        }
    }
}
