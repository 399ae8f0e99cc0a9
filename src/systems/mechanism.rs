use bevy_ecs::{
    event::EventWriter,
    query::{Has, With, Without},
    system::{Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::info;

use crate::config::GameSettings;
use crate::error::GameError;
use crate::map::mechanism::MechanismRegistry;
use crate::systems::{Mechanism, MechanismTrigger, PlayerControlled, Position};

/// Deactivates a mechanism when the player stands on its active trigger.
///
/// Both halves of the pair, and the registry entry, switch off together and stay
/// off for the rest of the level.
pub fn mechanism_system(
    settings: Res<GameSettings>,
    mut registry: ResMut<MechanismRegistry>,
    player: Query<&Position, With<PlayerControlled>>,
    mut mechanisms: Query<(&Position, &mut Mechanism, Has<MechanismTrigger>), Without<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let player_tile = match player.single() {
        Ok(position) => position.tile(settings.tile_size),
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for mechanism system: {}",
                e
            )));
            return;
        }
    };

    let triggered: SmallVec<[char; 2]> = mechanisms
        .iter()
        .filter(|(position, mechanism, is_trigger)| {
            *is_trigger && mechanism.active && position.tile(settings.tile_size) == player_tile
        })
        .map(|(_, mechanism, _)| mechanism.id)
        .collect();

    for id in triggered {
        if !registry.deactivate(id) {
            continue;
        }

        for (_, mut mechanism, _) in mechanisms.iter_mut() {
            if mechanism.id == id {
                mechanism.active = false;
            }
        }

        info!(id = %id, tile = ?player_tile, "Mechanism triggered");
    }
}
