use bevy_ecs::{
    event::EventWriter,
    query::With,
    system::{Query, Res},
};
use tracing::trace;

use crate::config::GameSettings;
use crate::error::GameError;
use crate::map::builder::Map;
use crate::map::mechanism::MechanismRegistry;
use crate::systems::input::InputState;
use crate::systems::{
    move_duration, tile_to_world, Cheats, DeltaTime, Invulnerability, LastSafeTile, PlayerControlled, Position, Sprite,
    TileMovement, Velocity,
};

/// Turns the held direction keys into a one-tile player move.
///
/// A new move only starts once the previous one has finished. The destination
/// must be walkable and not blocked by an active mechanism target; with no-clip
/// on, any in-bounds tile will do. The tile being left becomes the player's
/// last safe tile.
pub fn player_control_system(
    map: Res<Map>,
    registry: Res<MechanismRegistry>,
    settings: Res<GameSettings>,
    input: Res<InputState>,
    mut players: Query<
        (
            &Position,
            &Cheats,
            &mut TileMovement,
            &Velocity,
            &mut LastSafeTile,
            Option<&mut Sprite>,
        ),
        With<PlayerControlled>,
    >,
    mut errors: EventWriter<GameError>,
) {
    let (position, cheats, mut movement, velocity, mut safe_tile, sprite) = match players.single_mut() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player system: {}",
                e
            )));
            return;
        }
    };

    if movement.moving {
        return;
    }
    let Some(direction) = input.intended_direction() else {
        return;
    };

    let tile = position.tile(settings.tile_size);
    let target = tile + direction.as_ivec2();

    let passable = if cheats.no_clip {
        map.in_bounds(target.x, target.y)
    } else {
        map.is_walkable(target.x, target.y) && !registry.is_blocking_cell(target)
    };
    if !passable {
        trace!(?tile, ?target, direction = direction.as_ref(), "Player move blocked");
        return;
    }

    safe_tile.0 = tile;
    if let Some(mut sprite) = sprite {
        sprite.face(direction);
    }
    movement.begin(
        tile_to_world(tile, settings.tile_size),
        tile_to_world(target, settings.tile_size),
        move_duration(settings.tile_size, velocity.speed),
    );
    trace!(?tile, ?target, direction = direction.as_ref(), "Player move started");
}

/// Runs every active invulnerability window forward.
pub fn invulnerability_system(delta_time: Res<DeltaTime>, mut query: Query<&mut Invulnerability>) {
    for mut invulnerability in query.iter_mut() {
        if invulnerability.is_protective() {
            invulnerability.tick(delta_time.seconds);
            if !invulnerability.is_protective() {
                trace!("Invulnerability elapsed");
            }
        }
    }
}
