use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Commands, Query, Res, ResMut},
};
use glam::IVec2;
use tracing::{debug, info};

use crate::config::GameSettings;
use crate::error::GameError;
use crate::map::builder::Map;
use crate::systems::{
    tile_to_world, Cheats, Collider, CollisionLayer, EnemyAi, Invulnerability, Item, LastSafeTile, PlayerControlled, Position,
    Stats, TileMovement,
};

/// Where a damaged player reappears: the last safe tile if it is still a
/// walkable in-bounds cell, the level spawn otherwise.
pub fn respawn_tile(map: &Map, last_safe: IVec2) -> IVec2 {
    if map.is_walkable(last_safe.x, last_safe.y) {
        last_safe
    } else {
        map.player_spawn
    }
}

/// Resolves player overlaps with hazards and items.
///
/// Hazards are checked first. The first active hazard found overlapping an
/// unprotected player costs a life, sends the player back to safety, cancels its
/// move and arms invulnerability; a chasing enemy that caused it retreats. Any
/// further hazards are ignored for this tick. Items are then checked against the
/// player's (possibly respawned) hitbox and collected at most once.
#[allow(clippy::too_many_arguments)]
pub fn collision_system(
    mut commands: Commands,
    settings: Res<GameSettings>,
    mut map: ResMut<Map>,
    mut players: Query<
        (
            &mut Position,
            &Collider,
            &mut Stats,
            &Cheats,
            &mut Invulnerability,
            &mut TileMovement,
            &LastSafeTile,
        ),
        With<PlayerControlled>,
    >,
    mut hazards: Query<(Entity, &Position, &Collider, Option<&mut EnemyAi>), (Without<PlayerControlled>, Without<Item>)>,
    mut items: Query<(Entity, &Position, &Collider, &mut Item), Without<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let (mut position, collider, mut stats, cheats, mut invulnerability, mut movement, safe_tile) = match players.single_mut()
    {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for collision system: {}",
                e
            )));
            return;
        }
    };

    if !cheats.god_mode && !invulnerability.is_protective() {
        let hitbox = collider.hitbox(&position);
        let hit = hazards.iter_mut().find(|(_, hazard_position, hazard_collider, _)| {
            hazard_collider.active
                && hazard_collider.layer.contains(CollisionLayer::HAZARD)
                && hitbox.overlaps(&hazard_collider.hitbox(hazard_position))
        });

        if let Some((hazard, _, _, enemy_ai)) = hit {
            stats.lives -= 1;

            let respawn = respawn_tile(&map, safe_tile.0);
            position.world = tile_to_world(respawn, settings.tile_size);
            movement.cancel();
            invulnerability.arm();

            info!(hazard = ?hazard, lives = stats.lives, ?respawn, "Player hit by hazard");

            if let Some(mut ai) = enemy_ai {
                if ai.bounce_back() {
                    debug!(enemy = ?hazard, "Enemy retreating after hit");
                }
            }
        }
    }

    let hitbox = collider.hitbox(&position);
    for (entity, item_position, item_collider, mut item) in items.iter_mut() {
        if item.collected
            || !item_collider.active
            || !item_collider.layer.contains(CollisionLayer::ITEM)
            || !hitbox.overlaps(&item_collider.hitbox(item_position))
        {
            continue;
        }

        item.collected = true;
        if item.is_key {
            stats.keys_collected += 1;
        }

        let tile = item_position.tile(settings.tile_size);
        if let Err(e) = map.clear_cell(tile.x, tile.y) {
            errors.write(e.into());
        }
        commands.entity(entity).despawn();

        debug!(item = ?entity, ?tile, keys = stats.keys_collected, "Item collected");
    }
}
