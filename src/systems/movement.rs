use bevy_ecs::{
    entity::Entity,
    query::Has,
    system::{Query, Res},
};
use tracing::trace;

use crate::systems::dev::DevToggles;
use crate::systems::{DeltaTime, Enemy, Position, TileMovement};

/// Interpolates every in-flight tile move and snaps finished moves onto their target.
///
/// Enemies hold still while frozen.
pub fn movement_system(
    delta_time: Res<DeltaTime>,
    toggles: Res<DevToggles>,
    mut entities: Query<(Entity, &mut Position, &mut TileMovement, Has<Enemy>)>,
) {
    for (entity, mut position, mut movement, is_enemy) in entities.iter_mut() {
        if is_enemy && toggles.freeze_enemies {
            continue;
        }

        if let Some((world, finished)) = movement.advance(delta_time.seconds) {
            position.world = world;
            if finished {
                trace!(entity = ?entity, position = ?world, "Tile move finished");
            }
        }
    }
}
