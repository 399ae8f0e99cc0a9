use bevy_ecs::system::{Query, Res};

use crate::systems::{Animation, DeltaTime, Sprite, TileMovement};

/// Advances walk/idle animations and mirrors the current frame onto the sprite.
///
/// Large time steps are caught up in one go, so the frame index never leaves
/// `[0, frame_count)`.
pub fn animation_system(
    delta_time: Res<DeltaTime>,
    mut query: Query<(&mut Animation, Option<&TileMovement>, Option<&mut Sprite>)>,
) {
    for (mut animation, movement, sprite) in query.iter_mut() {
        let moving = movement.is_some_and(|movement| movement.moving);
        animation.advance(delta_time.seconds, moving);

        if let Some(mut sprite) = sprite {
            sprite.frame = animation.current_frame;
        }
    }
}
