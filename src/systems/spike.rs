use bevy_ecs::system::{Query, Res};
use tracing::trace;

use crate::systems::{Collider, DeltaTime, Spike};

/// Cycles spikes between armed and retracted, keeping their hitbox in step.
pub fn spike_system(delta_time: Res<DeltaTime>, mut spikes: Query<(&mut Spike, &mut Collider)>) {
    for (mut spike, mut collider) in spikes.iter_mut() {
        let was_active = spike.active;
        spike.advance(delta_time.seconds);
        collider.active = spike.active;

        if spike.active != was_active {
            trace!(active = spike.active, "Spike toggled");
        }
    }
}
