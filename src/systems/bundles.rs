use bevy_ecs::bundle::Bundle;

use crate::systems::{
    Animation, Cheats, Collider, Enemy, EnemyAi, Invulnerability, Item, LastSafeTile, Mechanism, PlayerControlled, Position,
    Spike, Sprite, Stats, TileMovement, Velocity,
};

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub movement: TileMovement,
    pub velocity: Velocity,
    pub collider: Collider,
    pub stats: Stats,
    pub cheats: Cheats,
    pub invulnerability: Invulnerability,
    pub last_safe_tile: LastSafeTile,
    pub animation: Animation,
    pub sprite: Sprite,
}

#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub position: Position,
    pub movement: TileMovement,
    pub velocity: Velocity,
    pub collider: Collider,
    pub ai: EnemyAi,
    pub animation: Animation,
    pub sprite: Sprite,
}

#[derive(Bundle)]
pub struct ItemBundle {
    pub position: Position,
    pub collider: Collider,
    pub item: Item,
    pub sprite: Sprite,
}

#[derive(Bundle)]
pub struct SpikeBundle {
    pub position: Position,
    pub collider: Collider,
    pub spike: Spike,
    pub sprite: Sprite,
}

/// One half of a mechanism pair; the role marker is inserted alongside.
#[derive(Bundle)]
pub struct MechanismBundle {
    pub position: Position,
    pub mechanism: Mechanism,
    pub sprite: Sprite,
}
