//! This module contains all the constants used in the game.

use std::time::Duration;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each tile, in pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Characters of the level text format.
pub mod glyph {
    pub const WALL: char = '#';
    pub const FLOOR: char = '.';
    pub const PLAYER_SPAWN: char = 'P';
    pub const ENEMY_SPAWN: char = 'E';
    pub const KEY: char = 'K';
    pub const EXIT: char = 'X';
    pub const SPIKE: char = '^';

    /// Uppercase letters that carry their own meaning and therefore cannot be mechanism targets.
    pub const RESERVED: [char; 4] = [PLAYER_SPAWN, ENEMY_SPAWN, KEY, EXIT];

    /// Returns true for lowercase letters acting as mechanism triggers.
    pub fn is_trigger(c: char) -> bool {
        c.is_ascii_lowercase() && !RESERVED.contains(&c.to_ascii_uppercase())
    }

    /// Returns true for uppercase letters acting as mechanism targets.
    pub fn is_target(c: char) -> bool {
        c.is_ascii_uppercase() && !RESERVED.contains(&c)
    }
}

pub mod player {
    pub const START_LIVES: i32 = 5;
    /// Pixels per second.
    pub const SPEED: f32 = 160.0;
    /// Seconds of protection after a hazard hit.
    pub const INVULNERABILITY_DURATION: f32 = 1.5;
    /// Value the invulnerability timer is armed with; strictly between zero and the duration.
    pub const INVULNERABILITY_EPSILON: f32 = 1e-4;
}

pub mod enemy {
    /// Pixels per second while patrolling.
    pub const SPEED: f32 = 96.0;
    /// Detection radius, in tiles.
    pub const DETECTION_RANGE: f32 = 5.0;
    /// Chase is dropped beyond this multiple of the detection range.
    pub const LOSE_SIGHT_FACTOR: f32 = 1.5;
    pub const RETREAT_DURATION: f32 = 2.0;
    pub const DECISION_COOLDOWN: f32 = 0.25;

    pub const PATROL_SPEED_MULTIPLIER: f32 = 1.0;
    pub const CHASE_SPEED_MULTIPLIER: f32 = 1.25;
    pub const RETREAT_SPEED_MULTIPLIER: f32 = 1.5;
}

pub mod spike {
    /// Seconds between spike state flips.
    pub const TOGGLE_INTERVAL: f32 = 1.0;
}

pub mod movement {
    /// Seconds per tile when an entity has no positive speed.
    pub const FALLBACK_DURATION: f32 = 0.2;
}

/// Hitboxes relative to the owning entity's top-left corner, in pixels.
pub mod collider {
    use glam::Vec2;

    pub const PLAYER_OFFSET: Vec2 = Vec2::splat(4.0);
    pub const PLAYER_SIZE: Vec2 = Vec2::splat(24.0);
    pub const ENEMY_OFFSET: Vec2 = Vec2::splat(4.0);
    pub const ENEMY_SIZE: Vec2 = Vec2::splat(24.0);
    pub const KEY_OFFSET: Vec2 = Vec2::splat(8.0);
    pub const KEY_SIZE: Vec2 = Vec2::splat(16.0);
    pub const SPIKE_OFFSET: Vec2 = Vec2::splat(2.0);
    pub const SPIKE_SIZE: Vec2 = Vec2::splat(28.0);
}

pub mod animation {
    use crate::systems::FrameSet;

    pub const PLAYER_WALK: FrameSet = FrameSet::new(4, 0.1);
    pub const PLAYER_IDLE: FrameSet = FrameSet::new(2, 0.5);
    pub const ENEMY_WALK: FrameSet = FrameSet::new(4, 0.12);
    pub const ENEMY_IDLE: FrameSet = FrameSet::new(2, 0.4);
}

/// Logical texture paths, resolved through the asset resolver.
pub mod texture {
    pub const PLAYER: &str = "sprites/player.png";
    pub const ENEMY: &str = "sprites/enemy.png";
    pub const KEY: &str = "sprites/key.png";
    pub const SPIKE: &str = "sprites/spike.png";
    pub const DOOR: &str = "sprites/door.png";
    pub const TRAP: &str = "sprites/trap.png";
    pub const BRIDGE: &str = "sprites/bridge.png";
    pub const LEVER: &str = "sprites/lever.png";
    pub const TRIGGER: &str = "sprites/trigger.png";
}
