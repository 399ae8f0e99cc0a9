use bevy_ecs::{component::Component, resource::Resource};
use bitflags::bitflags;
use glam::{IVec2, Vec2};

use crate::constants;
use crate::map::direction::Direction;
use crate::map::mechanism::MechanismKind;
use crate::texture::TextureHandle;

/// A tag component for the single entity controlled by the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerControlled;

/// A tag component for enemies.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime {
    /// Floating-point delta time in seconds
    pub seconds: f32,
}

impl DeltaTime {
    /// Creates a new DeltaTime, treating negative and non-finite values as zero.
    pub fn from_seconds(seconds: f32) -> Self {
        Self {
            seconds: sanitize_dt(seconds),
        }
    }
}

/// Clamps an elapsed-time value into something every accumulator can safely absorb.
pub fn sanitize_dt(seconds: f32) -> f32 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// World-space placement of an entity: top-left corner and extent, in pixels.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub world: Vec2,
    pub size: Vec2,
}

impl Position {
    /// Places an entity so that it exactly covers `tile`.
    pub fn at_tile(tile: IVec2, tile_size: f32) -> Self {
        Self {
            world: tile_to_world(tile, tile_size),
            size: Vec2::splat(tile_size),
        }
    }

    /// The tile containing the entity's center.
    pub fn tile(&self, tile_size: f32) -> IVec2 {
        ((self.world + self.size / 2.0) / tile_size).floor().as_ivec2()
    }
}

/// Converts a tile coordinate into the world-space top-left corner of that tile.
pub fn tile_to_world(tile: IVec2, tile_size: f32) -> Vec2 {
    tile.as_vec2() * tile_size
}

/// Number of seconds needed to cross one tile.
pub fn move_duration(tile_size: f32, speed: f32) -> f32 {
    if speed > 0.0 {
        tile_size / speed
    } else {
        constants::movement::FALLBACK_DURATION
    }
}

/// An in-flight interpolation between two tile-aligned world positions.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct TileMovement {
    pub start: Vec2,
    pub target: Vec2,
    pub progress: f32,
    pub duration: f32,
    pub moving: bool,
}

impl TileMovement {
    pub fn begin(&mut self, start: Vec2, target: Vec2, duration: f32) {
        *self = Self {
            start,
            target,
            progress: 0.0,
            duration,
            moving: true,
        };
    }

    /// Aborts the current move, leaving the entity wherever it is placed next.
    pub fn cancel(&mut self) {
        self.moving = false;
        self.progress = 0.0;
    }

    /// Advances the move by `dt` seconds.
    ///
    /// Returns the interpolated position, or `None` if nothing is in flight. The
    /// second element is true on the call that completes the move; the position
    /// is then exactly the target.
    pub fn advance(&mut self, dt: f32) -> Option<(Vec2, bool)> {
        if !self.moving {
            return None;
        }

        self.progress += sanitize_dt(dt);
        if self.progress >= self.duration {
            self.progress = self.duration;
            self.moving = false;
            return Some((self.target, true));
        }

        let t = (self.progress / self.duration).min(1.0);
        Some((self.start + (self.target - self.start) * t, false))
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    /// Base speed, in pixels per second.
    pub speed: f32,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u8 {
        const PLAYER = 1 << 0;
        const HAZARD = 1 << 1;
        const ITEM = 1 << 2;
    }
}

/// An axis-aligned hitbox, offset from the owning entity's position.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub offset: Vec2,
    pub size: Vec2,
    pub layer: CollisionLayer,
    pub active: bool,
}

impl Collider {
    pub fn new(offset: Vec2, size: Vec2, layer: CollisionLayer) -> Self {
        Self {
            offset,
            size,
            layer,
            active: true,
        }
    }

    /// The world-space rectangle covered by this collider.
    pub fn hitbox(&self, position: &Position) -> Hitbox {
        let min = position.world + self.offset;
        Hitbox { min, max: min + self.size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    /// Strict overlap test; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.min.x < other.max.x && other.min.x < self.max.x && self.min.y < other.max.y && other.min.y < self.max.y
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub lives: i32,
    pub keys_collected: u32,
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cheats {
    pub god_mode: bool,
    pub no_clip: bool,
}

/// Post-hit protection window.
///
/// The timer is protective only strictly between zero and `duration`; zero means
/// "never hit" and anything at or past `duration` means the window elapsed.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Invulnerability {
    pub timer: f32,
    pub duration: f32,
}

impl Invulnerability {
    pub fn new(duration: f32) -> Self {
        Self { timer: 0.0, duration }
    }

    pub fn is_protective(&self) -> bool {
        self.timer > 0.0 && self.timer < self.duration
    }

    pub fn arm(&mut self) {
        self.timer = constants::player::INVULNERABILITY_EPSILON.min(self.duration / 2.0);
    }

    /// Runs the window forward; once it elapses the timer rests at zero.
    pub fn tick(&mut self, dt: f32) {
        if !self.is_protective() {
            return;
        }
        self.timer += sanitize_dt(dt);
        if self.timer >= self.duration {
            self.timer = 0.0;
        }
    }
}

/// The tile the player stood on before its latest move.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastSafeTile(pub IVec2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiState {
    #[default]
    Patrol,
    Chase,
    Retreat,
}

impl AiState {
    pub fn speed_multiplier(self) -> f32 {
        match self {
            AiState::Patrol => constants::enemy::PATROL_SPEED_MULTIPLIER,
            AiState::Chase => constants::enemy::CHASE_SPEED_MULTIPLIER,
            AiState::Retreat => constants::enemy::RETREAT_SPEED_MULTIPLIER,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyAi {
    pub state: AiState,
    /// In tiles.
    pub detection_range: f32,
    pub retreat_timer: f32,
    pub retreat_duration: f32,
    pub decision_cooldown: f32,
    pub decision_timer: f32,
}

impl EnemyAi {
    pub fn new(detection_range: f32, retreat_duration: f32, decision_cooldown: f32) -> Self {
        Self {
            state: AiState::Patrol,
            detection_range,
            retreat_timer: 0.0,
            retreat_duration,
            decision_cooldown,
            decision_timer: 0.0,
        }
    }

    /// Forces a chasing enemy to back off. Other states are left alone.
    pub fn bounce_back(&mut self) -> bool {
        if self.state != AiState::Chase {
            return false;
        }
        self.state = AiState::Retreat;
        self.retreat_timer = self.retreat_duration;
        true
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Item {
    pub is_key: bool,
    pub collected: bool,
}

/// A retractable spike that alternates between armed and retracted.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Spike {
    pub active: bool,
    pub interval: f32,
    pub timer: f32,
}

impl Spike {
    pub fn new(interval: f32) -> Self {
        Self {
            active: true,
            interval,
            timer: 0.0,
        }
    }

    /// Advances the duty cycle, flipping once per whole elapsed interval.
    pub fn advance(&mut self, dt: f32) {
        if self.interval <= 0.0 {
            return;
        }
        self.timer += sanitize_dt(dt);
        if !self.timer.is_finite() {
            self.timer = 0.0;
        }
        let flips = (f64::from(self.timer) / f64::from(self.interval)).floor() as u64;
        if flips >= 1 {
            if flips & 1 == 1 {
                self.active = !self.active;
            }
            self.timer = self.timer.rem_euclid(self.interval);
        }
    }
}

/// One half of a mechanism pair.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mechanism {
    pub id: char,
    pub kind: MechanismKind,
    pub active: bool,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MechanismTrigger;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MechanismTarget;

/// A number of frames shown for a fixed duration each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSet {
    pub frame_count: usize,
    pub frame_duration: f32,
}

impl FrameSet {
    pub const fn new(frame_count: usize, frame_duration: f32) -> Self {
        Self {
            frame_count,
            frame_duration,
        }
    }
}

/// Frame-timer driven sprite animation with separate walk and idle cycles.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub current_frame: usize,
    pub frame_timer: f32,
    pub walk: FrameSet,
    pub idle: FrameSet,
}

impl Animation {
    pub fn new(walk: FrameSet, idle: FrameSet) -> Self {
        Self {
            current_frame: 0,
            frame_timer: 0.0,
            walk,
            idle,
        }
    }

    /// Advances the animation, catching up on every whole frame interval that elapsed.
    pub fn advance(&mut self, dt: f32, moving: bool) {
        let set = if moving { self.walk } else { self.idle };
        if set.frame_count == 0 {
            self.current_frame = 0;
            return;
        }
        if set.frame_duration <= 0.0 {
            self.current_frame %= set.frame_count;
            return;
        }

        self.frame_timer += sanitize_dt(dt);
        if !self.frame_timer.is_finite() {
            self.frame_timer = 0.0;
        }
        let frames_to_advance = (self.frame_timer / set.frame_duration).floor();
        if frames_to_advance >= 1.0 {
            // Only the remainder matters once a full cycle has been skipped.
            let steps = (frames_to_advance % set.frame_count as f32) as usize;
            self.current_frame = (self.current_frame + steps) % set.frame_count;
            self.frame_timer = self.frame_timer.rem_euclid(set.frame_duration);
        } else {
            self.current_frame %= set.frame_count;
        }
    }
}

/// Presentation data the renderer needs; never interpreted by the simulation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub texture: TextureHandle,
    pub frame: usize,
    pub flip_x: bool,
}

impl Sprite {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            frame: 0,
            flip_x: false,
        }
    }

    /// Faces the sprite along a horizontal direction; vertical moves keep the current facing.
    pub fn face(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.flip_x = true,
            Direction::Right => self.flip_x = false,
            _ => {}
        }
    }
}
