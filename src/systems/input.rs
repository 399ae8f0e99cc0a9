use bevy_ecs::resource::Resource;
use bitflags::bitflags;

use crate::map::direction::Direction;

bitflags! {
    /// Direction keys held down during the current tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeldKeys: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl From<Direction> for HeldKeys {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => HeldKeys::UP,
            Direction::Down => HeldKeys::DOWN,
            Direction::Left => HeldKeys::LEFT,
            Direction::Right => HeldKeys::RIGHT,
        }
    }
}

/// Polled key state, written by the platform layer before each tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState(pub HeldKeys);

impl InputState {
    pub fn press(&mut self, direction: Direction) {
        self.0.insert(direction.into());
    }

    pub fn release(&mut self, direction: Direction) {
        self.0.remove(direction.into());
    }

    pub fn clear(&mut self) {
        self.0 = HeldKeys::empty();
    }

    pub fn is_down(&self, direction: Direction) -> bool {
        self.0.contains(direction.into())
    }

    /// The direction the player asked for. With several keys held, Up beats Down
    /// beats Left beats Right.
    pub fn intended_direction(&self) -> Option<Direction> {
        Direction::DIRECTIONS.into_iter().find(|&direction| self.is_down(direction))
    }
}
