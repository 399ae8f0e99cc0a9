//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources. Systems are listed here roughly in the order they run each tick.

pub mod animation;
pub mod bundles;
pub mod collision;
pub mod components;
pub mod dev;
pub mod enemy;
pub mod input;
pub mod mechanism;
pub mod movement;
pub mod player;
pub mod spike;
pub mod state;

pub use self::animation::*;
pub use self::bundles::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::dev::*;
pub use self::enemy::*;
pub use self::input::*;
pub use self::mechanism::*;
pub use self::movement::*;
pub use self::player::*;
pub use self::spike::*;
pub use self::state::*;
