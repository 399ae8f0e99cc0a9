use bevy_ecs::prelude::*;

/// Developer and cheat commands, applied at the start of the next tick.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum GameCommand {
    ToggleGodMode,
    ToggleNoClip,
    ToggleFreezeEnemies,
    ToggleInfiniteTime,
    AddKey,
    AddLife,
    /// Extends the level clock by the given number of seconds.
    AddTime(f32),
}
