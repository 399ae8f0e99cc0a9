#![allow(dead_code)]

use bevy_ecs::{entity::Entity, query::With, world::World};
use glam::IVec2;
use tilemaze::{
    config::GameSettings,
    constants::TILE_SIZE,
    game::Game,
    map::direction::Direction,
    systems::{tile_to_world, DeltaTime, Invulnerability, LevelOutcome, PlayerControlled, Position, TileMovement},
};

/// Frame time used by the end-to-end tests.
pub const DT: f32 = 1.0 / 60.0;

pub fn load_game(source: &str) -> Game {
    Game::load(source, GameSettings::default()).expect("test level should load")
}

pub fn set_delta(world: &mut World, seconds: f32) {
    world.insert_resource(DeltaTime::from_seconds(seconds));
}

pub fn player_entity(world: &mut World) -> Entity {
    world
        .query_filtered::<Entity, With<PlayerControlled>>()
        .single(world)
        .expect("exactly one player")
}

pub fn player_tile(world: &mut World) -> IVec2 {
    let player = player_entity(world);
    world.get::<Position>(player).expect("player has a position").tile(TILE_SIZE)
}

/// Teleports an entity onto `tile`, cancelling any move in flight.
pub fn place_on_tile(world: &mut World, entity: Entity, tile: IVec2) {
    if let Some(mut position) = world.get_mut::<Position>(entity) {
        position.world = tile_to_world(tile, TILE_SIZE);
    }
    if let Some(mut movement) = world.get_mut::<TileMovement>(entity) {
        movement.cancel();
    }
}

pub fn player_moving(world: &mut World) -> bool {
    let player = player_entity(world);
    world.get::<TileMovement>(player).is_some_and(|movement| movement.moving)
}

/// Clears the player's invulnerability so the next hazard hit counts.
pub fn reset_invulnerability(world: &mut World) {
    let player = player_entity(world);
    if let Some(mut invulnerability) = world.get_mut::<Invulnerability>(player) {
        invulnerability.timer = 0.0;
    }
}

/// Ticks until `done` holds or `max_ticks` run out. Returns whether `done` held.
pub fn tick_until(game: &mut Game, max_ticks: usize, mut done: impl FnMut(&mut Game) -> bool) -> bool {
    for _ in 0..max_ticks {
        game.tick(DT).expect("tick should not fail");
        if done(game) {
            return true;
        }
    }
    false
}

/// Holds `direction` until the player has come to rest on the next tile.
pub fn walk(game: &mut Game, direction: Direction) -> IVec2 {
    let from = game.player_tile().expect("player exists");
    let expected = from + direction.as_ivec2();

    game.input_mut().clear();
    game.input_mut().press(direction);
    let arrived = tick_until(game, 120, |game| {
        game.outcome().is_some() || (game.player_tile() == Some(expected) && !player_moving(&mut game.world))
    });
    game.input_mut().clear();

    assert!(arrived, "player never reached {expected:?} walking {direction:?} from {from:?}");
    expected
}

pub fn outcome(world: &World) -> Option<LevelOutcome> {
    world.get_resource::<LevelOutcome>().copied()
}
