use bevy_ecs::{entity::Entity, query::With, system::RunSystemOnce, world::World};
use glam::IVec2;
use speculoos::prelude::*;
use tilemaze::config::GameSettings;
use tilemaze::constants::TILE_SIZE;
use tilemaze::events::GameCommand;
use tilemaze::game::Game;
use tilemaze::map::builder::Map;
use tilemaze::systems::{
    enemy_ai_system, tile_to_world, update_ai_state, AiState, Enemy, EnemyAi, Position, TileMovement,
};

mod common;

fn enemy_entity(world: &mut World) -> Entity {
    world
        .query_filtered::<Entity, With<Enemy>>()
        .single(world)
        .expect("exactly one enemy")
}

fn enemy_tile(world: &mut World) -> IVec2 {
    let enemy = enemy_entity(world);
    world.get::<Position>(enemy).unwrap().tile(TILE_SIZE)
}

fn set_state(world: &mut World, state: AiState) {
    let enemy = enemy_entity(world);
    let mut ai = world.get_mut::<EnemyAi>(enemy).unwrap();
    ai.state = state;
    if state == AiState::Retreat {
        ai.retreat_timer = ai.retreat_duration;
    }
}

fn blind_settings() -> GameSettings {
    GameSettings {
        detection_range: 0.0,
        ..GameSettings::default()
    }
}

#[test]
fn test_patrol_spots_visible_player() {
    let map = Map::load("#P..E..#").unwrap();
    let mut ai = EnemyAi::new(5.0, 2.0, 0.25);

    update_ai_state(&mut ai, &map, IVec2::new(4, 0), IVec2::new(1, 0), common::DT);

    assert_that(&ai.state).is_equal_to(AiState::Chase);
}

#[test]
fn test_wall_hides_player() {
    let map = Map::load("#P.#E..#").unwrap();
    let mut ai = EnemyAi::new(5.0, 2.0, 0.25);

    update_ai_state(&mut ai, &map, IVec2::new(4, 0), IVec2::new(1, 0), common::DT);

    assert_that(&ai.state).is_equal_to(AiState::Patrol);
}

#[test]
fn test_player_out_of_range_is_ignored() {
    let map = Map::load("#P......E#").unwrap();
    let mut ai = EnemyAi::new(5.0, 2.0, 0.25);

    update_ai_state(&mut ai, &map, IVec2::new(8, 0), IVec2::new(1, 0), common::DT);

    assert_that(&ai.state).is_equal_to(AiState::Patrol);
}

#[test]
fn test_chase_lost_beyond_hysteresis() {
    let map = Map::load("###########\n#P.......E#\n###########").unwrap();
    let player = IVec2::new(1, 1);

    // Distance 7 is outside the detection range but inside the chase range.
    let mut ai = EnemyAi::new(5.0, 2.0, 0.25);
    ai.state = AiState::Chase;
    update_ai_state(&mut ai, &map, IVec2::new(8, 1), player, common::DT);
    assert_that(&ai.state).is_equal_to(AiState::Chase);

    update_ai_state(&mut ai, &map, IVec2::new(9, 1), player, common::DT);
    assert_that(&ai.state).is_equal_to(AiState::Patrol);
}

#[test]
fn test_chase_lost_without_sight() {
    let map = Map::load("#######\n#P.#.E#\n#######").unwrap();
    let mut ai = EnemyAi::new(5.0, 2.0, 0.25);
    ai.state = AiState::Chase;

    update_ai_state(&mut ai, &map, IVec2::new(5, 1), IVec2::new(1, 1), common::DT);

    assert_that(&ai.state).is_equal_to(AiState::Patrol);
}

#[test]
fn test_retreat_runs_out() {
    let map = Map::load("#P..E#").unwrap();
    let mut ai = EnemyAi::new(5.0, 2.0, 0.25);
    ai.state = AiState::Chase;
    assert_that(&ai.bounce_back()).is_true();
    assert_that(&ai.retreat_timer).is_equal_to(2.0);

    update_ai_state(&mut ai, &map, IVec2::new(4, 0), IVec2::new(1, 0), 1.5);
    assert_that(&ai.state).is_equal_to(AiState::Retreat);

    update_ai_state(&mut ai, &map, IVec2::new(4, 0), IVec2::new(1, 0), 0.6);
    assert_that(&ai.state).is_equal_to(AiState::Patrol);
    assert_that(&ai.retreat_timer).is_equal_to(0.0);
}

#[test]
fn test_bounce_back_only_from_chase() {
    let mut ai = EnemyAi::new(5.0, 2.0, 0.25);
    assert_that(&ai.bounce_back()).is_false();
    assert_that(&ai.state).is_equal_to(AiState::Patrol);
}

#[test]
fn test_chase_steps_toward_player() {
    let mut game = common::load_game("#P.E..#");
    set_state(&mut game.world, AiState::Chase);

    game.world
        .run_system_once(enemy_ai_system)
        .expect("System should run successfully");

    let enemy = enemy_entity(&mut game.world);
    let movement = *game.world.get::<TileMovement>(enemy).unwrap();
    assert_that(&movement.moving).is_true();
    assert_that(&movement.target).is_equal_to(tile_to_world(IVec2::new(2, 0), TILE_SIZE));
}

#[test]
fn test_retreat_steps_away_from_player() {
    let mut game = common::load_game("#P.E..#");
    set_state(&mut game.world, AiState::Retreat);

    game.world.run_system_once(enemy_ai_system).unwrap();

    let enemy = enemy_entity(&mut game.world);
    let movement = *game.world.get::<TileMovement>(enemy).unwrap();
    assert_that(&movement.target).is_equal_to(tile_to_world(IVec2::new(4, 0), TILE_SIZE));
}

#[test]
fn test_retreat_moves_faster_than_patrol() {
    let mut patrol = Game::load("#P.E..#", blind_settings()).unwrap();
    patrol.world.run_system_once(enemy_ai_system).unwrap();

    let mut retreat = Game::load("#P.E..#", blind_settings()).unwrap();
    set_state(&mut retreat.world, AiState::Retreat);
    retreat.world.run_system_once(enemy_ai_system).unwrap();

    let patrol_enemy = enemy_entity(&mut patrol.world);
    let retreat_enemy = enemy_entity(&mut retreat.world);
    let patrol_duration = patrol.world.get::<TileMovement>(patrol_enemy).unwrap().duration;
    let retreat_duration = retreat.world.get::<TileMovement>(retreat_enemy).unwrap().duration;
    assert_that(&retreat_duration).is_less_than(patrol_duration);
}

#[test]
fn test_enemy_never_enters_exit_or_targets() {
    let source = "#####\n#.X.#\n#XED#\n#.X.#\n#P#d#\n#####";
    let mut game = common::load_game(source);
    let start = enemy_tile(&mut game.world);

    for _ in 0..600 {
        game.tick(common::DT).unwrap();
        let enemy = enemy_entity(&mut game.world);
        assert_that(&game.world.get::<TileMovement>(enemy).unwrap().moving).is_false();
        assert_that(&enemy_tile(&mut game.world)).is_equal_to(start);
    }
}

#[test]
fn test_patrol_takes_the_only_exit() {
    let source = "#####\n##X##\n#XE.#\n##X##\n#P..#\n#####";
    let mut game = Game::load(source, blind_settings()).unwrap();

    game.world.run_system_once(enemy_ai_system).unwrap();

    let enemy = enemy_entity(&mut game.world);
    let movement = *game.world.get::<TileMovement>(enemy).unwrap();
    assert_that(&movement.moving).is_true();
    assert_that(&movement.target).is_equal_to(tile_to_world(IVec2::new(3, 2), TILE_SIZE));
}

#[test]
fn test_decision_cooldown_delays_next_move() {
    let mut game = Game::load("#P......E.#", blind_settings()).unwrap();
    let enemy = enemy_entity(&mut game.world);

    game.world.run_system_once(enemy_ai_system).unwrap();
    assert_that(&game.world.get::<TileMovement>(enemy).unwrap().moving).is_true();

    // Put the enemy back at rest; the cooldown must still hold it.
    common::place_on_tile(&mut game.world, enemy, IVec2::new(8, 0));
    common::set_delta(&mut game.world, 0.1);
    game.world.run_system_once(enemy_ai_system).unwrap();
    assert_that(&game.world.get::<TileMovement>(enemy).unwrap().moving).is_false();

    common::set_delta(&mut game.world, 0.2);
    game.world.run_system_once(enemy_ai_system).unwrap();
    assert_that(&game.world.get::<TileMovement>(enemy).unwrap().moving).is_true();
}

#[test]
fn test_frozen_enemies_hold_still() {
    let mut game = Game::load("#P.....E..#", blind_settings()).unwrap();
    let start = enemy_tile(&mut game.world);

    game.send_command(GameCommand::ToggleFreezeEnemies);
    for _ in 0..240 {
        game.tick(common::DT).unwrap();
    }

    assert_that(&enemy_tile(&mut game.world)).is_equal_to(start);
}

#[test]
fn test_same_seed_same_patrol() {
    let source = "#########\n#P......#\n#.......#\n#...E...#\n#.......#\n#########";
    let trace = |seed: u64| {
        let mut game = Game::load(source, blind_settings().with_seed(seed)).unwrap();
        (0..300)
            .map(|_| {
                game.tick(common::DT).unwrap();
                enemy_tile(&mut game.world)
            })
            .collect::<Vec<_>>()
    };

    assert_that(&trace(42)).is_equal_to(trace(42));
}
