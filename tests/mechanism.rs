use bevy_ecs::{query::Has, system::RunSystemOnce, world::World};
use glam::IVec2;
use speculoos::prelude::*;
use tilemaze::map::direction::Direction;
use tilemaze::map::mechanism::MechanismKind;
use tilemaze::systems::{mechanism_system, Mechanism, MechanismTarget, MechanismTrigger};

mod common;

/// `(id, is_trigger, active)` for every mechanism half, sorted.
fn halves(world: &mut World) -> Vec<(char, bool, bool)> {
    let mut halves: Vec<(char, bool, bool)> = world
        .query::<(&Mechanism, Has<MechanismTrigger>)>()
        .iter(world)
        .map(|(mechanism, is_trigger)| (mechanism.id, is_trigger, mechanism.active))
        .collect();
    halves.sort();
    halves
}

#[test]
fn test_spawns_both_halves() {
    let mut game = common::load_game("#######\n#PaAbB#\n#######");

    let targets = game.world.query::<&MechanismTarget>().iter(&game.world).count();
    assert_that(&targets).is_equal_to(2);
    assert_that(&halves(&mut game.world)).is_equal_to(vec![
        ('a', false, true),
        ('a', true, true),
        ('b', false, true),
        ('b', true, true),
    ]);
}

#[test]
fn test_trigger_deactivates_only_its_pair() {
    let mut game = common::load_game("#######\n#PaAbB#\n#######");
    let player = game.player();
    common::place_on_tile(&mut game.world, player, IVec2::new(2, 1));

    game.world
        .run_system_once(mechanism_system)
        .expect("System should run successfully");

    assert_that(&game.registry().is_active('a')).is_false();
    assert_that(&game.registry().is_active('b')).is_true();
    assert_that(&halves(&mut game.world)).is_equal_to(vec![
        ('a', false, false),
        ('a', true, false),
        ('b', false, true),
        ('b', true, true),
    ]);
}

#[test]
fn test_standing_on_target_does_nothing() {
    let mut game = common::load_game("#######\n#PaAbB#\n#######");
    let player = game.player();
    common::place_on_tile(&mut game.world, player, IVec2::new(5, 1));

    game.world.run_system_once(mechanism_system).unwrap();

    assert_that(&game.registry().is_active('b')).is_true();
}

#[test]
fn test_deactivation_is_permanent_and_idempotent() {
    let mut game = common::load_game("#######\n#PaAbB#\n#######");
    let player = game.player();
    common::place_on_tile(&mut game.world, player, IVec2::new(2, 1));

    game.world.run_system_once(mechanism_system).unwrap();
    game.world.run_system_once(mechanism_system).unwrap();
    common::place_on_tile(&mut game.world, player, IVec2::new(1, 1));
    game.world.run_system_once(mechanism_system).unwrap();

    assert_that(&game.registry().is_active('a')).is_false();
    assert_that(&game.registry().is_blocking_cell(IVec2::new(3, 1))).is_false();
}

#[test]
fn test_walking_through_a_chain_of_doors() {
    let mut game = common::load_game("#######\n#PaAbB#\n#######");

    common::walk(&mut game, Direction::Right);
    common::walk(&mut game, Direction::Right);
    common::walk(&mut game, Direction::Right);
    common::walk(&mut game, Direction::Right);

    assert_that(&game.player_tile()).is_equal_to(Some(IVec2::new(5, 1)));
    assert_that(&game.registry().iter().all(|state| !state.active)).is_true();
}

#[test]
fn test_door_opens_from_its_trigger() {
    let mut game = common::load_game("#######\n#.dPD.#\n#######\n\nd = Door\n");
    assert_that(&game.registry().get('d').unwrap().pair.kind).is_equal_to(MechanismKind::Door);

    // The door is shut: holding Right goes nowhere.
    game.input_mut().press(Direction::Right);
    for _ in 0..30 {
        game.tick(common::DT).unwrap();
    }
    game.input_mut().clear();
    assert_that(&game.player_tile()).is_equal_to(Some(IVec2::new(3, 1)));

    common::walk(&mut game, Direction::Left);
    assert_that(&game.registry().is_active('d')).is_false();

    common::walk(&mut game, Direction::Right);
    let end = common::walk(&mut game, Direction::Right);
    assert_that(&end).is_equal_to(IVec2::new(4, 1));
    assert_that(&game.player_tile()).is_equal_to(Some(IVec2::new(4, 1)));
}
