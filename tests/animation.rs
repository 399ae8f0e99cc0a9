use bevy_ecs::system::RunSystemOnce;
use glam::Vec2;
use speculoos::prelude::*;
use tilemaze::systems::{animation_system, Animation, FrameSet, Sprite, TileMovement};

mod common;

const WALK: FrameSet = FrameSet::new(4, 0.1);
const IDLE: FrameSet = FrameSet::new(2, 0.5);

#[test]
fn test_frame_stays_in_range_for_any_step() {
    for dt in [0.0, 0.05, 0.1, 0.35, 7.77, 1.0e6, f32::MAX, -1.0, f32::NAN, f32::INFINITY] {
        let mut animation = Animation::new(WALK, IDLE);
        animation.advance(dt, true);
        assert_that(&animation.current_frame).is_less_than(WALK.frame_count);
        assert_that(&animation.frame_timer.is_finite()).is_true();
    }
}

#[test]
fn test_catch_up_advances_several_frames() {
    let mut animation = Animation::new(WALK, IDLE);
    animation.advance(0.25, true);
    assert_that(&animation.current_frame).is_equal_to(2);

    // A whole cycle plus one frame.
    animation.advance(0.5, true);
    assert_that(&animation.current_frame).is_equal_to(3);
}

#[test]
fn test_switching_cycles_wraps_frame() {
    let mut animation = Animation::new(WALK, IDLE);
    animation.advance(0.35, true);
    assert_that(&animation.current_frame).is_equal_to(3);

    animation.advance(0.0, false);
    assert_that(&animation.current_frame).is_less_than(IDLE.frame_count);
}

#[test]
fn test_empty_frame_set_pins_frame_zero() {
    let mut animation = Animation::new(FrameSet::new(0, 0.1), IDLE);
    animation.current_frame = 3;
    animation.advance(10.0, true);
    assert_that(&animation.current_frame).is_equal_to(0);
}

#[test]
fn test_zero_duration_never_divides() {
    let mut animation = Animation::new(FrameSet::new(3, 0.0), IDLE);
    animation.current_frame = 5;
    animation.advance(1.0, true);
    assert_that(&animation.current_frame).is_less_than(3);
}

#[test]
fn test_system_mirrors_frame_onto_sprite() {
    let mut game = common::load_game("####\n#P.#\n####");
    let player = game.player();
    game.world
        .get_mut::<TileMovement>(player)
        .unwrap()
        .begin(Vec2::new(32.0, 32.0), Vec2::new(64.0, 32.0), 10.0);
    {
        let mut animation = game.world.get_mut::<Animation>(player).unwrap();
        animation.walk = WALK;
        animation.idle = IDLE;
    }

    common::set_delta(&mut game.world, 0.25);
    game.world
        .run_system_once(animation_system)
        .expect("System should run successfully");

    assert_that(&game.world.get::<Animation>(player).unwrap().current_frame).is_equal_to(2);
    assert_that(&game.world.get::<Sprite>(player).unwrap().frame).is_equal_to(2);
}
