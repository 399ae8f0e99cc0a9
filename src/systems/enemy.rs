use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::IVec2;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};

use crate::config::GameSettings;
use crate::constants;
use crate::error::GameError;
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::map::mechanism::MechanismRegistry;
use crate::systems::dev::DevToggles;
use crate::systems::{
    move_duration, tile_to_world, AiState, DeltaTime, Enemy, EnemyAi, PlayerControlled, Position, Sprite, TileMovement,
    Velocity,
};

/// Random source for patrol decisions, seeded per run so that runs can be replayed.
#[derive(Resource, Debug, Clone)]
pub struct EnemyRng(pub SmallRng);

impl EnemyRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

/// Candidate directions for chasing (or, with `delta` negated, fleeing) a target.
///
/// The dominant axis comes first, then the secondary axis toward and away, and
/// finally a step back along the dominant axis. Ties favour the horizontal axis.
pub fn priority_directions(delta: IVec2) -> SmallVec<[Direction; 4]> {
    let (primary, secondary) = if delta.x.abs() >= delta.y.abs() {
        (Direction::horizontal(delta.x), Direction::vertical(delta.y))
    } else {
        (Direction::vertical(delta.y), Direction::horizontal(delta.x))
    };

    smallvec![primary, secondary, secondary.opposite(), primary.opposite()]
}

/// Applies the sight-driven state transitions for one enemy.
///
/// Patrol turns into Chase when the player is within range and visible; Chase
/// falls back to Patrol once the player is well out of range or hidden; Retreat
/// runs out its timer and then patrols again.
pub fn update_ai_state(ai: &mut EnemyAi, map: &Map, tile: IVec2, player_tile: IVec2, dt: f32) {
    let distance = (player_tile - tile).as_vec2().length();

    match ai.state {
        AiState::Patrol => {
            if distance <= ai.detection_range && map.line_of_sight(tile, player_tile) {
                ai.state = AiState::Chase;
                debug!(?tile, distance, "Enemy spotted the player");
            }
        }
        AiState::Chase => {
            let lost_range = distance > ai.detection_range * constants::enemy::LOSE_SIGHT_FACTOR;
            if lost_range || !map.line_of_sight(tile, player_tile) {
                ai.state = AiState::Patrol;
                debug!(?tile, distance, "Enemy lost the player");
            }
        }
        AiState::Retreat => {
            ai.retreat_timer -= dt;
            if ai.retreat_timer <= 0.0 {
                ai.retreat_timer = 0.0;
                ai.state = AiState::Patrol;
                debug!(?tile, "Enemy finished retreating");
            }
        }
    }
}

/// Autonomous enemy AI: one state update per tick and one tile step per decision.
///
/// Decisions are taken only while the enemy stands still and its decision timer
/// has run out. Patrol picks a shuffled valid neighbour; Chase and Retreat walk
/// the [`priority_directions`] toward or away from the player. A neighbour is
/// valid if enemies may walk on it and no active mechanism target occupies it.
#[allow(clippy::too_many_arguments)]
pub fn enemy_ai_system(
    map: Res<Map>,
    registry: Res<MechanismRegistry>,
    settings: Res<GameSettings>,
    delta_time: Res<DeltaTime>,
    toggles: Res<DevToggles>,
    mut rng: ResMut<EnemyRng>,
    player: Query<&Position, With<PlayerControlled>>,
    mut enemies: Query<
        (
            Entity,
            &Position,
            &mut EnemyAi,
            &mut TileMovement,
            &Velocity,
            Option<&mut Sprite>,
        ),
        (With<Enemy>, Without<PlayerControlled>),
    >,
    mut errors: EventWriter<GameError>,
) {
    if toggles.freeze_enemies {
        return;
    }

    let player_tile = match player.single() {
        Ok(position) => position.tile(settings.tile_size),
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for enemy AI system: {}",
                e
            )));
            return;
        }
    };

    let dt = delta_time.seconds;
    let can_enter = |tile: IVec2| map.is_walkable_for_enemy(tile.x, tile.y) && !registry.is_blocking_cell(tile);

    for (entity, position, mut ai, mut movement, velocity, sprite) in enemies.iter_mut() {
        let tile = position.tile(settings.tile_size);
        update_ai_state(&mut ai, &map, tile, player_tile, dt);

        ai.decision_timer = (ai.decision_timer - dt).max(0.0);
        if movement.moving || ai.decision_timer > 0.0 {
            continue;
        }
        ai.decision_timer = ai.decision_cooldown;

        let direction = match ai.state {
            AiState::Patrol => {
                let mut directions = Direction::DIRECTIONS;
                directions.shuffle(&mut rng.0);
                directions.into_iter().find(|d| can_enter(tile + d.as_ivec2()))
            }
            AiState::Chase => priority_directions(player_tile - tile)
                .into_iter()
                .find(|d| can_enter(tile + d.as_ivec2())),
            AiState::Retreat => priority_directions(tile - player_tile)
                .into_iter()
                .find(|d| can_enter(tile + d.as_ivec2())),
        };

        let Some(direction) = direction else {
            trace!(entity = ?entity, ?tile, state = ?ai.state, "Enemy has nowhere to go");
            continue;
        };

        let target = tile + direction.as_ivec2();
        if let Some(mut sprite) = sprite {
            sprite.face(direction);
        }

        let duration = move_duration(settings.tile_size, velocity.speed) / ai.state.speed_multiplier();
        movement.begin(
            tile_to_world(tile, settings.tile_size),
            tile_to_world(target, settings.tile_size),
            duration,
        );
        trace!(entity = ?entity, ?tile, ?target, state = ?ai.state, "Enemy move started");
    }
}
