//! This module contains the main game logic and state.

use bevy_ecs::change_detection::Mut;
use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use tracing::{debug, debug_span, error, info, trace, warn};

use crate::config::GameSettings;
use crate::constants::{self, animation};
use crate::error::{GameError, GameResult};
use crate::events::GameCommand;
use crate::map::builder::Map;
use crate::map::mechanism::MechanismRegistry;
use crate::systems::{
    animation_system, collision_system, dev_command_system, enemy_ai_system, invulnerability_system, level_clock_system,
    mechanism_system, movement_system, outcome_system, player_control_system, spike_system, Animation, Cheats, Collider,
    CollisionLayer, DeltaTime, DevToggles, Enemy, EnemyAi, EnemyBundle, EnemyRng, InputState, Invulnerability, Item,
    ItemBundle, LastSafeTile, LevelClock, LevelInfo, LevelOutcome, Mechanism, MechanismBundle, MechanismTarget,
    MechanismTrigger, PlayerBundle, PlayerControlled, Position, Spike, SpikeBundle, Sprite, Stats, TileMovement, Velocity,
};
use crate::texture::SpriteTextures;

/// Phases of a simulation tick, run strictly one after another.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Developer commands, player input and enemy decisions
    Input,
    /// Timers and interpolation
    Update,
    /// Collisions and the mechanisms they trigger
    Resolve,
    /// Level clock and end-of-level checks
    Respond,
}

/// Core simulation state for one level, built on the Bevy ECS architecture.
///
/// The `World` owns every entity, component and resource; the `Schedule` runs
/// the gameplay systems in a fixed order on a single thread. Once a
/// [`LevelOutcome`] has been published the level no longer advances.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    player: Entity,
    ticks: u64,
}

impl Game {
    /// Builds the world for `map`: resources, the player, enemies, keys, spikes
    /// and both halves of every mechanism.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidState` if the settings cannot describe a
    /// playable level (non-positive tile size or starting lives).
    pub fn new(map: Map, settings: GameSettings, level: LevelInfo, textures: SpriteTextures) -> GameResult<Game> {
        if !(settings.tile_size.is_finite() && settings.tile_size > 0.0) {
            return Err(GameError::InvalidState(format!(
                "Tile size must be positive, got {}",
                settings.tile_size
            )));
        }
        if settings.start_lives <= 0 {
            return Err(GameError::InvalidState(format!(
                "Starting lives must be positive, got {}",
                settings.start_lives
            )));
        }

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, map, settings, level);
        Self::configure_schedule(&mut schedule);

        let player = Self::spawn_player(&mut world, &textures);
        Self::spawn_enemies(&mut world, &textures);
        Self::spawn_items(&mut world, &textures);
        Self::spawn_spikes(&mut world, &textures);
        Self::spawn_mechanisms(&mut world, &textures);

        info!(
            level = level.index,
            levels = level.count,
            entities = world.entities().len(),
            "Level initialized"
        );

        Ok(Game {
            world,
            schedule,
            player,
            ticks: 0,
        })
    }

    /// Parses `source` and builds a single-level game without textures.
    pub fn load(source: &str, settings: GameSettings) -> GameResult<Game> {
        let map = Map::load(source)?;
        Self::new(map, settings, LevelInfo::default(), SpriteTextures::default())
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameCommand>(world);
    }

    fn insert_resources(world: &mut World, map: Map, settings: GameSettings, level: LevelInfo) {
        world.insert_resource(MechanismRegistry::new(&map.mechanisms));
        world.insert_resource(EnemyRng::from_seed(settings.seed));
        world.insert_resource(LevelClock::new(settings.time_limit));
        world.insert_resource(map);
        world.insert_resource(settings);
        world.insert_resource(level);
        world.insert_resource(DeltaTime::default());
        world.insert_resource(InputState::default());
        world.insert_resource(DevToggles::default());
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        schedule
            .add_systems((
                (dev_command_system, player_control_system, enemy_ai_system)
                    .chain()
                    .in_set(GameplaySet::Input),
                (movement_system, animation_system, spike_system, invulnerability_system)
                    .chain()
                    .in_set(GameplaySet::Update),
                (collision_system, mechanism_system).chain().in_set(GameplaySet::Resolve),
                (level_clock_system, outcome_system).chain().in_set(GameplaySet::Respond),
            ))
            .configure_sets(
                (
                    GameplaySet::Input,
                    GameplaySet::Update,
                    GameplaySet::Resolve,
                    GameplaySet::Respond,
                )
                    .chain(),
            );
    }

    fn spawn_player(world: &mut World, textures: &SpriteTextures) -> Entity {
        let (spawn, settings) = {
            let map = world.resource::<Map>();
            (map.player_spawn, world.resource::<GameSettings>().clone())
        };

        let player = world
            .spawn(PlayerBundle {
                player: PlayerControlled,
                position: Position::at_tile(spawn, settings.tile_size),
                movement: TileMovement::default(),
                velocity: Velocity {
                    speed: settings.player_speed,
                },
                collider: Collider::new(
                    constants::collider::PLAYER_OFFSET,
                    constants::collider::PLAYER_SIZE,
                    CollisionLayer::PLAYER,
                ),
                stats: Stats {
                    lives: settings.start_lives,
                    keys_collected: 0,
                },
                cheats: Cheats::default(),
                invulnerability: Invulnerability::new(settings.invulnerability_duration),
                last_safe_tile: LastSafeTile(spawn),
                animation: Animation::new(animation::PLAYER_WALK, animation::PLAYER_IDLE),
                sprite: Sprite::new(textures.player),
            })
            .id();

        trace!(entity = ?player, ?spawn, "Spawned player entity");
        player
    }

    fn spawn_enemies(world: &mut World, textures: &SpriteTextures) {
        let (spawns, settings) = {
            let map = world.resource::<Map>();
            (map.enemy_spawns.clone(), world.resource::<GameSettings>().clone())
        };

        for spawn in spawns {
            let enemy = world
                .spawn(EnemyBundle {
                    enemy: Enemy,
                    position: Position::at_tile(spawn, settings.tile_size),
                    movement: TileMovement::default(),
                    velocity: Velocity {
                        speed: settings.enemy_speed,
                    },
                    collider: Collider::new(
                        constants::collider::ENEMY_OFFSET,
                        constants::collider::ENEMY_SIZE,
                        CollisionLayer::HAZARD,
                    ),
                    ai: EnemyAi::new(
                        settings.detection_range,
                        settings.retreat_duration,
                        settings.decision_cooldown,
                    ),
                    animation: Animation::new(animation::ENEMY_WALK, animation::ENEMY_IDLE),
                    sprite: Sprite::new(textures.enemy),
                })
                .id();
            trace!(entity = ?enemy, ?spawn, "Spawned enemy entity");
        }
    }

    fn spawn_items(world: &mut World, textures: &SpriteTextures) {
        let (keys, tile_size) = {
            let map = world.resource::<Map>();
            (map.keys.clone(), world.resource::<GameSettings>().tile_size)
        };

        debug!(key_count = keys.len(), "Spawning keys");
        for tile in keys {
            world.spawn(ItemBundle {
                position: Position::at_tile(tile, tile_size),
                collider: Collider::new(
                    constants::collider::KEY_OFFSET,
                    constants::collider::KEY_SIZE,
                    CollisionLayer::ITEM,
                ),
                item: Item {
                    is_key: true,
                    collected: false,
                },
                sprite: Sprite::new(textures.key),
            });
        }
    }

    fn spawn_spikes(world: &mut World, textures: &SpriteTextures) {
        let (spikes, settings) = {
            let map = world.resource::<Map>();
            (map.spikes.clone(), world.resource::<GameSettings>().clone())
        };

        debug!(spike_count = spikes.len(), "Spawning spikes");
        for tile in spikes {
            let spike = Spike::new(settings.spike_interval);
            let mut collider = Collider::new(
                constants::collider::SPIKE_OFFSET,
                constants::collider::SPIKE_SIZE,
                CollisionLayer::HAZARD,
            );
            collider.active = spike.active;

            world.spawn(SpikeBundle {
                position: Position::at_tile(tile, settings.tile_size),
                collider,
                spike,
                sprite: Sprite::new(textures.spike),
            });
        }
    }

    fn spawn_mechanisms(world: &mut World, textures: &SpriteTextures) {
        let (pairs, tile_size) = {
            let map = world.resource::<Map>();
            (map.mechanisms.clone(), world.resource::<GameSettings>().tile_size)
        };

        for pair in pairs {
            let mechanism = Mechanism {
                id: pair.id,
                kind: pair.kind,
                active: true,
            };

            world.spawn((
                MechanismBundle {
                    position: Position::at_tile(pair.trigger, tile_size),
                    mechanism,
                    sprite: Sprite::new(textures.trigger),
                },
                MechanismTrigger,
            ));
            world.spawn((
                MechanismBundle {
                    position: Position::at_tile(pair.target, tile_size),
                    mechanism,
                    sprite: Sprite::new(textures.target(pair.kind)),
                },
                MechanismTarget,
            ));

            trace!(id = %pair.id, kind = pair.kind.as_ref(), trigger = ?pair.trigger, target = ?pair.target, "Spawned mechanism pair");
        }
    }

    /// Queues a developer command for the next tick.
    pub fn send_command(&mut self, command: GameCommand) {
        if self.world.send_event(command).is_none() {
            warn!(?command, "Developer command could not be queued");
        }
    }

    /// Input state read by the next tick.
    pub fn input_mut(&mut self) -> Mut<'_, InputState> {
        self.world.resource_mut::<InputState>()
    }

    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.world.get_resource::<LevelOutcome>().copied()
    }

    pub fn map(&self) -> &Map {
        self.world.resource::<Map>()
    }

    pub fn registry(&self) -> &MechanismRegistry {
        self.world.resource::<MechanismRegistry>()
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    /// The player's current tile.
    pub fn player_tile(&self) -> Option<glam::IVec2> {
        let tile_size = self.world.resource::<GameSettings>().tile_size;
        self.world
            .get::<Position>(self.player)
            .map(|position| position.tile(tile_size))
    }

    pub fn player_stats(&self) -> Option<Stats> {
        self.world.get::<Stats>(self.player).copied()
    }

    /// Number of ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Executes one frame of game logic by running all scheduled ECS systems.
    ///
    /// `dt` is the elapsed time in seconds; negative and non-finite values count
    /// as zero. Once the level has an outcome this is a no-op that keeps
    /// returning it.
    ///
    /// # Errors
    ///
    /// Returns the first error a system reported during the tick. Every
    /// reported error is logged.
    pub fn tick(&mut self, dt: f32) -> GameResult<Option<LevelOutcome>> {
        if let Some(outcome) = self.outcome() {
            return Ok(Some(outcome));
        }

        self.world.insert_resource(DeltaTime::from_seconds(dt));

        {
            let _span = debug_span!("tick", n = self.ticks).entered();
            self.schedule.run(&mut self.world);
        }
        self.ticks += 1;

        if let Some(mut commands) = self.world.get_resource_mut::<Events<GameCommand>>() {
            commands.update();
        }

        let errors: Vec<GameError> = self
            .world
            .get_resource_mut::<Events<GameError>>()
            .map(|mut events| events.drain().collect())
            .unwrap_or_default();

        let mut errors = errors.into_iter();
        if let Some(first) = errors.next() {
            error!(tick = self.ticks, error = %first, "System reported an error");
            for other in errors {
                error!(tick = self.ticks, error = %other, "System reported an error");
            }
            return Err(first);
        }

        let outcome = self.outcome();
        if let Some(outcome) = outcome {
            info!(tick = self.ticks, outcome = ?outcome.kind, final_level = outcome.final_level_completed, "Level finished");
        }
        Ok(outcome)
    }
}
