//! Explicit game context
//!
//! Everything the gameplay rules touch (pool, clock, deferred tasks, random
//! source, collaborators) lives in one [`GameContext`] that is passed by
//! `&mut`. There are no globals; tests build a context with stub
//! collaborators through [`GameContextBuilder`].

use rand::{rngs::StdRng, SeedableRng};
use rust_engine::events::{TaskHandle, TaskScheduler};
use rust_engine::foundation::math::{Rect, Vec2};
use rust_engine::foundation::time::GameClock;
use rust_engine::physics::{
    BodyDesc, ColliderId, CollisionLayers, CollisionWorld, PhysicsService, Shape2,
};

use crate::config::GameConfig;
use crate::entity::{EntityId, FlyingObject, FlyingObjectKind};
use crate::error::{GameError, GameResult};
use crate::highscore::HighscoreBoard;
use crate::pool::{EntityPool, PoolKey};
use crate::services::{HighscoreStore, NullPresentation, Presentation};
use crate::session::Session;
use crate::viewport::Viewport;

/// Gameplay tag attached to every collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderTag {
    /// The visible play area surface
    Viewport,
    /// Player, alien or asteroid
    FlyingObject,
    /// A missile
    Missile,
    /// Static geometry that blocks spawning
    Obstacle,
}

/// Work an entity schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTask {
    /// Periodic containment probe
    VerifyInViewport,
    /// Alien course change
    ChangeVelocityRandomly,
    /// End of the player's invulnerability window
    ClearIndestructible,
}

/// Deferred task payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameTask {
    /// Task owned by one activation of an entity; dropped when the entity's
    /// generation has moved on
    Entity {
        /// Owning entity
        id: EntityId,
        /// Generation at scheduling time
        generation: u32,
        /// What to run
        task: EntityTask,
    },
    /// Recurring alien spawn attempt owned by the session
    SpawnAlien,
}

/// Shared state threaded through every gameplay operation
pub struct GameContext {
    pub(crate) config: GameConfig,
    pub(crate) clock: GameClock,
    pub(crate) pool: EntityPool,
    pub(crate) tasks: TaskScheduler<GameTask>,
    pub(crate) rng: StdRng,
    pub(crate) viewport: Viewport,
    pub(crate) session: Session,
    pub(crate) physics: Box<dyn PhysicsService<ColliderTag>>,
    pub(crate) presentation: Box<dyn Presentation>,
    pub(crate) highscores: Box<dyn HighscoreStore>,
    player: EntityId,
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("now", &self.clock.now())
            .field("entities", &self.pool.len())
            .field("pending_tasks", &self.tasks.len())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl GameContext {
    /// Context with the reference physics world and no-op collaborators
    pub fn new(config: GameConfig) -> GameResult<Self> {
        GameContextBuilder::new(config).build()
    }

    /// Start configuring a context
    pub fn builder(config: GameConfig) -> GameContextBuilder {
        GameContextBuilder::new(config)
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current simulation time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Simulation clock
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Entity pool
    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    /// Visible play area
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Physics collaborator
    pub fn physics(&self) -> &dyn PhysicsService<ColliderTag> {
        self.physics.as_ref()
    }

    /// The single player ship
    pub fn player_id(&self) -> EntityId {
        self.player
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&FlyingObject> {
        self.pool.get(id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut FlyingObject> {
        self.pool.get_mut(id)
    }

    /// Ids of active entities pooled under `key`
    pub fn active_ids(&self, key: PoolKey) -> Vec<EntityId> {
        self.pool
            .ids(key)
            .iter()
            .copied()
            .filter(|id| self.pool.get(*id).is_some_and(|o| o.active))
            .collect()
    }

    /// Number of active asteroids of every size
    pub fn active_asteroid_count(&self) -> usize {
        self.pool
            .iter()
            .filter(|(_, o)| o.active && o.kind() == Some(FlyingObjectKind::Asteroid))
            .count()
    }

    /// Deferred tasks still live for the entity's current activation
    pub fn pending_tasks_for(&self, id: EntityId) -> usize {
        let Some(current) = self.pool.get(id).map(|o| o.generation) else {
            return 0;
        };
        self.tasks
            .pending()
            .filter(|task| {
                matches!(task, GameTask::Entity { id: owner, generation, .. }
                    if *owner == id && *generation == current)
            })
            .count()
    }

    /// Live tasks of one kind owned by the entity's current activation
    pub fn pending_task_count(&self, id: EntityId, kind: EntityTask) -> usize {
        let Some(current) = self.pool.get(id).map(|o| o.generation) else {
            return 0;
        };
        self.tasks
            .pending()
            .filter(|task| {
                matches!(task, GameTask::Entity { id: owner, generation, task }
                    if *owner == id && *generation == current && *task == kind)
            })
            .count()
    }

    /// Advance the clock by `delta` seconds and run every task that fell due
    pub fn advance_time(&mut self, delta: f32) {
        self.clock.advance(delta);
        self.run_due_tasks();
    }

    /// Run deferred tasks due at the current time
    pub fn run_due_tasks(&mut self) {
        for (_, task) in self.tasks.drain_due(self.clock.now()) {
            match task {
                GameTask::SpawnAlien => self.on_alien_spawn_timer(),
                GameTask::Entity { id, generation, task } => {
                    match self.pool.get(id).map(|o| o.generation) {
                        Some(current) if current == generation => {}
                        Some(_) => {
                            log::trace!("Dropping stale {:?} for {:?}", task, id);
                            continue;
                        }
                        None => {
                            log::warn!("Deferred {:?} for unknown entity {:?}", task, id);
                            continue;
                        }
                    }

                    match task {
                        EntityTask::VerifyInViewport => self.verify_in_viewport(id),
                        EntityTask::ChangeVelocityRandomly => self.change_velocity_randomly(id),
                        EntityTask::ClearIndestructible => self.clear_indestructible(id),
                    }
                }
            }
        }
    }

    /// Schedule `task` for the entity's current activation
    pub(crate) fn schedule_entity_task(
        &mut self,
        id: EntityId,
        delay: f32,
        task: EntityTask,
    ) -> Option<TaskHandle> {
        let generation = self.pool.get(id)?.generation;
        Some(self.tasks.schedule_once(
            self.clock.now(),
            delay,
            GameTask::Entity { id, generation, task },
        ))
    }

    /// Take an inactive instance from the pool, registering a collider for
    /// freshly built ones
    pub(crate) fn acquire(&mut self, key: PoolKey) -> GameResult<EntityId> {
        let acquired = self.pool.acquire(key)?;
        if acquired.created {
            self.register_entity_body(acquired.id);
        }
        Ok(acquired.id)
    }

    fn register_entity_body(&mut self, id: EntityId) {
        let Some(object) = self.pool.get(id) else {
            return;
        };

        let (layer, mask, tag) = if object.missile_state().is_some() {
            (CollisionLayers::MISSILE, CollisionLayers::FLYING_OBJECT, ColliderTag::Missile)
        } else {
            (
                CollisionLayers::FLYING_OBJECT,
                CollisionLayers::FLYING_OBJECT | CollisionLayers::MISSILE,
                ColliderTag::FlyingObject,
            )
        };

        self.physics.register_body(
            id.collider(),
            BodyDesc {
                shape: Shape2::Circle { radius: object.radius },
                layer,
                mask,
                tag,
                position: object.position,
                enabled: object.active,
            },
        );
    }

    /// Push the entity's position and active flag to the physics service
    pub(crate) fn sync_body(&mut self, id: EntityId) {
        if let Some(object) = self.pool.get(id) {
            self.physics.set_body_state(id.collider(), object.position, object.active);
        }
    }

    /// Push every entity's state to the physics service
    pub fn sync_bodies(&mut self) {
        for (id, object) in self.pool.iter() {
            self.physics.set_body_state(id.collider(), object.position, object.active);
        }
    }
}

/// Builder for [`GameContext`]
pub struct GameContextBuilder {
    config: GameConfig,
    physics: Option<Box<dyn PhysicsService<ColliderTag>>>,
    presentation: Option<Box<dyn Presentation>>,
    highscores: Option<Box<dyn HighscoreStore>>,
    obstacles: Vec<Rect>,
}

impl GameContextBuilder {
    /// Builder with default collaborators
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            physics: None,
            presentation: None,
            highscores: None,
            obstacles: Vec::new(),
        }
    }

    /// Use a custom physics service
    #[must_use]
    pub fn physics(mut self, physics: impl PhysicsService<ColliderTag> + 'static) -> Self {
        self.physics = Some(Box::new(physics));
        self
    }

    /// Use a custom presentation service
    #[must_use]
    pub fn presentation(mut self, presentation: impl Presentation + 'static) -> Self {
        self.presentation = Some(Box::new(presentation));
        self
    }

    /// Use a custom highscore store
    #[must_use]
    pub fn highscores(mut self, highscores: impl HighscoreStore + 'static) -> Self {
        self.highscores = Some(Box::new(highscores));
        self
    }

    /// Add a static rectangle where nothing may spawn
    #[must_use]
    pub fn obstacle(mut self, rect: Rect) -> Self {
        self.obstacles.push(rect);
        self
    }

    /// Validate the configuration and wire everything up
    ///
    /// # Errors
    ///
    /// [`GameError::Configuration`] if the configuration is invalid or a pool
    /// key ends up without a prototype.
    pub fn build(self) -> GameResult<GameContext> {
        let config = self.config;
        config.validate()?;

        let mut pool = EntityPool::new();
        pool.register_prototype(FlyingObject::player(&config.player));
        pool.register_prototype(FlyingObject::alien(&config.alien));
        for asteroid in &config.asteroids {
            pool.register_prototype(FlyingObject::asteroid(asteroid));
        }
        for missile in &config.missiles {
            pool.register_prototype(FlyingObject::missile(missile));
        }
        check_prototypes(&pool)?;

        let rng = match config.session.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let viewport = Viewport::new(&config.viewport);
        let highscore_length = config.highscore_list_length;
        let mut physics = self
            .physics
            .unwrap_or_else(|| Box::new(CollisionWorld::<ColliderTag>::new()));

        let mut static_id = EntityId::STATIC_COLLIDER_BASE;
        physics.register_body(
            ColliderId(static_id),
            static_box(viewport.rect(), CollisionLayers::VIEWPORT, ColliderTag::Viewport),
        );
        for rect in &self.obstacles {
            static_id += 1;
            physics.register_body(
                ColliderId(static_id),
                static_box(*rect, CollisionLayers::OBSTACLE, ColliderTag::Obstacle),
            );
        }

        let mut context = GameContext {
            clock: GameClock::new(config.session.fixed_timestep),
            session: Session::default(),
            config,
            pool,
            tasks: TaskScheduler::new(),
            rng,
            viewport,
            physics,
            presentation: self.presentation.unwrap_or_else(|| Box::new(NullPresentation)),
            highscores: self
                .highscores
                .unwrap_or_else(|| Box::new(HighscoreBoard::new(highscore_length))),
            player: EntityId(0),
        };

        context.player = context.acquire(PoolKey::Player)?;
        if context.entity(context.player).is_none() {
            return Err(GameError::Lookup("player ship was not created".to_string()));
        }

        log::debug!(
            "Game context ready: viewport {}x{}, {} obstacles",
            context.viewport.rect().width(),
            context.viewport.rect().height(),
            self.obstacles.len()
        );

        Ok(context)
    }
}

fn check_prototypes(pool: &EntityPool) -> GameResult<()> {
    let mut keys = vec![
        PoolKey::Player,
        PoolKey::Alien,
        PoolKey::Missile(FlyingObjectKind::Player),
        PoolKey::Missile(FlyingObjectKind::Alien),
    ];
    keys.extend(crate::entity::AsteroidSize::ALL.map(PoolKey::Asteroid));

    match keys.into_iter().find(|key| !pool.has_prototype(*key)) {
        Some(key) => Err(crate::pool::PoolError::MissingPrototype(key).into()),
        None => Ok(()),
    }
}

fn static_box(rect: Rect, layer: CollisionLayers, tag: ColliderTag) -> BodyDesc<ColliderTag> {
    BodyDesc {
        shape: Shape2::Box { half_extents: rect.half_extents },
        layer,
        mask: CollisionLayers::empty(),
        tag,
        position: rect.center,
        enabled: true,
    }
}

/// Downward unit vector used by every containment probe
pub(crate) fn probe_direction() -> Vec2 {
    Vec2::new(0.0, -1.0)
}
