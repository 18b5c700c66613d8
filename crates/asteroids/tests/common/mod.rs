//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use asteroids::prelude::*;
use rust_engine::foundation::math::Vec2;
use rust_engine::physics::{BodyDesc, ColliderId, CollisionLayers, CollisionPair, PhysicsService, RayHit};

/// Everything the core pushed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    Sound(SoundCue),
    Score(u32),
    Life(u32),
    GameOver(u32),
    Indestructible(bool),
}

/// Presentation that records every call; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    log: Rc<RefCell<Vec<Shown>>>,
}

impl RecordingPresentation {
    pub fn events(&self) -> Vec<Shown> {
        self.log.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Shown) -> bool) -> usize {
        self.log.borrow().iter().filter(|e| matches(e)).count()
    }

    pub fn game_overs(&self) -> usize {
        self.count(|e| matches!(e, Shown::GameOver(_)))
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl Presentation for RecordingPresentation {
    fn play_sound(&mut self, cue: SoundCue) {
        self.log.borrow_mut().push(Shown::Sound(cue));
    }

    fn set_score_display(&mut self, score: u32) {
        self.log.borrow_mut().push(Shown::Score(score));
    }

    fn set_life_display(&mut self, life: u32) {
        self.log.borrow_mut().push(Shown::Life(life));
    }

    fn show_game_over_screen(&mut self, final_score: u32) {
        self.log.borrow_mut().push(Shown::GameOver(final_score));
    }

    fn set_indestructible_display(&mut self, indestructible: bool) {
        self.log.borrow_mut().push(Shown::Indestructible(indestructible));
    }
}

/// Physics stub whose containment probe is a plain function of the origin
///
/// Bodies are accepted and ignored; no overlaps are ever reported.
pub struct StubPhysics {
    probe: Box<dyn Fn(Vec2) -> Option<ColliderTag>>,
    queries: Rc<Cell<usize>>,
}

impl StubPhysics {
    pub fn new(probe: impl Fn(Vec2) -> Option<ColliderTag> + 'static) -> Self {
        Self {
            probe: Box::new(probe),
            queries: Rc::new(Cell::new(0)),
        }
    }

    /// Shared counter of raycasts made so far
    pub fn query_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.queries)
    }
}

impl PhysicsService<ColliderTag> for StubPhysics {
    fn register_body(&mut self, _id: ColliderId, _desc: BodyDesc<ColliderTag>) {}

    fn set_body_state(&mut self, _id: ColliderId, _position: Vec2, _enabled: bool) {}

    fn raycast(
        &self,
        origin: Vec2,
        _direction: Vec2,
        _max_distance: f32,
        _layers: CollisionLayers,
    ) -> Option<RayHit<ColliderTag>> {
        self.queries.set(self.queries.get() + 1);
        (self.probe)(origin).map(|tag| RayHit {
            collider: ColliderId(u32::MAX),
            tag,
            point: origin,
            distance: 0.0,
        })
    }

    fn detect_new_overlaps(&mut self) -> Vec<CollisionPair> {
        Vec::new()
    }
}

/// Default configuration with a fixed seed
pub fn config(seed: u64) -> GameConfig {
    let mut config = GameConfig::default();
    config.session.rng_seed = Some(seed);
    config
}

/// Configuration for hand-built scenes: no seeded or topped-up asteroids
pub fn empty_field_config(seed: u64) -> GameConfig {
    let mut config = config(seed);
    config.session.asteroid_start_amount = 0;
    config.session.min_active_asteroids = 0;
    config
}

/// Context on the reference physics world with a recording presentation
pub fn context(config: GameConfig) -> (GameContext, RecordingPresentation) {
    asteroids_logging();
    let presentation = RecordingPresentation::default();
    let context = GameContext::builder(config)
        .presentation(presentation.clone())
        .build()
        .unwrap();
    (context, presentation)
}

/// Context on a stubbed physics service
pub fn stub_context(config: GameConfig, physics: StubPhysics) -> GameContext {
    asteroids_logging();
    GameContext::builder(config).physics(physics).build().unwrap()
}

/// Context with the player in play in the middle of an empty field
pub fn running_context(seed: u64) -> (GameContext, RecordingPresentation) {
    let (mut ctx, presentation) = context(empty_field_config(seed));
    ctx.start_session().unwrap();
    presentation.clear();
    (ctx, presentation)
}

/// Every inactive entity is at rest and owns no live deferred task
pub fn assert_inactive_entities_are_idle(ctx: &GameContext) {
    for (id, object) in ctx.pool().iter() {
        if !object.active {
            assert_eq!(object.velocity, Vec2::zeros(), "{id:?} is inactive but moving");
            assert_eq!(ctx.pending_tasks_for(id), 0, "{id:?} is inactive but has tasks");
        }
    }
}

/// Freeze an entity in place
pub fn park(ctx: &mut GameContext, id: EntityId, position: Vec2) {
    let object = ctx.entity_mut(id).unwrap();
    object.position = position;
    object.velocity = Vec2::zeros();
}

fn asteroids_logging() {
    rust_engine::foundation::logging::try_init();
}
