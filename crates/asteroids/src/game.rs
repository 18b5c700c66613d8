//! Fixed-step simulation loop
//!
//! One call to [`Game::step`] advances the world by `session.fixed_timestep`
//! seconds:
//!
//! 1. advance the clock and run due deferred tasks
//! 2. apply player input and alien AI
//! 3. integrate positions
//! 4. wrap entities that just left the viewport
//! 5. push body state to the physics service
//! 6. sweep missiles and despawn expired ones
//! 7. dispatch new overlaps to the collision router

use rust_engine::foundation::math::{utils, Vec2};

use crate::context::GameContext;
use crate::entity::{EntityId, FlyingObjectKind, Variant};
use crate::error::GameResult;
use crate::pool::PoolKey;

/// Player commands for one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Accelerate along the facing direction
    pub thrust: bool,
    /// World point the ship should face
    pub aim: Option<Vec2>,
    /// Fire a missile if the weapon is ready
    pub fire: bool,
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Tick number after the step
    pub tick: u64,
    /// Missiles fired by the player and the alien
    pub missiles_fired: usize,
    /// New overlaps reported by the physics service
    pub new_overlaps: usize,
}

/// A game: the context plus the loop that drives it
#[derive(Debug)]
pub struct Game {
    context: GameContext,
}

impl Game {
    /// Wrap a prepared context
    pub fn new(context: GameContext) -> Self {
        Self { context }
    }

    /// Shared game state
    pub fn context(&self) -> &GameContext {
        &self.context
    }

    /// Shared game state, mutably
    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.context
    }

    /// Unwrap the context
    pub fn into_context(self) -> GameContext {
        self.context
    }

    /// Start (or restart) a session
    pub fn start(&mut self) -> GameResult<()> {
        self.context.start_session()
    }

    /// Advance the simulation by one fixed step
    pub fn step(&mut self, input: &PlayerInput) -> StepReport {
        let ctx = &mut self.context;
        let dt = ctx.clock.fixed_timestep();

        ctx.advance_time(dt);

        let mut missiles_fired = ctx.apply_player_input(input, dt);
        missiles_fired += ctx.run_alien_ai();

        ctx.integrate(dt);
        ctx.wrap_edges();
        ctx.sync_bodies();
        ctx.sweep_missiles();

        let pairs = ctx.physics.detect_new_overlaps();
        ctx.resolve_overlaps(&pairs);

        let report = StepReport {
            tick: ctx.clock.tick(),
            missiles_fired,
            new_overlaps: pairs.len(),
        };
        log::trace!(
            "Tick {}: {} missiles fired, {} new overlaps, {} pending tasks",
            report.tick,
            report.missiles_fired,
            report.new_overlaps,
            ctx.tasks.len()
        );
        report
    }
}

impl GameContext {
    fn apply_player_input(&mut self, input: &PlayerInput, dt: f32) -> usize {
        let id = self.player_id();
        let Some(object) = self.pool.get_mut(id) else {
            return 0;
        };

        if let Some(aim) = input.aim.filter(|_| object.active) {
            let to_aim = aim - object.position;
            if to_aim.norm() > f32::EPSILON {
                object.rotation = utils::angle_of(to_aim);
            }
        }

        let forward = object.forward();
        let active = object.active;
        let max_speed = object.max_speed;
        if let Variant::Player { player, .. } = &mut object.variant {
            player.has_thrust = active && input.thrust;
            if player.has_thrust {
                if object.velocity.norm() > max_speed {
                    object.velocity = utils::clamp_length(object.velocity, max_speed);
                } else {
                    object.velocity += forward * player.thrust * dt;
                }
            } else {
                object.velocity *= 1.0 - player.thrust_loss_ratio;
            }
        }

        if !(active && input.fire) {
            return 0;
        }
        let Some(origin) = self.weapon_point(id) else {
            return 0;
        };
        let rotation = utils::angle_of(forward);
        usize::from(self.fire_missile(id, origin, rotation, forward).is_some())
    }

    fn run_alien_ai(&mut self) -> usize {
        let Some(target) = self
            .entity(self.player_id())
            .filter(|p| p.active)
            .map(|p| p.position)
        else {
            return 0;
        };

        let mut fired = 0;
        for alien in self.active_ids(PoolKey::Alien) {
            if !self.can_fire_missile(alien) {
                continue;
            }
            let Some((position, offset)) = self
                .entity(alien)
                .and_then(|o| o.character().map(|c| (o.position, c.weapon_offset)))
            else {
                continue;
            };

            let direction = utils::normalize_or_zero(target - position);
            if direction == Vec2::zeros() {
                continue;
            }
            let origin = position + direction * offset;
            if self
                .fire_missile(alien, origin, utils::angle_of(direction), direction)
                .is_some()
            {
                fired += 1;
            }
        }
        fired
    }

    fn integrate(&mut self, dt: f32) {
        for (_, object) in self.pool.iter_mut() {
            if object.active {
                object.position += object.velocity * dt;
            }
        }
    }

    fn wrap_edges(&mut self) {
        let viewport = self.viewport;
        for (_, object) in self.pool.iter_mut() {
            if !object.active || object.missile_state().is_some() {
                continue;
            }
            if object.inside_viewport && !viewport.contains(object.position) {
                object.position = viewport.wrap(object.position);
            }
            object.inside_viewport = viewport.contains(object.position);
        }
    }

    fn sweep_missiles(&mut self) {
        let missiles: Vec<EntityId> = [FlyingObjectKind::Player, FlyingObjectKind::Alien]
            .into_iter()
            .flat_map(|owner| self.active_ids(PoolKey::Missile(owner)))
            .collect();
        for missile in missiles {
            self.sweep_missile(missile);
        }
    }
}
