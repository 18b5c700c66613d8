//! Flying object state machine
//!
//! Shared lifecycle operations for every pooled entity. Each operation runs
//! the common part once and then branches on the [`Variant`] for the
//! behaviour that differs between player, alien, asteroid and missile.
//!
//! Activation and deactivation both bump the entity's generation, which
//! turns every deferred task scheduled for the previous activation into a
//! no-op.

use rand::Rng;
use rust_engine::foundation::math::{utils, Vec2};
use rust_engine::physics::CollisionLayers;

use crate::context::{probe_direction, ColliderTag, EntityTask, GameContext};
use crate::entity::{AsteroidSize, EntityId, FlyingObjectKind, Variant};
use crate::pool::PoolKey;
use crate::services::SoundCue;

impl GameContext {
    /// Put a pooled entity into play
    ///
    /// `velocity` is interpreted per variant: the player takes it as is,
    /// aliens, asteroids and missiles use its direction and pick their own
    /// speed.
    pub fn activate(&mut self, id: EntityId, position: Vec2, velocity: Vec2) {
        let now = self.clock.now();
        let inside = self.viewport.contains(position);
        let Some(object) = self.pool.get_mut(id) else {
            log::warn!("Activate on unknown entity {:?}", id);
            return;
        };

        object.active = true;
        object.generation = object.generation.wrapping_add(1);
        object.position = position;
        object.last_seen_in_viewport = now;
        object.inside_viewport = inside;

        let mut life_display = None;
        let mut course_change = None;
        let mut monitored = true;
        let max_speed = object.max_speed;

        match &mut object.variant {
            Variant::Player { player, .. } => {
                object.velocity = velocity;
                object.rotation = std::f32::consts::FRAC_PI_2;
                player.life = player.max_life;
                player.indestructible_until = 0.0;
                player.has_thrust = false;
                life_display = Some(player.life);
            }
            Variant::Alien { character, alien } => {
                let speed = self.rng.gen_range(alien.min_speed..=max_speed);
                object.velocity = utils::normalize_or_zero(velocity) * speed;
                character.last_missile_shot = now;
                course_change = Some(alien.velocity_change_interval);
            }
            Variant::Asteroid(asteroid) => {
                let speed = self.rng.gen_range(asteroid.min_speed..=max_speed);
                object.velocity = utils::normalize_or_zero(velocity) * speed;
                object.rotation = self.rng.gen_range(0.0..std::f32::consts::TAU);
            }
            Variant::Missile(missile) => {
                let direction = utils::normalize_or_zero(velocity);
                object.velocity = direction * missile.speed;
                if direction != Vec2::zeros() {
                    object.rotation = utils::angle_of(direction);
                }
                missile.despawn_at = now + f64::from(missile.lifetime);
                missile.previous_position = position;
                monitored = false;
            }
        }

        if let Some(life) = life_display {
            self.presentation.set_life_display(life);
            self.presentation.set_indestructible_display(false);
        }
        if let Some(interval) = course_change {
            self.presentation.play_sound(SoundCue::AlienSpawned);
            self.schedule_entity_task(id, interval, EntityTask::ChangeVelocityRandomly);
        }
        if monitored {
            let interval = self.config.session.viewport_check_interval;
            self.schedule_entity_task(id, interval, EntityTask::VerifyInViewport);
        }
    }

    /// Take an entity out of play
    ///
    /// Velocity is zeroed, pending tasks are invalidated and the collider is
    /// disabled right away so later queries in the same step ignore it.
    pub fn deactivate(&mut self, id: EntityId) {
        let Some(object) = self.pool.get_mut(id) else {
            log::warn!("Deactivate on unknown entity {:?}", id);
            return;
        };

        object.velocity = Vec2::zeros();
        if !object.active {
            return;
        }

        object.active = false;
        object.generation = object.generation.wrapping_add(1);
        if let Some(player) = object.player_state_mut() {
            player.has_thrust = false;
        }

        self.sync_body(id);
    }

    /// Destroy an entity, optionally awarding its score to the player
    ///
    /// Destroying an inactive entity does nothing.
    pub fn destroy(&mut self, id: EntityId, award_score: bool) {
        let Some(object) = self.pool.get(id) else {
            log::warn!("Destroy on unknown entity {:?}", id);
            return;
        };
        if !object.active {
            return;
        }

        let position = object.position;
        let score = object.score;
        let split = object
            .asteroid_state()
            .map(|a| (a.spawn_count_on_destruction, a.spawn_size_on_destruction));

        match object.kind() {
            Some(FlyingObjectKind::Player) => self.destroy_player(id),
            Some(FlyingObjectKind::Asteroid) => {
                self.presentation.play_sound(SoundCue::Destroyed(FlyingObjectKind::Asteroid));
                self.deactivate(id);

                match split {
                    Some((count, size)) if count > 0 => self.split_asteroid(position, count, size),
                    _ => {
                        if let Err(err) = self.maintain_minimum_asteroids() {
                            log::error!("Asteroid top-up failed: {}", err);
                        }
                    }
                }

                if award_score {
                    self.add_score(score);
                }
            }
            Some(FlyingObjectKind::Alien) => {
                self.presentation.play_sound(SoundCue::Destroyed(FlyingObjectKind::Alien));
                self.deactivate(id);
                if award_score {
                    self.add_score(score);
                }
            }
            None => self.deactivate(id),
        }
    }

    fn split_asteroid(&mut self, position: Vec2, count: u32, size: AsteroidSize) {
        log::debug!("Asteroid split into {} {:?} fragments", count, size);
        for _ in 0..count {
            if let Err(err) = self.spawn_asteroid(size, Some(position), None) {
                log::error!("Fragment spawn failed: {}", err);
            }
        }
    }

    fn destroy_player(&mut self, id: EntityId) {
        let now = self.clock.now();
        let Some(player) = self.pool.get_mut(id).and_then(|o| o.player_state_mut()) else {
            return;
        };
        if player.indestructible_until > now {
            return;
        }

        player.life = player.life.saturating_sub(1).min(player.max_life);
        let life = player.life;
        let duration = player.indestructible_duration;

        self.presentation.play_sound(SoundCue::Destroyed(FlyingObjectKind::Player));
        self.presentation.set_life_display(life);

        if life == 0 {
            log::debug!("Player destroyed, no lives left");
            self.deactivate(id);
            self.on_game_over();
            return;
        }

        log::debug!("Player hit, {} lives left", life);
        if let Some(object) = self.pool.get_mut(id) {
            object.position = Vec2::zeros();
            object.velocity = Vec2::zeros();
            object.inside_viewport = true;
            if let Some(player) = object.player_state_mut() {
                player.has_thrust = false;
                player.indestructible_until = now + f64::from(duration);
            }
        }

        self.presentation.set_indestructible_display(true);
        self.schedule_entity_task(id, duration, EntityTask::ClearIndestructible);
    }

    /// Whether hits on the entity are currently ignored
    pub fn is_indestructible(&self, id: EntityId) -> bool {
        self.pool
            .get(id)
            .and_then(|o| o.player_state())
            .is_some_and(|p| p.indestructible_until > self.clock.now())
    }

    pub(crate) fn clear_indestructible(&mut self, id: EntityId) {
        if self.pool.get(id).and_then(|o| o.player_state()).is_some() {
            self.presentation.set_indestructible_display(false);
        }
    }

    /// React to having been unseen for longer than the grace period
    pub fn too_long_outside_of_viewport(&mut self, id: EntityId) {
        let Some(object) = self.pool.get(id) else {
            return;
        };
        if !object.active {
            return;
        }

        let replacement = object.asteroid_state().map(|a| a.size);
        match object.kind() {
            Some(FlyingObjectKind::Alien) => {
                log::debug!("Alien {:?} left the viewport", id);
                self.deactivate(id);
            }
            Some(FlyingObjectKind::Asteroid) => {
                self.deactivate(id);
                if let Some(size) = replacement {
                    if let Err(err) = self.spawn_asteroid(size, None, None) {
                        log::error!("Replacement asteroid spawn failed: {}", err);
                    }
                }
            }
            Some(FlyingObjectKind::Player) | None => {}
        }
    }

    /// Periodic containment probe of one entity
    ///
    /// Refreshes the last-seen time when the probe touches the viewport,
    /// otherwise checks the grace period. Reschedules itself for as long as
    /// the same activation lasts.
    pub(crate) fn verify_in_viewport(&mut self, id: EntityId) {
        let now = self.clock.now();
        let grace = f64::from(self.config.session.viewport_grace_period);
        let Some(object) = self.pool.get(id) else {
            return;
        };
        if !object.active {
            return;
        }
        let generation = object.generation;
        let last_seen = object.last_seen_in_viewport;

        let seen = self
            .physics
            .raycast(object.position, probe_direction(), f32::INFINITY, CollisionLayers::VIEWPORT)
            .is_some_and(|hit| hit.tag == ColliderTag::Viewport);

        if seen {
            if let Some(object) = self.pool.get_mut(id) {
                object.last_seen_in_viewport = now;
            }
        } else if now - last_seen > grace {
            self.too_long_outside_of_viewport(id);
        }

        if self.pool.get(id).is_some_and(|o| o.active && o.generation == generation) {
            let interval = self.config.session.viewport_check_interval;
            self.schedule_entity_task(id, interval, EntityTask::VerifyInViewport);
        }
    }

    pub(crate) fn change_velocity_randomly(&mut self, id: EntityId) {
        let Some(object) = self.pool.get_mut(id) else {
            return;
        };
        if !object.active {
            return;
        }
        let Variant::Alien { alien, .. } = &object.variant else {
            return;
        };

        let speed = self.rng.gen_range(alien.min_speed..=object.max_speed);
        let interval = alien.velocity_change_interval;
        let direction = Vec2::new(self.rng.gen_range(-1.0..=1.0), self.rng.gen_range(-1.0..=1.0));
        object.velocity = direction * speed;

        self.schedule_entity_task(id, interval, EntityTask::ChangeVelocityRandomly);
    }

    /// Whether the character's weapon is off cooldown
    pub fn can_fire_missile(&self, id: EntityId) -> bool {
        self.pool
            .get(id)
            .filter(|o| o.active)
            .and_then(|o| o.character())
            .is_some_and(|c| c.can_fire(self.clock.now()))
    }

    /// World position of the character's weapon
    pub fn weapon_point(&self, id: EntityId) -> Option<Vec2> {
        let object = self.pool.get(id)?;
        let character = object.character()?;
        Some(object.position + object.forward() * character.weapon_offset)
    }

    /// Fire a missile owned by the character `shooter`
    ///
    /// Does nothing while the weapon is cooling down. The missile comes from
    /// the pool keyed by the shooter's kind.
    pub fn fire_missile(
        &mut self,
        shooter: EntityId,
        origin: Vec2,
        rotation: f32,
        direction: Vec2,
    ) -> Option<EntityId> {
        let now = self.clock.now();
        let object = self.pool.get_mut(shooter).filter(|o| o.active)?;
        let kind = object.kind()?;
        let character = object.character_mut()?;
        if !character.can_fire(now) {
            return None;
        }
        character.last_missile_shot = now;

        let missile = match self.acquire(PoolKey::Missile(kind)) {
            Ok(missile) => missile,
            Err(err) => {
                log::error!("Missile for {:?} unavailable: {}", kind, err);
                return None;
            }
        };

        self.activate(missile, origin, direction);
        if let Some(object) = self.pool.get_mut(missile) {
            object.rotation = rotation;
        }
        Some(missile)
    }
}
