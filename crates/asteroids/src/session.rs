//! Session controller
//!
//! Starts and ends rounds, keeps the asteroid population topped up and runs
//! the recurring alien spawn timer.

use rust_engine::events::TaskHandle;
use rust_engine::foundation::math::{utils, Vec2};

use crate::context::{GameContext, GameTask};
use crate::entity::AsteroidSize;
use crate::error::GameResult;
use crate::pool::PoolKey;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No round has started yet
    #[default]
    Idle,
    /// A round is being played
    Running,
    /// The player ran out of lives
    GameOver,
}

/// State of the current round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    phase: SessionPhase,
    score: u32,
    final_score: Option<u32>,
    game_overs: u32,
    alien_spawn_task: Option<TaskHandle>,
}

impl Session {
    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Score of the running (or last) round
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score the last round ended with
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    /// Number of game over signals raised since the context was built
    pub fn game_over_count(&self) -> u32 {
        self.game_overs
    }

    /// Whether the recurring alien spawn timer is armed
    pub fn alien_timer_armed(&self) -> bool {
        self.alien_spawn_task.is_some()
    }
}

impl GameContext {
    /// Start (or restart) a round
    ///
    /// Clears the field, resets the score, activates the player in the centre
    /// and seeds the starting asteroids inside the viewport.
    pub fn start_session(&mut self) -> GameResult<()> {
        if let Some(handle) = self.session.alien_spawn_task.take() {
            self.tasks.cancel(handle);
        }

        self.deactivate_all_asteroids();
        let leftovers: Vec<_> = self
            .pool
            .iter()
            .filter(|(id, o)| o.active && *id != self.player_id())
            .map(|(id, _)| id)
            .collect();
        for id in leftovers {
            self.deactivate(id);
        }

        self.session.phase = SessionPhase::Running;
        self.session.score = 0;
        self.session.final_score = None;
        self.presentation.set_score_display(0);

        let player = self.player_id();
        self.activate(player, Vec2::zeros(), Vec2::zeros());
        // Seeded asteroids must see the ship when they probe for free space
        self.sync_body(player);

        for _ in 0..self.config.session.asteroid_start_amount {
            let size = AsteroidSize::random(&mut self.rng);
            let position = self.find_valid_spawn_point_inside_viewport();
            self.spawn_asteroid(size, Some(position), None)?;
        }

        let interval = self.config.session.alien_spawn_interval;
        self.session.alien_spawn_task =
            Some(self.tasks.schedule_once(self.clock.now(), interval, GameTask::SpawnAlien));

        log::info!(
            "Session started with {} asteroids",
            self.config.session.asteroid_start_amount
        );
        Ok(())
    }

    /// Spawn random asteroids outside the viewport until the configured
    /// floor is reached
    pub fn maintain_minimum_asteroids(&mut self) -> GameResult<()> {
        let floor = self.config.session.min_active_asteroids as usize;
        let active = self.active_asteroid_count();
        for _ in active..floor {
            let size = AsteroidSize::random(&mut self.rng);
            self.spawn_asteroid(size, None, None)?;
        }
        Ok(())
    }

    /// End the running round; later calls are ignored
    pub fn on_game_over(&mut self) {
        if self.session.phase != SessionPhase::Running {
            return;
        }

        if let Some(handle) = self.session.alien_spawn_task.take() {
            self.tasks.cancel(handle);
        }

        self.session.phase = SessionPhase::GameOver;
        self.session.final_score = Some(self.session.score);
        self.session.game_overs += 1;
        self.presentation.show_game_over_screen(self.session.score);

        log::info!("Game over, final score {}", self.session.score);
    }

    /// Add points to the running round's score
    pub fn add_score(&mut self, points: u32) {
        if self.session.phase != SessionPhase::Running {
            return;
        }
        self.session.score = self.session.score.saturating_add(points);
        self.presentation.set_score_display(self.session.score);
    }

    /// Record the finished round's score under `name`
    ///
    /// Returns false if no round has finished or the score did not qualify.
    pub fn submit_highscore(&mut self, name: &str) -> bool {
        match self.session.final_score {
            Some(score) if self.session.phase == SessionPhase::GameOver => {
                self.highscores.record(name, score)
            }
            _ => false,
        }
    }

    /// Whether the finished round's score would enter the highscore list
    pub fn final_score_qualifies(&self) -> bool {
        self.session
            .final_score
            .is_some_and(|score| self.highscores.is_qualifying(score))
    }

    /// Deactivate every asteroid
    pub fn deactivate_all_asteroids(&mut self) {
        let ids: Vec<_> = AsteroidSize::ALL
            .iter()
            .flat_map(|size| self.active_ids(PoolKey::Asteroid(*size)))
            .collect();
        for id in ids {
            self.deactivate(id);
        }
    }

    pub(crate) fn on_alien_spawn_timer(&mut self) {
        self.session.alien_spawn_task = None;
        if self.session.phase != SessionPhase::Running {
            return;
        }

        if !self.alien_active() {
            let player_position = self
                .entity(self.player_id())
                .map_or_else(Vec2::zeros, |p| p.position);
            let position = self.find_valid_spawn_point_outside_viewport();
            let direction = utils::normalize_or_zero(player_position - position);
            if let Err(err) = self.spawn_alien(position, direction) {
                log::error!("Alien spawn failed: {}", err);
            }
        }

        let interval = self.config.session.alien_spawn_interval;
        self.session.alien_spawn_task =
            Some(self.tasks.schedule_once(self.clock.now(), interval, GameTask::SpawnAlien));
    }

    /// Whether the alien is currently in play
    pub fn alien_active(&self) -> bool {
        self.pool.active_count(PoolKey::Alien) > 0
    }
}
