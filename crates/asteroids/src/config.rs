//! Game configuration
//!
//! Every tunable of a round lives in one serde tree, so a whole game can be
//! described by a single TOML or RON file. Sections left out of a file fall
//! back to the defaults below. [`GameConfig::validate`] runs before any
//! entity is built; a config that fails it never reaches the simulation.

use std::path::Path;

use rust_engine::config::Config;
use serde::{Deserialize, Serialize};

use crate::entity::{AsteroidSize, FlyingObjectKind};
use crate::error::{GameError, GameResult};

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of entries kept on the highscore board
    pub highscore_list_length: usize,

    /// Visible play area
    pub viewport: ViewportConfig,

    /// Session pacing and spawn rules
    pub session: SessionConfig,

    /// Player ship tunables
    pub player: PlayerConfig,

    /// Alien ship tunables
    pub alien: AlienConfig,

    /// One entry per asteroid size
    pub asteroids: Vec<AsteroidConfig>,

    /// One entry per missile owner
    pub missiles: Vec<MissileConfig>,
}

/// Visible play area, in world units (one unit per screen pixel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width of the visible rectangle
    pub width: f32,

    /// Height of the visible rectangle
    pub height: f32,

    /// Fraction of the width added on the left and right when sampling
    /// spawn points outside the viewport
    pub outside_margin_x: f32,

    /// Fraction of the height added above and below when sampling spawn
    /// points outside the viewport
    pub outside_margin_y: f32,
}

/// Session pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Asteroids seeded inside the viewport when a session starts
    pub asteroid_start_amount: u32,

    /// Floor for the number of active asteroids
    pub min_active_asteroids: u32,

    /// Seconds between alien spawn attempts
    pub alien_spawn_interval: f32,

    /// Seconds between viewport containment probes of one entity
    pub viewport_check_interval: f32,

    /// Seconds an entity may stay unseen before it counts as lost
    pub viewport_grace_period: f32,

    /// Samples tried before a spawn point search gives up
    pub spawn_retry_limit: u32,

    /// Seed for the random source; `None` seeds from entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,

    /// Length of one simulation step in seconds
    pub fixed_timestep: f32,
}

/// Player ship tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Lives at session start
    pub max_life: u32,

    /// Seconds of invulnerability after losing a life
    pub indestructible_duration: f32,

    /// Acceleration while thrusting, units per second squared
    pub thrust: f32,

    /// Fraction of velocity lost per step while not thrusting
    pub thrust_loss_ratio: f32,

    /// Speed above which thrust stops accelerating
    pub max_speed: f32,

    /// Cooldown between two shots in seconds
    pub delay_between_missiles: f32,

    /// Distance from the ship centre to the weapon point
    pub weapon_offset: f32,

    /// Collider radius
    pub radius: f32,

    /// Points awarded for destroying the ship
    pub score: u32,
}

/// Alien ship tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlienConfig {
    /// Lower bound of the random cruise speed
    pub min_speed: f32,

    /// Upper bound of the random cruise speed
    pub max_speed: f32,

    /// Seconds between random course changes
    pub velocity_change_interval: f32,

    /// Cooldown between two shots in seconds
    pub delay_between_missiles: f32,

    /// Distance from the ship centre to the weapon point
    pub weapon_offset: f32,

    /// Collider radius
    pub radius: f32,

    /// Points awarded for destroying the alien
    pub score: u32,
}

/// Per-size asteroid tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidConfig {
    /// Size this entry describes
    pub size: AsteroidSize,

    /// Lower bound of the random speed
    pub min_speed: f32,

    /// Upper bound of the random speed
    pub max_speed: f32,

    /// Points awarded for destroying the asteroid
    pub score: u32,

    /// Collider radius
    pub radius: f32,

    /// Fragments spawned on destruction
    pub spawn_count_on_destruction: u32,

    /// Size of the fragments; must be smaller than `size`
    pub spawn_size_on_destruction: AsteroidSize,
}

/// Per-owner missile tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileConfig {
    /// Kind of character that fires these missiles
    pub owner: FlyingObjectKind,

    /// Seconds before the missile despawns
    pub lifetime: f32,

    /// Flight speed
    pub speed: f32,

    /// Collider radius
    pub radius: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            highscore_list_length: 15,
            viewport: ViewportConfig::default(),
            session: SessionConfig::default(),
            player: PlayerConfig::default(),
            alien: AlienConfig::default(),
            asteroids: vec![
                AsteroidConfig {
                    size: AsteroidSize::Big,
                    min_speed: 40.0,
                    max_speed: 80.0,
                    score: 20,
                    radius: 48.0,
                    spawn_count_on_destruction: 2,
                    spawn_size_on_destruction: AsteroidSize::Middle,
                },
                AsteroidConfig {
                    size: AsteroidSize::Middle,
                    min_speed: 60.0,
                    max_speed: 110.0,
                    score: 50,
                    radius: 28.0,
                    spawn_count_on_destruction: 2,
                    spawn_size_on_destruction: AsteroidSize::Small,
                },
                AsteroidConfig {
                    size: AsteroidSize::Small,
                    min_speed: 80.0,
                    max_speed: 140.0,
                    score: 100,
                    radius: 14.0,
                    spawn_count_on_destruction: 0,
                    spawn_size_on_destruction: AsteroidSize::Small,
                },
            ],
            missiles: vec![
                MissileConfig {
                    owner: FlyingObjectKind::Player,
                    lifetime: 1.0,
                    speed: 500.0,
                    radius: 3.0,
                },
                MissileConfig {
                    owner: FlyingObjectKind::Alien,
                    lifetime: 1.0,
                    speed: 500.0,
                    radius: 3.0,
                },
            ],
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            outside_margin_x: 0.4,
            outside_margin_y: 0.2,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asteroid_start_amount: 4,
            min_active_asteroids: 6,
            alien_spawn_interval: 30.0,
            viewport_check_interval: 1.0,
            viewport_grace_period: 5.0,
            spawn_retry_limit: 100,
            rng_seed: None,
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_life: 3,
            indestructible_duration: 3.0,
            thrust: 400.0,
            thrust_loss_ratio: 0.02,
            max_speed: 400.0,
            delay_between_missiles: 0.1,
            weapon_offset: 20.0,
            radius: 16.0,
            score: 0,
        }
    }
}

impl Default for AlienConfig {
    fn default() -> Self {
        Self {
            min_speed: 80.0,
            max_speed: 140.0,
            velocity_change_interval: 5.0,
            delay_between_missiles: 1.0,
            weapon_offset: 24.0,
            radius: 20.0,
            score: 200,
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Load a configuration file (TOML or RON) and validate it
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let config = Self::load_from_file(path)?;
        config.validate()?;
        log::info!("Loaded game configuration from {}", path.display());
        Ok(config)
    }

    /// Tunables for one asteroid size
    pub fn asteroid(&self, size: AsteroidSize) -> GameResult<&AsteroidConfig> {
        self.asteroids
            .iter()
            .find(|a| a.size == size)
            .ok_or_else(|| GameError::Configuration(format!("no asteroid entry for size {size:?}")))
    }

    /// Tunables for the missiles fired by `owner`
    pub fn missile(&self, owner: FlyingObjectKind) -> GameResult<&MissileConfig> {
        self.missiles
            .iter()
            .find(|m| m.owner == owner)
            .ok_or_else(|| GameError::Configuration(format!("no missile entry for owner {owner:?}")))
    }

    /// Check every tunable; the first problem found is returned
    pub fn validate(&self) -> GameResult<()> {
        let v = &self.viewport;
        positive("viewport.width", v.width)?;
        positive("viewport.height", v.height)?;
        non_negative("viewport.outside_margin_x", v.outside_margin_x)?;
        non_negative("viewport.outside_margin_y", v.outside_margin_y)?;

        let s = &self.session;
        positive("session.alien_spawn_interval", s.alien_spawn_interval)?;
        positive("session.viewport_check_interval", s.viewport_check_interval)?;
        non_negative("session.viewport_grace_period", s.viewport_grace_period)?;
        positive("session.fixed_timestep", s.fixed_timestep)?;
        if s.spawn_retry_limit == 0 {
            return Err(invalid("session.spawn_retry_limit must be at least 1"));
        }

        let p = &self.player;
        if p.max_life == 0 {
            return Err(invalid("player.max_life must be at least 1"));
        }
        non_negative("player.indestructible_duration", p.indestructible_duration)?;
        non_negative("player.thrust", p.thrust)?;
        if !(0.0..=1.0).contains(&p.thrust_loss_ratio) {
            return Err(invalid("player.thrust_loss_ratio must lie in [0, 1]"));
        }
        positive("player.max_speed", p.max_speed)?;
        non_negative("player.delay_between_missiles", p.delay_between_missiles)?;
        positive("player.radius", p.radius)?;

        let a = &self.alien;
        speed_range("alien", a.min_speed, a.max_speed)?;
        positive("alien.velocity_change_interval", a.velocity_change_interval)?;
        non_negative("alien.delay_between_missiles", a.delay_between_missiles)?;
        positive("alien.radius", a.radius)?;

        for size in AsteroidSize::ALL {
            let matching = self.asteroids.iter().filter(|a| a.size == size).count();
            if matching != 1 {
                return Err(invalid(&format!(
                    "expected exactly one asteroid entry for size {size:?}, found {matching}"
                )));
            }
        }
        for asteroid in &self.asteroids {
            let name = format!("asteroid {:?}", asteroid.size);
            speed_range(&name, asteroid.min_speed, asteroid.max_speed)?;
            positive(&format!("{name} radius"), asteroid.radius)?;
            if asteroid.spawn_count_on_destruction > 0
                && asteroid.spawn_size_on_destruction >= asteroid.size
            {
                return Err(invalid(&format!(
                    "{name} splits into {:?}; fragments must be smaller",
                    asteroid.spawn_size_on_destruction
                )));
            }
        }

        for owner in [FlyingObjectKind::Player, FlyingObjectKind::Alien] {
            let matching = self.missiles.iter().filter(|m| m.owner == owner).count();
            if matching != 1 {
                return Err(invalid(&format!(
                    "expected exactly one missile entry for owner {owner:?}, found {matching}"
                )));
            }
        }
        for missile in &self.missiles {
            let name = format!("missile {:?}", missile.owner);
            positive(&format!("{name} lifetime"), missile.lifetime)?;
            non_negative(&format!("{name} speed"), missile.speed)?;
            positive(&format!("{name} radius"), missile.radius)?;
        }

        if self.highscore_list_length == 0 {
            return Err(invalid("highscore_list_length must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> GameError {
    GameError::Configuration(message.to_string())
}

fn positive(name: &str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> GameResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must not be negative, got {value}")))
    }
}

fn speed_range(name: &str, min: f32, max: f32) -> GameResult<()> {
    non_negative(&format!("{name} min_speed"), min)?;
    if max.is_finite() && max >= min {
        Ok(())
    } else {
        Err(invalid(&format!("{name} max_speed {max} is below min_speed {min}")))
    }
}
