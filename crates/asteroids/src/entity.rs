//! Flying object data model
//!
//! A flying object is one record with shared state plus a [`Variant`]
//! payload. Behaviour lives in `flying_object.rs`, dispatched by matching
//! on the variant; this module only holds data and the prototypes built
//! from configuration.

use rand::Rng;
use rust_engine::foundation::math::{utils, Vec2};
use rust_engine::physics::ColliderId;
use serde::{Deserialize, Serialize};

use crate::config::{AlienConfig, AsteroidConfig, MissileConfig, PlayerConfig};

/// Kind of a flying object, as seen by collision and scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlyingObjectKind {
    /// The player ship
    Player,
    /// The alien ship
    Alien,
    /// Any asteroid
    Asteroid,
}

/// Asteroid size; splitting only ever goes down this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AsteroidSize {
    /// Smallest fragment
    Small,
    /// Medium fragment
    Middle,
    /// Full-size asteroid
    Big,
}

impl AsteroidSize {
    /// Every size, smallest first
    pub const ALL: [Self; 3] = [Self::Small, Self::Middle, Self::Big];

    /// Uniformly random size
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Index of an entity in the pool arena
///
/// Collider ids of pooled entities are the same number, so a physics hit
/// maps straight back to its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    /// Colliders at or above this id belong to static geometry
    pub const STATIC_COLLIDER_BASE: u32 = 1 << 24;

    /// Position of the entity in the pool arena
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Collider registered for this entity
    pub fn collider(self) -> ColliderId {
        ColliderId(self.0)
    }

    /// Entity owning a collider, if the collider belongs to one
    pub fn from_collider(collider: ColliderId) -> Option<Self> {
        (collider.0 < Self::STATIC_COLLIDER_BASE).then_some(Self(collider.0))
    }
}

/// Firing state shared by player and alien
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterState {
    /// Cooldown between two shots
    pub delay_between_missiles: f32,
    /// Time of the last shot
    pub last_missile_shot: f64,
    /// Distance from the centre to the weapon point
    pub weapon_offset: f32,
}

impl CharacterState {
    fn new(delay_between_missiles: f32, weapon_offset: f32) -> Self {
        Self {
            delay_between_missiles,
            last_missile_shot: f64::NEG_INFINITY,
            weapon_offset,
        }
    }

    /// Whether the cooldown has elapsed at `now`
    pub fn can_fire(&self, now: f64) -> bool {
        now - self.last_missile_shot >= f64::from(self.delay_between_missiles)
    }
}

/// Player-only state
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Remaining lives
    pub life: u32,
    /// Lives at session start
    pub max_life: u32,
    /// Hits are ignored while the clock is before this time
    pub indestructible_until: f64,
    /// Length of the invulnerability window
    pub indestructible_duration: f32,
    /// Acceleration while thrusting
    pub thrust: f32,
    /// Fraction of velocity lost per step without thrust
    pub thrust_loss_ratio: f32,
    /// Whether thrust was applied this step
    pub has_thrust: bool,
}

/// Alien-only state
#[derive(Debug, Clone, PartialEq)]
pub struct AlienState {
    /// Lower bound of the random cruise speed
    pub min_speed: f32,
    /// Seconds between random course changes
    pub velocity_change_interval: f32,
}

/// Asteroid-only state
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidState {
    /// Size of this asteroid
    pub size: AsteroidSize,
    /// Lower bound of the random speed
    pub min_speed: f32,
    /// Fragments spawned on destruction
    pub spawn_count_on_destruction: u32,
    /// Size of the fragments
    pub spawn_size_on_destruction: AsteroidSize,
}

/// Missile-only state
#[derive(Debug, Clone, PartialEq)]
pub struct MissileState {
    /// Kind of the character that fired the missile
    pub owner: FlyingObjectKind,
    /// Seconds between activation and despawn
    pub lifetime: f32,
    /// Flight speed
    pub speed: f32,
    /// Despawn deadline of the current flight
    pub despawn_at: f64,
    /// Position at the end of the previous sweep
    pub previous_position: Vec2,
}

/// Per-variant payload
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// Player ship
    Player {
        /// Firing state
        character: CharacterState,
        /// Lives and thrust
        player: PlayerState,
    },
    /// Alien ship
    Alien {
        /// Firing state
        character: CharacterState,
        /// Cruise tunables
        alien: AlienState,
    },
    /// Asteroid of some size
    Asteroid(AsteroidState),
    /// Missile fired by a character
    Missile(MissileState),
}

/// A pooled entity
#[derive(Debug, Clone, PartialEq)]
pub struct FlyingObject {
    /// Variant payload
    pub variant: Variant,
    /// Inactive objects are ignored by every system
    pub active: bool,
    /// World position
    pub position: Vec2,
    /// Velocity in units per second
    pub velocity: Vec2,
    /// Facing in radians, counter-clockwise from +X
    pub rotation: f32,
    /// Upper bound of the random speed (cap for the player)
    pub max_speed: f32,
    /// Points awarded when destroyed by the player
    pub score: u32,
    /// Collider radius
    pub radius: f32,
    /// Last time a containment probe saw the object inside the viewport
    pub last_seen_in_viewport: f64,
    /// Bumped on every activation and deactivation; deferred tasks carry
    /// the value they were scheduled under
    pub generation: u32,
    /// Whether the object was inside the viewport after the last wrap pass
    pub inside_viewport: bool,
}

impl FlyingObject {
    fn with_variant(variant: Variant, max_speed: f32, score: u32, radius: f32) -> Self {
        Self {
            variant,
            active: false,
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            rotation: 0.0,
            max_speed,
            score,
            radius,
            last_seen_in_viewport: 0.0,
            generation: 0,
            inside_viewport: false,
        }
    }

    /// Inactive player prototype
    pub fn player(config: &PlayerConfig) -> Self {
        let mut ship = Self::with_variant(
            Variant::Player {
                character: CharacterState::new(config.delay_between_missiles, config.weapon_offset),
                player: PlayerState {
                    life: config.max_life,
                    max_life: config.max_life,
                    indestructible_until: 0.0,
                    indestructible_duration: config.indestructible_duration,
                    thrust: config.thrust,
                    thrust_loss_ratio: config.thrust_loss_ratio,
                    has_thrust: false,
                },
            },
            config.max_speed,
            config.score,
            config.radius,
        );
        ship.rotation = std::f32::consts::FRAC_PI_2;
        ship
    }

    /// Inactive alien prototype
    pub fn alien(config: &AlienConfig) -> Self {
        Self::with_variant(
            Variant::Alien {
                character: CharacterState::new(config.delay_between_missiles, config.weapon_offset),
                alien: AlienState {
                    min_speed: config.min_speed,
                    velocity_change_interval: config.velocity_change_interval,
                },
            },
            config.max_speed,
            config.score,
            config.radius,
        )
    }

    /// Inactive asteroid prototype
    pub fn asteroid(config: &AsteroidConfig) -> Self {
        Self::with_variant(
            Variant::Asteroid(AsteroidState {
                size: config.size,
                min_speed: config.min_speed,
                spawn_count_on_destruction: config.spawn_count_on_destruction,
                spawn_size_on_destruction: config.spawn_size_on_destruction,
            }),
            config.max_speed,
            config.score,
            config.radius,
        )
    }

    /// Inactive missile prototype
    pub fn missile(config: &MissileConfig) -> Self {
        Self::with_variant(
            Variant::Missile(MissileState {
                owner: config.owner,
                lifetime: config.lifetime,
                speed: config.speed,
                despawn_at: 0.0,
                previous_position: Vec2::zeros(),
            }),
            config.speed,
            0,
            config.radius,
        )
    }

    /// Collision kind; missiles have none of their own
    pub fn kind(&self) -> Option<FlyingObjectKind> {
        match self.variant {
            Variant::Player { .. } => Some(FlyingObjectKind::Player),
            Variant::Alien { .. } => Some(FlyingObjectKind::Alien),
            Variant::Asteroid(_) => Some(FlyingObjectKind::Asteroid),
            Variant::Missile(_) => None,
        }
    }

    /// Unit vector the object is facing
    pub fn forward(&self) -> Vec2 {
        utils::direction_from_angle(self.rotation)
    }

    /// Firing state of a player or alien
    pub fn character(&self) -> Option<&CharacterState> {
        match &self.variant {
            Variant::Player { character, .. } | Variant::Alien { character, .. } => Some(character),
            _ => None,
        }
    }

    /// Mutable firing state of a player or alien
    pub fn character_mut(&mut self) -> Option<&mut CharacterState> {
        match &mut self.variant {
            Variant::Player { character, .. } | Variant::Alien { character, .. } => Some(character),
            _ => None,
        }
    }

    /// Player state, if this is the player
    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.variant {
            Variant::Player { player, .. } => Some(player),
            _ => None,
        }
    }

    /// Mutable player state, if this is the player
    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.variant {
            Variant::Player { player, .. } => Some(player),
            _ => None,
        }
    }

    /// Asteroid state, if this is an asteroid
    pub fn asteroid_state(&self) -> Option<&AsteroidState> {
        match &self.variant {
            Variant::Asteroid(asteroid) => Some(asteroid),
            _ => None,
        }
    }

    /// Missile state, if this is a missile
    pub fn missile_state(&self) -> Option<&MissileState> {
        match &self.variant {
            Variant::Missile(missile) => Some(missile),
            _ => None,
        }
    }

    /// Mutable missile state, if this is a missile
    pub fn missile_state_mut(&mut self) -> Option<&mut MissileState> {
        match &mut self.variant {
            Variant::Missile(missile) => Some(missile),
            _ => None,
        }
    }
}
