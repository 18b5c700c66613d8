//! # Asteroids
//!
//! Simulation core of an Asteroids-style arcade shooter: pooled flying
//! objects, their shared lifecycle, collision rules, spawning and session
//! flow. Rendering, audio, input devices and storage stay outside and are
//! reached through the traits in [`services`] and the engine's
//! [`PhysicsService`](rust_engine::physics::PhysicsService).
//!
//! ## Quick Start
//!
//! ```rust
//! use asteroids::prelude::*;
//!
//! let mut config = GameConfig::default();
//! config.session.rng_seed = Some(7);
//!
//! let mut game = Game::new(GameContext::new(config)?);
//! game.start()?;
//! for _ in 0..60 {
//!     game.step(&PlayerInput { fire: true, ..PlayerInput::default() });
//! }
//! assert_eq!(game.context().session().phase(), SessionPhase::Running);
//! # Ok::<(), asteroids::error::GameError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod collision;
pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod flying_object;
pub mod game;
pub mod highscore;
pub mod pool;
pub mod services;
pub mod session;
pub mod spawner;
pub mod viewport;

/// Common imports for hosts and tests
pub mod prelude {
    pub use crate::{
        collision::Contact,
        config::GameConfig,
        context::{ColliderTag, EntityTask, GameContext, GameContextBuilder},
        entity::{AsteroidSize, EntityId, FlyingObject, FlyingObjectKind},
        error::{GameError, GameResult},
        game::{Game, PlayerInput, StepReport},
        highscore::HighscoreBoard,
        pool::PoolKey,
        services::{HighscoreStore, NullPresentation, Presentation, SoundCue},
        session::SessionPhase,
    };
}
