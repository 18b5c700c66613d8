//! # Rust Engine
//!
//! Game-agnostic plumbing shared by the arcade simulations in this workspace.
//!
//! ## Features
//!
//! - **Math**: `nalgebra`-backed 2D vectors and rectangles
//! - **Time**: fixed-step simulation clock
//! - **Deferred tasks**: cancellable one-shot task queue driven by the clock
//! - **Physics**: 2D shapes, layer filtering, ray queries, overlap events
//! - **Configuration**: TOML/RON loading for serde tunables
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_engine::prelude::*;
//!
//! let mut clock = GameClock::new(1.0 / 60.0);
//! let mut tasks = TaskScheduler::new();
//! tasks.schedule_once(clock.now(), 0.01, "blink");
//!
//! clock.step();
//! let fired: Vec<_> = tasks.drain_due(clock.now()).into_iter().map(|(_, t)| t).collect();
//! assert_eq!(fired, vec!["blink"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod events;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        events::{TaskHandle, TaskScheduler},
        foundation::{
            math::{Rect, Vec2},
            time::{GameClock, Stopwatch},
        },
        physics::{
            BodyDesc, ColliderId, CollisionLayers, CollisionPair, CollisionWorld, PhysicsService,
            RayHit, Shape2,
        },
    };
}
