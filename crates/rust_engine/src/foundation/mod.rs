//! Building blocks shared by every other engine module
//!
//! `math` holds the 2D vector aliases and rectangle helpers, `time` the
//! fixed-step clock and `logging` the `env_logger` setup.

pub mod math;
pub mod time;
pub mod logging;
