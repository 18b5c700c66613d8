//! Time management utilities

use std::time::{Duration, Instant};

/// Monotonic simulation clock advanced in fixed steps
///
/// Simulation code never reads wall-clock time. Everything that needs "now"
/// asks the clock, which only moves when the host loop calls [`advance`].
///
/// [`advance`]: GameClock::advance
#[derive(Debug, Clone)]
pub struct GameClock {
    now: f64,
    fixed_timestep: f32,
    tick: u64,
}

impl GameClock {
    /// Create a clock at time zero stepping by `fixed_timestep` seconds
    pub fn new(fixed_timestep: f32) -> Self {
        Self {
            now: 0.0,
            fixed_timestep,
            tick: 0,
        }
    }

    /// Current simulation time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Length of one fixed step in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Number of steps taken so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance by one fixed step and return the new time
    pub fn step(&mut self) -> f64 {
        self.advance(self.fixed_timestep)
    }

    /// Advance by an arbitrary non-negative amount and return the new time
    pub fn advance(&mut self, delta: f32) -> f64 {
        self.now += f64::from(delta.max(0.0));
        self.tick += 1;
        self.now
    }

    /// Jump straight to `time`; ignored if it lies in the past
    pub fn set_time(&mut self, time: f64) {
        if time > self.now {
            self.now = time;
        }
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

/// Simple stopwatch for measuring elapsed wall time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
