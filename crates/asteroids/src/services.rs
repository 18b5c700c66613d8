//! Collaborator interfaces
//!
//! The simulation core never draws, plays audio or touches storage itself.
//! It reports what happened through these traits and lets the host decide
//! how to present it.

use crate::entity::FlyingObjectKind;

/// Sound effects the core asks the presentation layer to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A flying object of this kind was destroyed
    Destroyed(FlyingObjectKind),
    /// The alien entered the game
    AlienSpawned,
}

/// Rendering, audio and UI collaborator
pub trait Presentation {
    /// Play a one-shot sound effect
    fn play_sound(&mut self, cue: SoundCue);

    /// Show the current session score
    fn set_score_display(&mut self, score: u32);

    /// Show the player's remaining lives
    fn set_life_display(&mut self, life: u32);

    /// Switch to the game over screen
    fn show_game_over_screen(&mut self, final_score: u32);

    /// Toggle the blinking "invulnerable" look of the player ship
    fn set_indestructible_display(&mut self, _indestructible: bool) {}
}

/// Highscore persistence collaborator
pub trait HighscoreStore {
    /// Whether `score` would make it onto the list
    fn is_qualifying(&self, score: u32) -> bool;

    /// Store `score` under `name`; returns false if it did not qualify
    fn record(&mut self, name: &str, score: u32) -> bool;
}

/// Presentation that drops everything, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn play_sound(&mut self, cue: SoundCue) {
        log::trace!("Sound: {:?}", cue);
    }

    fn set_score_display(&mut self, _score: u32) {}

    fn set_life_display(&mut self, _life: u32) {}

    fn show_game_over_screen(&mut self, final_score: u32) {
        log::trace!("Game over screen, final score {}", final_score);
    }
}
