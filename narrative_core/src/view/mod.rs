//! The rendering contract and the session controller that drives it.
//!
//! The engine never talks to a screen directly. After each user action the
//! [`Session`] clears the previous choices, hands the new [`Scene`] to the
//! [`GameView`] and re-renders the [`CharacterSheet`].

mod session;
mod sheet;

pub use session::*;
pub use sheet::*;

use game_rules::{Ending, Player};

use crate::engine::Scene;

/// Anything that can put the game in front of a player.
pub trait GameView {
    /// Remove the choices from the previous scene.
    fn clear_choices(&mut self);

    /// Show narration, event text and the numbered options.
    fn show_scene(&mut self, scene: &Scene);

    fn show_character(&mut self, sheet: &CharacterSheet);

    /// Show the point-allocation screen.
    fn show_creation(&mut self, player: &Player, attribute_cap: i32);

    fn show_ending(&mut self, ending: &Ending);

    /// Transient notice such as "saved" or a refused allocation.
    fn show_message(&mut self, message: &str);
}

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Creation,
    Playing,
    Ended,
}
