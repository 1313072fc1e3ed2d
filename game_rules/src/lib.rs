//! # Game Rules
//!
//! The rules crate for The Forgotten Throne: data tables, player and world state,
//! the check/damage math and the tunable rules configuration.
//! This crate holds no dispatch logic; it is the single source of truth for what
//! the event engine reads and mutates.

pub mod config;
pub mod content;
pub mod entities;
pub mod mechanics;
pub mod world_state;

pub use config::*;
pub use content::*;
pub use entities::*;
pub use mechanics::*;
pub use world_state::*;
