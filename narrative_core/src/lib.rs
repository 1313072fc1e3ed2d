//! # Narrative Core
//!
//! The event interpreter of The Forgotten Throne. This crate takes the static
//! tables and rules from `game_rules`, resolves the player's choices against the
//! game state, and hands the result to whatever view is rendering the game.
//!
//! ## Core Components
//!
//! - **engine**: Event dispatch, choice handling, checks, combat and endings
//! - **persistence**: Save-game snapshots over pluggable key-value storage
//! - **view**: The rendering contract and the session controller driving it
//! - **clock**: Injectable wall clock for stamina regeneration
//!
//! ## Design Philosophy
//!
//! - **Data-Driven**: Every event, monster and ending comes from the data tables
//! - **Non-Fatal**: Broken content degrades to a message and a way to continue
//! - **Deterministic Under Test**: Time and randomness are injected

pub mod clock;
pub mod engine;
pub mod persistence;
pub mod view;

pub use clock::*;
pub use engine::*;
pub use persistence::*;
pub use view::*;
