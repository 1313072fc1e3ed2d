//! Static data tables: events, monsters, items and story fragments.
//!
//! Tables are read once at startup from four JSON files in a data directory
//! and stay read-only for the rest of the session.

mod event;

pub use event::*;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::{ItemDef, Monster};
use crate::world_state::Stage;

/// Errors raised while loading data tables.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {table}: {source}")]
    Json {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Events addressable by id, plus the per-stage random pools.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTable {
    /// Stage number (as a string) -> candidate events.
    #[serde(rename = "eventPools", default)]
    pub pools: HashMap<String, Vec<EventDef>>,

    #[serde(flatten)]
    pub events: HashMap<String, EventDef>,
}

impl EventTable {
    pub fn get(&self, id: &str) -> Option<&EventDef> {
        self.events.get(id)
    }

    /// The random pool for a stage, if one is defined.
    pub fn pool(&self, stage: Stage) -> Option<&[EventDef]> {
        self.pools.get(&stage.pool_key()).map(Vec::as_slice)
    }
}

/// An ending's display text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ending {
    pub title: String,
    pub description: String,
}

/// Story fragments keyed by story key, plus the endings table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryTable {
    #[serde(default)]
    pub endings: HashMap<String, Ending>,

    #[serde(flatten)]
    pub fragments: HashMap<String, String>,
}

impl StoryTable {
    pub fn fragment(&self, key: &str) -> Option<&str> {
        self.fragments.get(key).map(String::as_str)
    }

    pub fn ending(&self, id: &str) -> Option<&Ending> {
        self.endings.get(id)
    }
}

/// All static tables for one session.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub events: EventTable,
    pub monsters: HashMap<String, Monster>,
    pub items: HashMap<String, ItemDef>,
    pub stories: StoryTable,
}

impl GameData {
    pub const EVENTS_FILE: &'static str = "events.json";
    pub const MONSTERS_FILE: &'static str = "monsters.json";
    pub const ITEMS_FILE: &'static str = "items.json";
    pub const STORIES_FILE: &'static str = "stories.json";

    /// Parse all four tables from JSON text.
    pub fn from_json(
        events: &str,
        monsters: &str,
        items: &str,
        stories: &str,
    ) -> Result<Self, ContentError> {
        Ok(Self {
            events: parse_table("events", events)?,
            monsters: parse_table("monsters", monsters)?,
            items: parse_table("items", items)?,
            stories: parse_table("stories", stories)?,
        })
    }

    /// Load all four tables from a data directory.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let events = read_table(dir, Self::EVENTS_FILE)?;
        let monsters = read_table(dir, Self::MONSTERS_FILE)?;
        let items = read_table(dir, Self::ITEMS_FILE)?;
        let stories = read_table(dir, Self::STORIES_FILE)?;
        Self::from_json(&events, &monsters, &items, &stories)
    }

    /// Display name of an item, falling back to its id.
    pub fn item_name<'a>(&'a self, item_id: &'a str) -> &'a str {
        self.items
            .get(item_id)
            .map(|item| item.name.as_str())
            .unwrap_or(item_id)
    }
}

fn read_table(dir: &Path, file: &str) -> Result<String, ContentError> {
    let path = dir.join(file);
    std::fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
}

fn parse_table<T: serde::de::DeserializeOwned>(
    table: &'static str,
    text: &str,
) -> Result<T, ContentError> {
    serde_json::from_str(text).map_err(|source| ContentError::Json { table, source })
}
