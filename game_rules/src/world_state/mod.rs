//! Game state: the single mutable record of a playthrough.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::GameConfig;
use crate::entities::{Attribute, Player, PlaythroughId};

/// Narrative chapter, 1 through 5. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Stage(u8);

impl From<u8> for Stage {
    fn from(value: u8) -> Self {
        Stage::new(value)
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> Self {
        stage.0
    }
}

impl Stage {
    pub const FIRST: Stage = Stage(1);
    pub const LAST: Stage = Stage(5);

    /// Create a stage, clamped into 1..=5.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::FIRST.0, Self::LAST.0))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// The following stage, saturating at the last one.
    pub fn next(&self) -> Stage {
        Stage::new(self.0.saturating_add(1))
    }

    /// Key of this stage's random event pool.
    pub fn pool_key(&self) -> String {
        self.0.to_string()
    }

    /// Chapter title shown above the story.
    pub fn title(&self) -> &'static str {
        match self.0 {
            1 => "序章：被遗忘的血脉 (1-15岁)",
            2 => "第一幕：觉醒与初探 (15-23岁)",
            3 => "第二幕：寻觅与迷失 (23-38岁)",
            4 => "第三幕：镜中之王 (38岁之后)",
            5 => "终章：自我之镜 (最终决战)",
            _ => "未知章节",
        }
    }

    /// Message shown when the story enters this stage by ageing.
    pub fn transition_message(&self) -> Option<&'static str> {
        match self.0 {
            2 => Some("【章节过渡】你已步入青年，第一幕：觉醒与初探，开始了！"),
            3 => Some("【章节过渡】你步入了成熟期，第二幕：寻觅与迷失，开始了！"),
            4 => Some("【章节过渡】你已步入最终阶段，第三幕：镜中之王，开始了！"),
            _ => None,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stamina pool, regenerated from real elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamina {
    pub current: i32,
    pub max: i32,
    /// Wall-clock time of the last action, in Unix milliseconds.
    pub last_action_ms: u64,
}

impl Default for Stamina {
    fn default() -> Self {
        Self {
            current: 100,
            max: 100,
            last_action_ms: 0,
        }
    }
}

impl Stamina {
    /// Regenerate one point per elapsed interval, capped at max. Returns points gained.
    pub fn restore(&mut self, now_ms: u64, interval_ms: u64) -> i32 {
        let elapsed = now_ms.saturating_sub(self.last_action_ms);
        let points = (elapsed / interval_ms.max(1)).min(i32::MAX as u64) as i32;
        let before = self.current;
        self.current = self.current.saturating_add(points).min(self.max);
        self.last_action_ms = now_ms;
        self.current - before
    }
}

/// The complete state of a playthrough at any point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: PlaythroughId,
    pub player: Player,
    pub stage: Stage,
    /// Month within the current year, 1 through 12.
    pub month: u8,
    pub stamina: Stamina,
    pub job: Option<String>,

    /// Item ids in acquisition order. Duplicates are separate entries.
    pub inventory: Vec<String>,

    /// Ids of unique events already presented.
    pub triggered_events: BTreeSet<String>,

    /// Story key -> completed.
    pub quest_progress: BTreeMap<String, bool>,

    /// Id requested by the last dispatch, used to re-show an event after a refused choice.
    pub last_event_id: Option<String>,

    pub game_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl GameState {
    /// Create a new state with an unallocated player.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            id: PlaythroughId::new(),
            player: Player::new(&config.creation),
            stage: Stage::FIRST,
            month: 1,
            stamina: Stamina {
                current: config.stamina.base,
                max: config.stamina.base,
                last_action_ms: 0,
            },
            job: None,
            inventory: Vec::new(),
            triggered_events: BTreeSet::new(),
            quest_progress: BTreeMap::new(),
            last_event_id: None,
            game_over: false,
        }
    }

    /// Size the stamina pool from the allocated attributes and fill it.
    pub fn begin(&mut self, config: &GameConfig, now_ms: u64) {
        let attrs = &self.player.attributes;
        let bonus = (attrs.get(Attribute::Vitality) + attrs.get(Attribute::Endurance)) / 5;
        self.stamina.max = config.stamina.base + bonus;
        self.stamina.current = self.stamina.max;
        self.stamina.last_action_ms = now_ms;
    }

    /// Advance the calendar by one month. Returns true when a year passed.
    pub fn advance_month(&mut self) -> bool {
        if self.month >= 12 {
            self.month = 1;
            self.player.age = self.player.age.saturating_add(1);
            return true;
        }
        self.month += 1;
        false
    }

    /// Pull an out-of-range month (from a hand-edited save, say) back into 1..=12.
    pub fn normalize_calendar(&mut self) {
        self.month = self.month.clamp(1, 12);
    }

    /// Move to the next stage if the player's age has crossed the current stage's threshold.
    ///
    /// At most one stage per call. Stage 5 is never reached by ageing.
    pub fn check_stage_transition(&mut self, stage_ages: &[u32; 3]) -> Option<Stage> {
        let index = usize::from(self.stage.value()).checked_sub(1)?;
        let threshold = *stage_ages.get(index)?;
        if self.player.age < threshold {
            return None;
        }
        self.stage = self.stage.next();
        Some(self.stage)
    }

    pub fn is_triggered(&self, event_id: &str) -> bool {
        self.triggered_events.contains(event_id)
    }

    pub fn mark_triggered(&mut self, event_id: impl Into<String>) {
        self.triggered_events.insert(event_id.into());
    }

    /// Mark a story key complete. Returns false if it already was.
    pub fn complete_story(&mut self, key: impl Into<String>) -> bool {
        self.quest_progress.insert(key.into(), true) != Some(true)
    }

    pub fn has_completed(&self, key: &str) -> bool {
        self.quest_progress.get(key).copied().unwrap_or(false)
    }

    /// Prerequisite keys that are not yet complete, in the order given.
    pub fn missing_prerequisites<'a>(&self, keys: &'a [String]) -> Vec<&'a str> {
        keys.iter()
            .map(String::as_str)
            .filter(|key| !self.has_completed(key))
            .collect()
    }

    /// Completed story keys that belong in the quest journal.
    pub fn completed_quests(&self) -> impl Iterator<Item = &str> {
        self.quest_progress
            .iter()
            .filter(|(key, done)| **done && key.contains("quest"))
            .map(|(key, _)| key.as_str())
    }

    pub fn add_item(&mut self, item_id: impl Into<String>) {
        self.inventory.push(item_id.into());
    }

    /// "年龄: X 岁, 月份: M" line.
    pub fn calendar_label(&self) -> String {
        format!("年龄: {} 岁, 月份: {}", self.player.age, self.month)
    }
}
