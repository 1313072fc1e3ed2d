//! Event and option definitions.
//!
//! Options arrive as loose JSON objects whose `type` field decides which other
//! fields matter. They are read into a flat [`RawOption`] first and then
//! resolved into the typed [`OptionKind`], so a missing or unrecognized type
//! degrades to [`OptionKind::Unknown`] instead of failing the whole table.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Sparse attribute deltas. Keys are attribute names or [`Effect::HP_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Effect(pub BTreeMap<String, i32>);

impl Effect {
    /// Reserved key for current hit points.
    pub const HP_KEY: &'static str = "hp";

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(key, delta)| (key.as_str(), *delta))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for Effect {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, delta)| (key.into(), delta)).collect())
    }
}

/// Items and story progress granted by choosing an option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reward {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub story_key: Option<String>,
}

/// Attribute check parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeCheck {
    pub attribute: String,
    /// The roll must exceed this value.
    pub value: i32,
}

/// One side of a check, or the success target of a combat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub effect: Option<Effect>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "eventId", default)]
    pub event_id: Option<String>,
}

impl Branch {
    /// A branch that only names the event to continue with.
    pub fn to_event(event_id: impl Into<String>) -> Self {
        Self {
            event_id: Some(event_id.into()),
            ..Self::default()
        }
    }
}

/// Type-specific part of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Event {
        next_event_id: Option<String>,
        dialogue_text: Option<String>,
    },
    Dialogue {
        next_event_id: Option<String>,
        dialogue_text: Option<String>,
    },
    Check {
        check: AttributeCheck,
        success: Branch,
        fail: Branch,
    },
    Combat {
        monster_id: String,
        success: Branch,
    },
    Attribute {
        success_text: Option<String>,
    },
    Ending {
        ending_id: String,
    },
    /// Unrecognized or incomplete type; treated as a plain "continue".
    Unknown { tag: Option<String> },
}

impl OptionKind {
    /// The data-table tag of this kind.
    pub fn tag(&self) -> &str {
        match self {
            OptionKind::Event { .. } => "event",
            OptionKind::Dialogue { .. } => "dialogue",
            OptionKind::Check { .. } => "check",
            OptionKind::Combat { .. } => "combat",
            OptionKind::Attribute { .. } => "attribute",
            OptionKind::Ending { .. } => "ending",
            OptionKind::Unknown { tag } => tag.as_deref().unwrap_or("unknown"),
        }
    }
}

/// A choice offered by an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOption")]
pub struct EventOption {
    pub text: String,
    pub kind: OptionKind,
    pub prerequisites: Vec<String>,
    pub reward: Option<Reward>,
    pub effect: Option<Effect>,
}

impl EventOption {
    /// An option of the given kind with no reward, effect or prerequisites.
    pub fn new(text: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            text: text.into(),
            kind,
            prerequisites: Vec::new(),
            reward: None,
            effect: None,
        }
    }

    /// A plain "continue" that falls through to random dispatch.
    pub fn continue_with(text: impl Into<String>) -> Self {
        Self::new(
            text,
            OptionKind::Event {
                next_event_id: None,
                dialogue_text: None,
            },
        )
    }

    pub fn with_prerequisites(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.prerequisites = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = Some(reward);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// An option exactly as written in the data table.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawOption {
    #[serde(default)]
    text: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    next_event_id: Option<String>,
    #[serde(rename = "dialogueText", default)]
    dialogue_text: Option<String>,
    #[serde(default)]
    check: Option<AttributeCheck>,
    #[serde(default)]
    success: Option<Branch>,
    #[serde(default)]
    fail: Option<Branch>,
    #[serde(rename = "monsterId", default)]
    monster_id: Option<String>,
    #[serde(rename = "successText", default)]
    success_text: Option<String>,
    #[serde(rename = "endingId", default)]
    ending_id: Option<String>,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    reward: Option<Reward>,
    #[serde(default)]
    effect: Option<Effect>,
}

impl From<RawOption> for EventOption {
    fn from(raw: RawOption) -> Self {
        let kind = match (raw.kind.as_deref(), raw.check, raw.monster_id) {
            (Some("event"), ..) => OptionKind::Event {
                next_event_id: raw.next_event_id,
                dialogue_text: raw.dialogue_text,
            },
            (Some("dialogue"), ..) => OptionKind::Dialogue {
                next_event_id: raw.next_event_id,
                dialogue_text: raw.dialogue_text,
            },
            (Some("check"), Some(check), _) => OptionKind::Check {
                check,
                success: raw.success.unwrap_or_default(),
                fail: raw.fail.unwrap_or_default(),
            },
            // a missing monster id resolves to the unknown-monster path at play time
            (Some("combat"), _, monster_id) => OptionKind::Combat {
                monster_id: monster_id.unwrap_or_default(),
                success: raw.success.unwrap_or_default(),
            },
            (Some("attribute"), ..) => OptionKind::Attribute {
                success_text: raw.success_text,
            },
            (Some("ending"), ..) => OptionKind::Ending {
                ending_id: raw.ending_id.unwrap_or_default(),
            },
            (other, ..) => OptionKind::Unknown {
                tag: other.map(str::to_string),
            },
        };

        Self {
            text: raw.text,
            kind,
            prerequisites: raw.prerequisites,
            reward: raw.reward,
            effect: raw.effect,
        }
    }
}

/// A story event: text plus the choices it offers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventDef {
    /// Stable id of a unique event. Absent for filler.
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub options: Vec<EventOption>,
}

impl EventDef {
    /// A one-off event with no id.
    pub fn transient(text: impl Into<String>, options: Vec<EventOption>) -> Self {
        Self {
            id: None,
            text: text.into(),
            options,
        }
    }
}
