//! The eleven player attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Attribute names as they appear in data tables and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "耐力")]
    Endurance,
    #[serde(rename = "精神")]
    Spirit,
    #[serde(rename = "体态")]
    Physique,
    #[serde(rename = "运气")]
    Luck,
    #[serde(rename = "异化")]
    Alienation,
    #[serde(rename = "学习")]
    Learning,
    #[serde(rename = "体力")]
    Vitality,
    #[serde(rename = "力量")]
    Strength,
    #[serde(rename = "感知")]
    Perception,
    #[serde(rename = "情感")]
    Emotion,
    #[serde(rename = "抗性")]
    Resistance,
}

impl Attribute {
    /// All attributes in display order.
    pub const ALL: [Attribute; 11] = [
        Attribute::Endurance,
        Attribute::Spirit,
        Attribute::Physique,
        Attribute::Luck,
        Attribute::Alienation,
        Attribute::Learning,
        Attribute::Vitality,
        Attribute::Strength,
        Attribute::Perception,
        Attribute::Emotion,
        Attribute::Resistance,
    ];

    /// The name used in data tables.
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Endurance => "耐力",
            Attribute::Spirit => "精神",
            Attribute::Physique => "体态",
            Attribute::Luck => "运气",
            Attribute::Alienation => "异化",
            Attribute::Learning => "学习",
            Attribute::Vitality => "体力",
            Attribute::Strength => "力量",
            Attribute::Perception => "感知",
            Attribute::Emotion => "情感",
            Attribute::Resistance => "抗性",
        }
    }
}

impl FromStr for Attribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.name() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute values keyed by attribute. Always holds all eleven entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<Attribute, i32>);

impl Default for Attributes {
    fn default() -> Self {
        Self(Attribute::ALL.iter().map(|attr| (*attr, 0)).collect())
    }
}

impl Attributes {
    /// Current value of an attribute.
    pub fn get(&self, attr: Attribute) -> i32 {
        self.0.get(&attr).copied().unwrap_or(0)
    }

    /// Look up an attribute by its data-table name.
    pub fn get_by_name(&self, name: &str) -> Option<i32> {
        name.parse::<Attribute>().ok().map(|attr| self.get(attr))
    }

    pub fn set(&mut self, attr: Attribute, value: i32) {
        self.0.insert(attr, value);
    }

    /// Add a delta to an attribute.
    pub fn add(&mut self, attr: Attribute, delta: i32) {
        *self.0.entry(attr).or_insert(0) += delta;
    }

    /// Sum of all attribute values.
    pub fn total(&self) -> i32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        self.0.iter().map(|(attr, value)| (*attr, *value))
    }
}
