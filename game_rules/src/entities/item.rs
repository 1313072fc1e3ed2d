//! Item display data.

use serde::{Deserialize, Serialize};

/// Description of an item's skill effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub description: String,
}

/// An entry in the item table. Inventory slots only hold the item id; this is
/// what the view shows for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "skillEffect", default)]
    pub skill_effect: Option<SkillEffect>,
}

impl ItemDef {
    /// Tooltip lines: name, type, description and the skill effect if any.
    pub fn tooltip(&self) -> Vec<String> {
        let mut lines = vec![
            self.name.clone(),
            format!("类型: {}", self.kind),
            self.description.clone(),
        ];
        if let Some(skill) = &self.skill_effect {
            lines.push(format!("技能效果: {}", skill.description));
        }
        lines
    }
}
