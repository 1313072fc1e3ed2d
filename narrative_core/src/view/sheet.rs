//! Character summary handed to the view.

use game_rules::{Attribute, GameData, GameState};

/// One inventory slot with the display data the item table provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item_id: String,
    pub name: String,
    /// Empty for ids missing from the item table.
    pub tooltip: Vec<String>,
}

/// Everything the character panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSheet {
    pub level: u32,
    pub exp: i32,
    pub next_level_exp: i32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub stamina: i32,
    pub max_stamina: i32,
    pub job: Option<String>,
    pub attributes: Vec<(Attribute, i32)>,
    /// Journal entries for completed quests: the story text, or the key when there is none.
    pub quests: Vec<String>,
    pub inventory: Vec<InventoryEntry>,
    pub calendar: String,
    pub chapter: &'static str,
}

impl CharacterSheet {
    pub fn from_state(state: &GameState, data: &GameData) -> Self {
        let player = &state.player;

        let quests = state
            .completed_quests()
            .map(|key| data.stories.fragment(key).unwrap_or(key).to_string())
            .collect();

        let inventory = state
            .inventory
            .iter()
            .map(|item_id| InventoryEntry {
                item_id: item_id.clone(),
                name: data.item_name(item_id).to_string(),
                tooltip: data
                    .items
                    .get(item_id)
                    .map(|item| item.tooltip())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            level: player.level,
            exp: player.exp,
            next_level_exp: player.next_level_exp,
            current_hp: player.current_hp,
            max_hp: player.max_hp,
            stamina: state.stamina.current,
            max_stamina: state.stamina.max,
            job: state.job.clone(),
            attributes: player.attributes.iter().collect(),
            quests,
            inventory,
            calendar: state.calendar_label(),
            chapter: state.stage.title(),
        }
    }

    /// The panel as plain text lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            "角色信息".to_string(),
            format!("等级: {}", self.level),
            format!("经验: {} / {}", self.exp, self.next_level_exp),
            format!("生命值: {} / {}", self.current_hp, self.max_hp),
            format!("体力: {} / {}", self.stamina, self.max_stamina),
            format!("职业: {}", self.job.as_deref().unwrap_or("无")),
            "属性".to_string(),
        ];
        lines.extend(
            self.attributes
                .iter()
                .map(|(attribute, value)| format!("{attribute}: {value}")),
        );

        lines.push("任务日志".to_string());
        if self.quests.is_empty() {
            lines.push("无".to_string());
        } else {
            lines.extend(self.quests.iter().cloned());
        }
        lines
    }
}
