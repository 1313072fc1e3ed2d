//! Combat resolution: one round per choice.

use game_rules::{combat_damage, Branch, EventDef, EventOption, Monster, OptionKind};
use tracing::{debug, info, warn};

use super::EventEngine;

/// Text of the scene shown between rounds.
pub const REENGAGE_TEXT: &str = "你再次面对敌人。";
/// The only option offered between rounds.
pub const KEEP_FIGHTING_TEXT: &str = "继续战斗";

/// A fight in progress. The monster is a private copy whose hit points carry
/// across rounds; the monster table itself is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    pub monster_id: String,
    pub monster: Monster,
}

/// How a single round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Defeat,
    Victory,
    Ongoing,
}

impl EventEngine {
    /// The fight currently in progress, if any.
    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    /// Resolve one round against `monster_id`.
    ///
    /// Defeat is checked before victory, so a round where both sides fall ends the game.
    /// Returns how the round ended, or `None` when the monster is unknown. Choice
    /// handling only needs the scene; the outcome is for callers and tests.
    pub(super) fn resolve_combat(&mut self, monster_id: &str, success: &Branch) -> Option<RoundOutcome> {
        let mut encounter = match self.encounter.take() {
            Some(encounter) if encounter.monster_id == monster_id => encounter,
            _ => match self.data.monsters.get(monster_id) {
                Some(monster) => Encounter {
                    monster_id: monster_id.to_string(),
                    monster: monster.clone(),
                },
                None => {
                    warn!(monster_id, "unknown monster, combat cancelled");
                    self.scene.narrate("未知的敌人，战斗取消。");
                    self.dispatch(None);
                    return None;
                }
            },
        };
        let name = encounter.monster.name.clone();

        let player_damage = combat_damage(&self.state.player, &encounter.monster, &mut self.rng);
        let monster_damage = combat_damage(&encounter.monster, &self.state.player, &mut self.rng);
        debug!(monster_id, player_damage, monster_damage, "combat round");

        self.scene.narrate(format!("你遭遇了 {name}！"));
        self.scene.narrate(format!("你对 {name} 造成了 {player_damage} 点伤害。"));
        self.scene.narrate(format!("{name} 对你造成了 {monster_damage} 点伤害。"));

        self.state.player.current_hp -= monster_damage;
        encounter.monster.hp -= player_damage;

        if self.state.player.current_hp <= 0 {
            self.scene.narrate("你被击败了！游戏结束。");
            let ending = self.config.defeat_ending.clone();
            self.end_game(&ending);
            return Some(RoundOutcome::Defeat);
        }

        if encounter.monster.hp <= 0 {
            let exp = encounter.monster.exp;
            self.scene
                .narrate(format!("你击败了 {name}！你获得了 {exp} 点经验值。"));
            self.state.player.exp += exp;
            if self
                .state
                .player
                .check_level_up(self.config.progression.level_up_factor)
            {
                info!(level = self.state.player.level, "level up");
                self.scene
                    .narrate(format!("【升级】你升到了 {} 级！", self.state.player.level));
            }
            for item in &encounter.monster.drops {
                self.state.add_item(item.clone());
                self.scene
                    .narrate(format!("你获得了 {}。", self.data.item_name(item)));
            }
            self.dispatch(success.event_id.as_deref());
            return Some(RoundOutcome::Victory);
        }

        self.scene.narrate("战斗仍在继续！");
        let rematch = EventOption::new(
            KEEP_FIGHTING_TEXT,
            OptionKind::Combat {
                monster_id: monster_id.to_string(),
                success: success.clone(),
            },
        );
        self.scene
            .present(&EventDef::transient(REENGAGE_TEXT, vec![rematch]));
        self.encounter = Some(encounter);
        Some(RoundOutcome::Ongoing)
    }
}
