//! Effect and reward application.

use game_rules::{Attribute, Effect, GameState, Player, Reward, StoryTable};
use tracing::debug;

use super::Scene;

/// Add each delta to the matching attribute; `hp` goes to current hit points
/// (clamped at max). Keys that name neither are ignored.
pub fn apply_effect(player: &mut Player, effect: &Effect) {
    for (key, delta) in effect.iter() {
        if key == Effect::HP_KEY {
            player.adjust_hp(delta);
        } else if let Ok(attribute) = key.parse::<Attribute>() {
            player.attributes.add(attribute, delta);
        } else {
            debug!(key, delta, "ignoring unknown effect key");
        }
    }
}

/// Grant reward items and mark the story key complete, announcing the story text.
pub fn apply_reward(state: &mut GameState, stories: &StoryTable, reward: &Reward, scene: &mut Scene) {
    for item in &reward.items {
        state.add_item(item.clone());
    }

    if let Some(key) = &reward.story_key {
        state.complete_story(key.clone());
        if let Some(text) = stories.fragment(key) {
            scene.narrate(format!("【任务更新】{text}"));
        }
    }
}
