//! Event Engine - resolves dispatch and choices against the game state.
//!
//! One user action is fully resolved before the engine returns:
//! 1. **Prerequisites**: refuse the choice if required story keys are missing
//! 2. **Reward**: grant items and story progress
//! 3. **Effect**: apply attribute and hit-point deltas
//! 4. **Resolution**: follow the option's kind (event, check, combat, ending, ...)
//! 5. **Dispatch**: age the player, handle chapter transitions, pick the next event
//!
//! The result is left in a [`Scene`] for the view layer to render.

mod combat;
mod effects;
mod scene;

pub use combat::*;
pub use effects::*;
pub use scene::*;

use game_rules::{
    perform_check, Ending, EventDef, EventOption, GameConfig, GameData, GameState, OptionKind,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};

/// Text of the filler event used once a stage's pool is exhausted.
pub const REST_TEXT: &str = "你感到有些疲惫，暂时休整了一段时间。";
/// Option offered by the filler event.
pub const REST_OPTION_TEXT: &str = "继续旅程";
/// Shown when the current stage has no pool at all.
pub const DISCONNECTED_TEXT: &str = "故事已断线。请等待新的内容...";
/// Shown after a saved game is restored.
pub const LOADED_TEXT: &str = "游戏已载入，你回到了你的旅程中。";

/// The event interpreter. Owns the state, the static tables and the sources of
/// time and randomness.
pub struct EventEngine {
    data: GameData,
    config: GameConfig,
    state: GameState,
    rng: StdRng,
    clock: Box<dyn Clock>,
    encounter: Option<Encounter>,
    scene: Scene,
}

impl EventEngine {
    /// Create an engine with entropy-seeded randomness and the system clock.
    pub fn new(data: GameData, config: GameConfig) -> Self {
        let state = GameState::new(&config);
        Self {
            data,
            config,
            state,
            rng: StdRng::from_entropy(),
            clock: Box::new(SystemClock),
            encounter: None,
            scene: Scene::default(),
        }
    }

    /// Use a fixed seed for all rolls and draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current time from the engine's clock, in Unix milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Discard the current playthrough and start over with an unallocated player.
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.config);
        self.encounter = None;
        self.scene = Scene::default();
    }

    /// Replace the state with a restored one and offer to carry on from there.
    ///
    /// An in-progress fight is not part of the save, so play resumes with a fresh dispatch.
    pub fn restore(&mut self, state: GameState) {
        info!(playthrough = %state.id, stage = %state.stage, "restoring saved game");
        self.state = state;
        self.encounter = None;
        self.scene = Scene::default();
        self.scene.text = LOADED_TEXT.to_string();
        if !self.state.game_over {
            self.scene.offer_continue();
        }
    }

    /// Begin play with the allocated character. Returns false while creation points remain.
    pub fn start_game(&mut self) -> bool {
        if !self.state.player.is_ready() {
            return false;
        }
        let now = self.clock.now_ms();
        self.state.begin(&self.config, now);
        info!(playthrough = %self.state.id, "new game started");

        self.scene = Scene::default();
        let opening = self.config.opening_event.clone();
        self.dispatch(Some(opening.as_str()));
        true
    }

    /// Resolve the next event, optionally by explicit id. After game over the
    /// scene, ending included, is left as it is.
    pub fn next_event(&mut self, event_id: Option<&str>) -> &Scene {
        if self.state.game_over {
            return &self.scene;
        }
        self.scene = Scene::default();
        self.dispatch(event_id);
        &self.scene
    }

    /// Resolve the option at `index` in the current scene. Returns false for an invalid index.
    pub fn choose(&mut self, index: usize) -> bool {
        let Some(option) = self.scene.options.get(index).cloned() else {
            return false;
        };
        self.handle_choice(&option);
        true
    }

    /// Apply a chosen option: prerequisites, reward, effect, then its kind.
    pub fn handle_choice(&mut self, option: &EventOption) -> &Scene {
        if self.state.game_over {
            return &self.scene;
        }
        self.scene = Scene::default();
        debug!(kind = option.kind.tag(), text = %option.text, "handling choice");

        let missing = self.state.missing_prerequisites(&option.prerequisites);
        if !missing.is_empty() {
            let names: Vec<&str> = missing
                .iter()
                .map(|key| self.data.stories.fragment(key).unwrap_or(*key))
                .collect();
            self.scene
                .narrate(format!("【提示】你还未完成前置任务: {}", names.join("、")));
            self.redisplay_last_event();
            return &self.scene;
        }

        if let Some(reward) = &option.reward {
            apply_reward(&mut self.state, &self.data.stories, reward, &mut self.scene);
        }
        if let Some(effect) = &option.effect {
            apply_effect(&mut self.state.player, effect);
        }

        match &option.kind {
            OptionKind::Event {
                next_event_id,
                dialogue_text,
            }
            | OptionKind::Dialogue {
                next_event_id,
                dialogue_text,
            } => {
                if let Some(text) = dialogue_text {
                    self.scene.narrate(text.clone());
                }
                self.dispatch(next_event_id.as_deref());
            }
            OptionKind::Check {
                check,
                success,
                fail,
            } => {
                let passed = perform_check(
                    &self.state.player.attributes,
                    &check.attribute,
                    check.value,
                    &mut self.rng,
                );
                debug!(attribute = %check.attribute, threshold = check.value, passed, "attribute check");

                let branch = if passed { success } else { fail };
                if let Some(item) = &branch.item {
                    self.state.add_item(item.clone());
                }
                if let Some(effect) = &branch.effect {
                    apply_effect(&mut self.state.player, effect);
                }
                if let Some(text) = &branch.text {
                    self.scene.narrate(text.clone());
                }
                self.dispatch(branch.event_id.as_deref());
            }
            OptionKind::Combat {
                monster_id,
                success,
            } => {
                self.resolve_combat(monster_id, success);
            }
            OptionKind::Attribute { success_text } => {
                if let Some(effect) = &option.effect {
                    apply_effect(&mut self.state.player, effect);
                }
                if let Some(text) = success_text {
                    self.scene.narrate(text.clone());
                }
                self.dispatch(None);
            }
            OptionKind::Ending { ending_id } => {
                self.end_game(ending_id);
            }
            OptionKind::Unknown { tag } => {
                debug!(?tag, "unrecognized option type, continuing");
                self.dispatch(None);
            }
        }

        &self.scene
    }

    /// End the session with the given ending.
    pub fn end_game(&mut self, ending_id: &str) {
        self.state.game_over = true;
        self.encounter = None;

        let ending = match self.data.stories.ending(ending_id) {
            Some(ending) => ending.clone(),
            None => {
                warn!(ending_id, "ending not found");
                Ending {
                    title: "一个未知的结局".to_string(),
                    description: "你的旅程以一个未知的方式结束了。".to_string(),
                }
            }
        };
        info!(playthrough = %self.state.id, ending_id, title = %ending.title, "game over");

        self.scene.options.clear();
        self.scene.ending = Some(ending);
    }

    /// Pick and present the next event, appending to the current scene.
    fn dispatch(&mut self, event_id: Option<&str>) {
        if self.state.game_over {
            return;
        }

        let now = self.clock.now_ms();
        self.state
            .stamina
            .restore(now, self.config.stamina.regen_interval_ms);

        if let Some(stage) = self
            .state
            .check_stage_transition(&self.config.progression.stage_ages)
        {
            info!(stage = %stage, age = self.state.player.age, "chapter transition");
            if let Some(message) = stage.transition_message() {
                self.scene.narrate(message);
            }
            self.scene.offer_continue();
            return;
        }

        if event_id.is_none() && self.state.advance_month() {
            debug!(age = self.state.player.age, "a year has passed");
        }

        let event = match event_id.and_then(|id| self.data.events.get(id)) {
            Some(event) => event.clone(),
            None => match self.draw_from_pool() {
                Some(event) => event,
                None => {
                    warn!(stage = %self.state.stage, "no event pool for stage");
                    self.scene.text = DISCONNECTED_TEXT.to_string();
                    self.scene.offer_continue();
                    return;
                }
            },
        };

        self.state.last_event_id = event_id.map(str::to_string);
        if let Some(id) = &event.id {
            self.state.mark_triggered(id.clone());
        }
        debug!(id = ?event.id, "presenting event");

        self.encounter = None;
        self.scene.present(&event);
    }

    /// Uniform draw from the stage pool, skipping triggered unique events.
    ///
    /// Returns the rest filler when every candidate is used up, and `None` when
    /// the stage has no pool at all.
    fn draw_from_pool(&mut self) -> Option<EventDef> {
        let pool = self.data.events.pool(self.state.stage)?;
        if pool.is_empty() {
            return Some(rest_event());
        }

        let available: Vec<&EventDef> = pool
            .iter()
            .filter(|event| match &event.id {
                Some(id) => !self.state.is_triggered(id),
                None => true,
            })
            .collect();

        Some(
            available
                .choose(&mut self.rng)
                .map(|event| (*event).clone())
                .unwrap_or_else(rest_event),
        )
    }

    /// After a refused choice, show the last explicit event again or a continue affordance.
    fn redisplay_last_event(&mut self) {
        let last = self
            .state
            .last_event_id
            .as_deref()
            .and_then(|id| self.data.events.get(id));
        match last {
            Some(event) => self.scene.present(event),
            None => self.scene.offer_continue(),
        }
    }
}

fn rest_event() -> EventDef {
    EventDef::transient(REST_TEXT, vec![EventOption::continue_with(REST_OPTION_TEXT)])
}


#[cfg(test)]
mod tests {
    use super::fixtures::{engine, option_index, started};
    use super::*;
    use game_rules::{Attribute, Stage};

    #[test]
    fn test_start_requires_spent_points() {
        let (mut engine, _) = engine(1);
        engine.state_mut().player.points_left = 3;
        assert!(!engine.start_game());
        assert!(engine.scene().options.is_empty());
    }

    #[test]
    fn test_start_presents_opening_event() {
        let (engine, _) = started(1);
        let state = engine.state();

        assert_eq!(engine.scene().text, "你在破庙中醒来，手中握着一枚旧印章。");
        assert_eq!(state.last_event_id.as_deref(), Some("start_game"));
        assert!(state.is_triggered("start_game"));
        assert_eq!(state.month, 1);
        // 100 + (20 + 10) / 5
        assert_eq!(state.stamina.max, 106);
    }

    #[test]
    fn test_random_dispatch_advances_month() {
        let (mut engine, _) = started(1);
        engine.next_event(None);
        assert_eq!(engine.state().month, 2);

        engine.state_mut().month = 12;
        engine.state_mut().triggered_events.clear();
        engine.next_event(None);
        assert_eq!(engine.state().month, 1);
        assert_eq!(engine.state().player.age, 2);
    }

    #[test]
    fn test_unique_events_drawn_once() {
        let (mut engine, _) = started(7);
        let mut seen = Vec::new();

        for _ in 0..3 {
            engine.next_event(None);
            seen.push(engine.scene().text.clone());
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);

        for _ in 0..5 {
            engine.next_event(None);
            assert_eq!(engine.scene().text, REST_TEXT);
            assert_eq!(engine.scene().options[0].text, REST_OPTION_TEXT);
        }
    }

    #[test]
    fn test_triggered_event_can_be_targeted_explicitly() {
        let (mut engine, _) = started(3);
        engine.next_event(Some("start_game"));
        assert_eq!(engine.scene().text, "你在破庙中醒来，手中握着一枚旧印章。");
        assert_eq!(engine.state().month, 1);
    }

    #[test]
    fn test_unknown_explicit_id_falls_back_to_pool() {
        let (mut engine, _) = started(3);
        engine.next_event(Some("no_such_event"));
        assert!(engine.scene().text.starts_with("池中事件"));
        assert_eq!(engine.state().last_event_id.as_deref(), Some("no_such_event"));
        // explicit id given, so no month passes
        assert_eq!(engine.state().month, 1);
    }

    #[test]
    fn test_empty_pool_gives_rest_event() {
        let (mut engine, _) = started(3);
        engine.state_mut().stage = Stage::new(2);
        engine.state_mut().player.age = 16;
        engine.next_event(None);
        assert_eq!(engine.scene().text, REST_TEXT);
    }

    #[test]
    fn test_anonymous_pool_events_repeat() {
        let (mut engine, _) = started(3);
        engine.state_mut().stage = Stage::new(3);
        engine.state_mut().player.age = 30;
        for _ in 0..4 {
            engine.next_event(None);
            assert_eq!(engine.scene().text, "无名的日常。");
        }
    }

    #[test]
    fn test_missing_pool_disconnects() {
        let (mut engine, _) = started(3);
        engine.state_mut().stage = Stage::new(4);
        engine.state_mut().player.age = 40;
        engine.next_event(None);
        assert_eq!(engine.scene().text, DISCONNECTED_TEXT);
        assert_eq!(engine.scene().options[0].text, CONTINUE_TEXT);
    }

    #[test]
    fn test_age_transition_short_circuits() {
        let (mut engine, _) = started(3);
        engine.state_mut().player.age = 15;
        let month = engine.state().month;

        engine.next_event(None);
        assert_eq!(engine.state().stage, Stage::new(2));
        assert_eq!(engine.state().month, month);
        assert_eq!(
            engine.scene().narration,
            vec!["【章节过渡】你已步入青年，第一幕：觉醒与初探，开始了！"]
        );
        assert_eq!(engine.scene().options.len(), 1);

        engine.next_event(None);
        assert_eq!(engine.state().stage, Stage::new(2));
        assert!(engine.scene().narration.is_empty());
    }

    #[test]
    fn test_each_threshold_fires_once_over_a_lifetime() {
        let (mut engine, _) = started(5);
        let mut transitions = 0;
        let mut last_stage = engine.state().stage;

        for _ in 0..12 * 45 {
            engine.next_event(None);
            let stage = engine.state().stage;
            assert!(stage >= last_stage);
            if stage != last_stage {
                transitions += 1;
            }
            last_stage = stage;
        }

        assert_eq!(transitions, 3);
        assert_eq!(last_stage, Stage::new(4));
    }

    #[test]
    fn test_stamina_regenerates_on_dispatch() {
        let (mut engine, clock) = started(3);
        engine.state_mut().stamina.current = 50;
        clock.advance(45_000);
        engine.next_event(None);
        assert_eq!(engine.state().stamina.current, 54);

        clock.advance(10_000_000);
        engine.next_event(None);
        assert_eq!(engine.state().stamina.current, engine.state().stamina.max);
    }

    #[test]
    fn test_reward_then_dispatch() {
        let (mut engine, _) = started(3);
        engine.choose(option_index(&engine, "翻找香案"));

        let state = engine.state();
        assert_eq!(state.inventory, vec!["old_seal"]);
        assert!(state.has_completed("quest_seal"));
        assert_eq!(engine.scene().narration, vec!["【任务更新】你找到了一枚旧印章。"]);
        assert_eq!(engine.scene().text, "村子里炊烟袅袅。");
    }

    #[test]
    fn test_prerequisite_blocks_choice() {
        let (mut engine, _) = started(3);
        engine.choose(option_index(&engine, "离开破庙"));
        let before = engine.state().clone();

        engine.choose(option_index(&engine, "拜访长老"));

        assert_eq!(engine.state(), &before);
        assert_eq!(
            engine.scene().narration,
            vec!["【提示】你还未完成前置任务: 你找到了一枚旧印章。"]
        );
        assert_eq!(engine.scene().text, "村子里炊烟袅袅。");
    }

    #[test]
    fn test_prerequisite_without_last_event_offers_continue() {
        let (mut engine, _) = started(3);
        engine.state_mut().last_event_id = None;
        let option = EventOption::continue_with("去").with_prerequisites(["quest_unknown"]);

        engine.handle_choice(&option);
        assert_eq!(
            engine.scene().narration,
            vec!["【提示】你还未完成前置任务: quest_unknown"]
        );
        assert_eq!(engine.scene().options[0].text, CONTINUE_TEXT);
    }

    #[test]
    fn test_prerequisite_met_allows_dialogue() {
        let (mut engine, _) = started(3);
        engine.choose(option_index(&engine, "翻找香案"));
        engine.choose(option_index(&engine, "拜访长老"));

        assert_eq!(engine.scene().narration, vec!["你敲响了长老的门。"]);
        assert_eq!(engine.scene().text, "长老打量着你的印章。");
    }

    #[test]
    fn test_check_follows_inequality() {
        for seed in 0..20 {
            let (mut engine, _) = started(seed);
            engine.choose(option_index(&engine, "离开破庙"));
            let hp = engine.state().player.current_hp;

            engine.choose(option_index(&engine, "攀爬钟楼"));
            let state = engine.state();
            if engine.scene().narration == vec!["你登上了钟楼。"] {
                assert_eq!(state.inventory, vec!["bell_rope"]);
                assert_eq!(state.player.current_hp, hp);
            } else {
                assert_eq!(engine.scene().narration, vec!["你摔了下来。"]);
                assert!(state.inventory.is_empty());
                assert_eq!(state.player.current_hp, hp - 5);
            }
            assert_eq!(engine.scene().text, "村子里炊烟袅袅。");
        }
    }

    #[test]
    fn test_attribute_option_applies_effect_twice() {
        let (mut engine, _) = started(3);
        engine.choose(option_index(&engine, "离开破庙"));
        engine.choose(option_index(&engine, "冥想"));

        assert_eq!(engine.state().player.attributes.get(Attribute::Spirit), 2);
        assert_eq!(engine.scene().narration, vec!["你的心静了下来。"]);
        assert!(engine.scene().text.starts_with("池中事件"));
    }

    #[test]
    fn test_unknown_option_continues() {
        let (mut engine, _) = started(3);
        engine.choose(option_index(&engine, "离开破庙"));
        engine.choose(option_index(&engine, "跳舞"));
        assert!(engine.scene().text.starts_with("池中事件"));
        assert_eq!(engine.state().month, 2);
    }

    #[test]
    fn test_ending_is_terminal() {
        let (mut engine, _) = started(3);
        engine.choose(option_index(&engine, "离开破庙"));
        engine.choose(option_index(&engine, "登上王座"));

        assert!(engine.state().game_over);
        let ending = engine.scene().ending.clone().unwrap();
        assert_eq!(ending.title, "王冠");
        assert!(engine.scene().options.is_empty());

        let snapshot = engine.state().clone();
        let scene = engine.scene().clone();
        engine.next_event(None);
        assert_eq!(engine.scene(), &scene);
        engine.next_event(Some("village"));
        engine.handle_choice(&EventOption::continue_with("继续"));
        assert_eq!(engine.state(), &snapshot);
        assert_eq!(engine.scene(), &scene);
        assert_eq!(engine.scene().ending.as_ref().unwrap().title, "王冠");
    }

    #[test]
    fn test_combat_without_monster_cancels() {
        let (mut engine, _) = started(3);
        let option: EventOption = serde_json::from_value(serde_json::json!({
            "text": "拔剑",
            "type": "combat",
            "success": {"eventId": "village"}
        }))
        .unwrap();

        engine.handle_choice(&option);
        assert_eq!(engine.scene().narration, vec!["未知的敌人，战斗取消。"]);
        assert!(engine.scene().text.starts_with("池中事件"));
        assert!(!engine.state().game_over);
    }

    #[test]
    fn test_unknown_ending() {
        let (mut engine, _) = started(3);
        engine.end_game("no_such_ending");
        let ending = engine.scene().ending.clone().unwrap();
        assert_eq!(ending.title, "一个未知的结局");
        assert_eq!(ending.description, "你的旅程以一个未知的方式结束了。");
    }

    #[test]
    fn test_invalid_choice_index() {
        let (mut engine, _) = started(3);
        assert!(!engine.choose(99));
        assert_eq!(engine.scene().text, "你在破庙中醒来，手中握着一枚旧印章。");
    }

    #[test]
    fn test_restore_offers_continue() {
        let (mut engine, _) = started(3);
        engine.choose(option_index(&engine, "翻找香案"));
        let saved = engine.state().clone();

        let (mut other, _) = super::fixtures::engine(4);
        other.restore(saved.clone());
        assert_eq!(other.state(), &saved);
        assert_eq!(other.scene().text, LOADED_TEXT);
        assert_eq!(other.scene().options[0].text, CONTINUE_TEXT);

        other.choose(0);
        assert_eq!(other.state().month, saved.month + 1);
        assert!(other.state().has_completed("quest_seal"));
    }

    #[test]
    fn test_reset_discards_progress() {
        let (mut engine, _) = started(3);
        let id = engine.state().id;
        engine.choose(option_index(&engine, "翻找香案"));
        engine.reset();

        assert_ne!(engine.state().id, id);
        assert!(engine.state().inventory.is_empty());
        assert_eq!(engine.state().player.points_left, 50);
        assert!(engine.scene().options.is_empty());
    }
}
