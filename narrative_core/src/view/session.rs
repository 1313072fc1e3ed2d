//! Menu flows: new game, load, save, play, return to menu.

use game_rules::{AllocationError, AllocationStep, Attribute};
use tracing::debug;

use super::{CharacterSheet, GameView, Screen};
use crate::engine::EventEngine;
use crate::persistence::{self, SaveStore};

pub const SAVED_TEXT: &str = "游戏已保存！";
pub const SAVE_FAILED_TEXT: &str = "保存游戏数据失败。";
pub const NO_SAVE_TEXT: &str = "没有可载入的存档。";
pub const UNSPENT_POINTS_TEXT: &str = "请先分配完所有属性点。";

/// Owns the engine, a view and a save store, and routes user actions between them.
pub struct Session<V: GameView, S: SaveStore> {
    engine: EventEngine,
    view: V,
    store: S,
    screen: Screen,
}

impl<V: GameView, S: SaveStore> Session<V, S> {
    pub fn new(engine: EventEngine, view: V, store: S) -> Self {
        Self {
            engine,
            view,
            store,
            screen: Screen::Menu,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn engine(&self) -> &EventEngine {
        &self.engine
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether "load game" should be offered.
    pub fn has_save(&self) -> bool {
        persistence::has_save(&self.store, &self.engine.config().save_key)
    }

    /// Throw away any playthrough and open character creation.
    pub fn new_game(&mut self) {
        self.engine.reset();
        self.screen = Screen::Creation;
        self.render_creation();
    }

    /// Apply one allocation step on the creation screen.
    pub fn allocate(&mut self, attribute: Attribute, step: AllocationStep) -> Result<(), AllocationError> {
        let cap = self.engine.config().creation.attribute_cap;
        let result = self
            .engine
            .state_mut()
            .player
            .allocate(attribute, step, cap);
        if let Err(err) = &result {
            debug!(%attribute, ?step, %err, "allocation refused");
            self.view.show_message(&err.to_string());
        }
        self.render_creation();
        result
    }

    /// Leave creation and start play. Refused while points remain.
    pub fn confirm_attributes(&mut self) -> bool {
        if self.screen != Screen::Creation {
            return false;
        }
        if !self.engine.start_game() {
            self.view.show_message(UNSPENT_POINTS_TEXT);
            return false;
        }
        self.screen = Screen::Playing;
        self.render();
        true
    }

    /// Pick the option at `index`. Returns false for an invalid index or when not playing.
    pub fn choose(&mut self, index: usize) -> bool {
        if self.screen != Screen::Playing || !self.engine.choose(index) {
            return false;
        }
        self.render();
        true
    }

    pub fn save(&mut self) -> bool {
        if self.screen != Screen::Playing {
            return false;
        }
        let now = self.engine.now_ms();
        let saved = persistence::save_game(
            &mut self.store,
            &self.engine.config().save_key,
            self.engine.state(),
            now,
        );
        self.view
            .show_message(if saved { SAVED_TEXT } else { SAVE_FAILED_TEXT });
        saved
    }

    /// Restore the saved playthrough. Shows a notice and returns false if there is none.
    pub fn load(&mut self) -> bool {
        let Some(state) = persistence::load_game(&self.store, &self.engine.config().save_key) else {
            self.view.show_message(NO_SAVE_TEXT);
            return false;
        };
        self.engine.restore(state);
        self.screen = Screen::Playing;
        self.render();
        true
    }

    /// Abandon the current playthrough. Unsaved progress is lost.
    pub fn return_to_menu(&mut self) {
        self.engine.reset();
        self.screen = Screen::Menu;
        self.view.clear_choices();
    }

    /// Redraw the play screen from the engine's current scene.
    pub fn render(&mut self) {
        self.view.clear_choices();
        let scene = self.engine.scene();
        self.view.show_scene(scene);
        self.view
            .show_character(&CharacterSheet::from_state(self.engine.state(), self.engine.data()));

        if let Some(ending) = &scene.ending {
            self.screen = Screen::Ended;
            self.view.show_ending(ending);
        }
    }

    fn render_creation(&mut self) {
        let cap = self.engine.config().creation.attribute_cap;
        self.view.show_creation(&self.engine.state().player, cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures;
    use crate::engine::{Scene, LOADED_TEXT};
    use crate::persistence::MemoryStore;
    use game_rules::{Ending, Player};

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Cleared,
        Scene(String, usize),
        Sheet(u32, usize),
        Creation(i32),
        Ending(String),
        Message(String),
    }

    #[derive(Default)]
    struct RecordingView {
        shown: Vec<Shown>,
    }

    impl RecordingView {
        fn messages(&self) -> Vec<&str> {
            self.shown
                .iter()
                .filter_map(|shown| match shown {
                    Shown::Message(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn last_scene(&self) -> Option<&Shown> {
            self.shown
                .iter()
                .rev()
                .find(|shown| matches!(shown, Shown::Scene(..)))
        }
    }

    impl GameView for RecordingView {
        fn clear_choices(&mut self) {
            self.shown.push(Shown::Cleared);
        }

        fn show_scene(&mut self, scene: &Scene) {
            self.shown
                .push(Shown::Scene(scene.full_text(), scene.options.len()));
        }

        fn show_character(&mut self, sheet: &CharacterSheet) {
            self.shown
                .push(Shown::Sheet(sheet.level, sheet.inventory.len()));
        }

        fn show_creation(&mut self, player: &Player, _attribute_cap: i32) {
            self.shown.push(Shown::Creation(player.points_left));
        }

        fn show_ending(&mut self, ending: &Ending) {
            self.shown.push(Shown::Ending(ending.title.clone()));
        }

        fn show_message(&mut self, message: &str) {
            self.shown.push(Shown::Message(message.to_string()));
        }
    }

    fn session() -> Session<RecordingView, MemoryStore> {
        let (engine, _) = fixtures::engine(11);
        Session::new(engine, RecordingView::default(), MemoryStore::new())
    }

    fn playing() -> Session<RecordingView, MemoryStore> {
        let mut session = session();
        session.new_game();
        session
            .allocate(Attribute::Strength, AllocationStep::Plus10)
            .unwrap();
        for _ in 0..4 {
            session
                .allocate(Attribute::Vitality, AllocationStep::Plus10)
                .unwrap();
        }
        assert!(session.confirm_attributes());
        session
    }

    #[test]
    fn test_creation_flow() {
        let mut session = session();
        assert_eq!(session.screen(), Screen::Menu);

        session.new_game();
        assert_eq!(session.screen(), Screen::Creation);
        assert_eq!(session.view().shown, vec![Shown::Creation(50)]);

        let err = session
            .allocate(Attribute::Luck, AllocationStep::Minus1)
            .unwrap_err();
        assert!(matches!(err, AllocationError::BelowZero { .. }));
        assert_eq!(session.view().messages().len(), 1);

        session
            .allocate(Attribute::Luck, AllocationStep::Plus10)
            .unwrap();
        assert!(!session.confirm_attributes());
        assert_eq!(session.view().messages().last(), Some(&UNSPENT_POINTS_TEXT));
        assert_eq!(session.screen(), Screen::Creation);
    }

    #[test]
    fn test_confirm_renders_opening() {
        let session = playing();
        assert_eq!(session.screen(), Screen::Playing);

        let shown = &session.view().shown;
        let start = shown.len() - 3;
        assert_eq!(shown[start], Shown::Cleared);
        assert_eq!(
            shown[start + 1],
            Shown::Scene("你在破庙中醒来，手中握着一枚旧印章。".into(), 2)
        );
        assert_eq!(shown[start + 2], Shown::Sheet(1, 0));
        assert_eq!(session.engine().state().player.attributes.get(Attribute::Vitality), 40);
    }

    #[test]
    fn test_choose_rerenders() {
        let mut session = playing();
        assert!(!session.choose(9));

        let index = fixtures::option_index(session.engine(), "翻找香案");
        assert!(session.choose(index));
        assert_eq!(session.view().shown.last(), Some(&Shown::Sheet(1, 1)));
        assert_eq!(
            session.view().last_scene(),
            Some(&Shown::Scene("【任务更新】你找到了一枚旧印章。\n\n村子里炊烟袅袅。".into(), 6))
        );
    }

    #[test]
    fn test_save_and_load() {
        let mut session = playing();
        assert!(!session.has_save());

        let index = fixtures::option_index(session.engine(), "翻找香案");
        session.choose(index);
        assert!(session.save());
        assert_eq!(session.view().messages().last(), Some(&SAVED_TEXT));
        assert!(session.has_save());
        let saved = session.engine().state().clone();

        session.return_to_menu();
        assert_eq!(session.screen(), Screen::Menu);
        assert!(session.engine().state().inventory.is_empty());

        assert!(session.load());
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.engine().state(), &saved);
        assert_eq!(
            session.view().last_scene(),
            Some(&Shown::Scene(LOADED_TEXT.into(), 1))
        );
        assert!(session.choose(0));
    }

    #[test]
    fn test_load_without_save() {
        let mut session = session();
        assert!(!session.load());
        assert_eq!(session.view().messages(), vec![NO_SAVE_TEXT]);
        assert_eq!(session.screen(), Screen::Menu);
    }

    #[test]
    fn test_save_outside_play_is_ignored() {
        let mut session = session();
        assert!(!session.save());
        assert!(!session.has_save());
    }

    #[test]
    fn test_ending_switches_screen() {
        let mut session = playing();
        let index = fixtures::option_index(session.engine(), "离开破庙");
        session.choose(index);
        let index = fixtures::option_index(session.engine(), "登上王座");
        session.choose(index);

        assert_eq!(session.screen(), Screen::Ended);
        assert_eq!(session.view().shown.last(), Some(&Shown::Ending("王冠".into())));
        assert!(!session.choose(0));
    }
}
