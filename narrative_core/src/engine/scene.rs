//! What the engine hands back to the view after each call.

use game_rules::{Ending, EventDef, EventOption};

/// Text shown on the continue affordance.
pub const CONTINUE_TEXT: &str = "继续前进";

/// The result of resolving one user action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Messages produced while resolving, in order (quest updates, combat log, level-ups).
    pub narration: Vec<String>,

    /// Text of the event currently on screen.
    pub text: String,

    /// Choices currently offered.
    pub options: Vec<EventOption>,

    /// Set once the session has ended.
    pub ending: Option<Ending>,
}

impl Scene {
    pub fn narrate(&mut self, line: impl Into<String>) {
        self.narration.push(line.into());
    }

    /// Put an event on screen, replacing any previous one.
    pub fn present(&mut self, event: &EventDef) {
        self.text = event.text.clone();
        self.options = event.options.clone();
    }

    /// Replace the choices with a single continue affordance.
    pub fn offer_continue(&mut self) {
        self.options = vec![EventOption::continue_with(CONTINUE_TEXT)];
    }

    /// Everything to display as one block: narration, then the event text.
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = self.narration.iter().map(String::as_str).collect();
        if !self.text.is_empty() {
            parts.push(&self.text);
        }
        parts.join("\n\n")
    }

    pub fn is_finished(&self) -> bool {
        self.ending.is_some()
    }
}
