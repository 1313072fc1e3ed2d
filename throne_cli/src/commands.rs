//! Parsing of typed input into session actions.

use game_rules::{AllocationStep, Attribute};
use narrative_core::Screen;

/// One line of player input, interpreted for the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Load,
    Quit,
    Allocate(Attribute, AllocationStep),
    Confirm,
    /// Zero-based option index.
    Choose(usize),
    Save,
    Sheet,
    Inventory,
    Menu,
    Help,
}

/// Interpret `line` for `screen`. `None` means the input was not understood.
pub fn parse(screen: Screen, line: &str) -> Option<Command> {
    let line = line.trim();
    match (screen, line) {
        (_, "?" | "h" | "help") => Some(Command::Help),

        (Screen::Menu, "1" | "n") => Some(Command::NewGame),
        (Screen::Menu, "2" | "l") => Some(Command::Load),
        (Screen::Menu, "q") => Some(Command::Quit),

        (Screen::Creation, "ok") => Some(Command::Confirm),
        (Screen::Creation, "q") => Some(Command::Menu),
        (Screen::Creation, _) => parse_allocation(line),

        (Screen::Playing, "s") => Some(Command::Save),
        (Screen::Playing, "c") => Some(Command::Sheet),
        (Screen::Playing, "i") => Some(Command::Inventory),
        (Screen::Playing, "q") => Some(Command::Menu),
        (Screen::Playing, _) => match line.parse::<usize>() {
            Ok(number) if number > 0 => Some(Command::Choose(number - 1)),
            _ => None,
        },

        (Screen::Ended, _) => Some(Command::Menu),

        _ => None,
    }
}

fn parse_allocation(line: &str) -> Option<Command> {
    let (step, name) = if let Some(name) = line.strip_prefix("++") {
        (AllocationStep::Plus10, name)
    } else if let Some(name) = line.strip_prefix("--") {
        (AllocationStep::Minus10, name)
    } else if let Some(name) = line.strip_prefix('+') {
        (AllocationStep::Plus1, name)
    } else if let Some(name) = line.strip_prefix('-') {
        (AllocationStep::Minus1, name)
    } else {
        return None;
    };

    let attribute = name.trim().parse::<Attribute>().ok()?;
    Some(Command::Allocate(attribute, step))
}
