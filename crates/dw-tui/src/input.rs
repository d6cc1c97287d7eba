//! Input handling - convert key events to commands

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Build a new dungeon from a fresh seed
    NewDungeon,
    /// Rebuild the current dungeon from scratch with the same seed
    Regenerate,
    /// Toggle the plan listing
    TogglePlan,
    Quit,
}

pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    // Releases arrive as separate events on some terminals
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('g') | KeyCode::Char('G') => Some(Command::NewDungeon),
        KeyCode::Char('r') => Some(Command::Regenerate),
        KeyCode::Char('p') => Some(Command::TogglePlan),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
