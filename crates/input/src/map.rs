//! Key mapping from terminal events to session commands.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// A gameplay action, subject to the manual input policy.
    Game(GameAction),
    /// Flip autoplay on or off.
    ToggleAutoplay,
    Quit,
}

/// Map a gameplay key to its action.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(GameAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(GameAction::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(GameAction::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(GameAction::RotateCw),
        KeyCode::Char('z') => Some(GameAction::RotateCcw),

        KeyCode::Char(' ') => Some(GameAction::HardDrop),
        KeyCode::Char('r') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key toggles autoplay.
pub fn is_autoplay_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('t') | KeyCode::Char('T'))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Full mapping for one event. Releases are ignored; auto-repeat counts as a press.
pub fn map_key(key: KeyEvent) -> Option<KeyCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(KeyCommand::Quit);
    }
    if is_autoplay_toggle(key) {
        return Some(KeyCommand::ToggleAutoplay);
    }
    handle_key_event(key).map(KeyCommand::Game)
}
