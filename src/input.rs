//! Keyboard input mapping
//!
//! Raw key transitions become game commands. The host window delivers
//! `KeyEvent`s; the simulation only ever sees `Command`s.

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Space,
    Escape,
    P,
    M,
    Enter,
    Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Down,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Up,
        }
    }
}

/// A discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    JumpLeft,
    JumpRight,
    AttackStart,
    AttackStop,
    TogglePause,
    ToggleMute,
    /// Start a run from the menu, or retry after a game over
    Start,
    /// Leave the current screen (back to menu, or exit from the menu)
    Quit,
}

/// Map a key transition to a command, if it has one
pub fn map_key(event: KeyEvent) -> Option<Command> {
    use Key::*;
    use KeyAction::*;
    match (event.key, event.action) {
        (Left | A, Down) => Some(Command::JumpLeft),
        (Right | D, Down) => Some(Command::JumpRight),
        (Space, Down) => Some(Command::AttackStart),
        (Space, Up) => Some(Command::AttackStop),
        (Escape | P, Down) => Some(Command::TogglePause),
        (M, Down) => Some(Command::ToggleMute),
        (Enter, Down) => Some(Command::Start),
        (Q, Down) => Some(Command::Quit),
        _ => None,
    }
}
