use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;
use crate::session::Intent;

/// Editing command for the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEdit {
    Insert(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
    Register,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Intent(Intent),
    Edit(FormEdit),
    Quit,
    None,
}

/// Which key map applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Intro,
    /// Keys type into the login form
    Login,
    /// Playing or game over
    Game,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, context: InputContext) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match context {
            InputContext::Intro => KeyAction::Intent(Intent::Confirm),
            InputContext::Login => self.login_key(key),
            InputContext::Game => self.game_key(key),
        }
    }

    fn login_key(&self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Tab => KeyAction::Intent(Intent::ToggleLeaderboard),
            KeyCode::Esc => KeyAction::Intent(Intent::Cancel),

            KeyCode::Enter => KeyAction::Edit(FormEdit::Submit),
            KeyCode::F(2) => KeyAction::Edit(FormEdit::Register),
            KeyCode::F(3) => KeyAction::Edit(FormEdit::Clear),
            KeyCode::Backspace => KeyAction::Edit(FormEdit::Backspace),
            KeyCode::Down => KeyAction::Edit(FormEdit::NextField),
            KeyCode::Up | KeyCode::BackTab => KeyAction::Edit(FormEdit::PrevField),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyAction::Edit(FormEdit::Insert(c))
            }

            _ => KeyAction::None,
        }
    }

    fn game_key(&self, key: KeyEvent) -> KeyAction {
        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Intent(Intent::Move(Direction::Up)),
            KeyCode::Down => KeyAction::Intent(Intent::Move(Direction::Down)),
            KeyCode::Left => KeyAction::Intent(Intent::Move(Direction::Left)),
            KeyCode::Right => KeyAction::Intent(Intent::Move(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Intent(Intent::Move(Direction::Up)),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Intent(Intent::Move(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Intent(Intent::Move(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Intent(Intent::Move(Direction::Right))
            }

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyAction::Intent(Intent::Restart)
            }
            KeyCode::Enter => KeyAction::Intent(Intent::Confirm),
            KeyCode::Tab => KeyAction::Intent(Intent::ToggleLeaderboard),
            KeyCode::Esc => KeyAction::Intent(Intent::Logout),
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
