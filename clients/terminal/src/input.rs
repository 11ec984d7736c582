//! Keyboard input collaborator.
//!
//! Tracks which game keys are currently held and turns that set into
//! [`Controls`] once per tick. Terminals that report key releases give exact
//! hold tracking; the others only send presses and auto-repeats, so a key
//! counts as held for [`LATCH_WINDOW`] after the last one it sent.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use pong_core::{Controls, FrameInput, Game, InputSource, PaddleInput};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a key stays held after its last press without release events.
/// Long enough to bridge the initial auto-repeat delay of most terminals.
pub const LATCH_WINDOW: Duration = Duration::from_millis(250);

/// Game key mapping for cleaner input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Player1Up,
    Player1Down,
    Player2Up,
    Player2Down,
}

pub fn map_keycode_to_game_key(code: KeyCode) -> Option<GameKey> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(GameKey::Player1Up),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(GameKey::Player1Down),
        KeyCode::Up => Some(GameKey::Player2Up),
        KeyCode::Down => Some(GameKey::Player2Down),
        _ => None,
    }
}

/// Keyboard capability detection result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardMode {
    /// Press and release events are reported
    Enhanced,
    /// Presses and repeats only
    Latched,
}

/// Held-key set for both players
#[derive(Debug)]
pub struct KeyboardInput {
    mode: KeyboardMode,
    /// Key → time of its last press or repeat
    held: HashMap<GameKey, Instant>,
    versus_computer: bool,
    quit: bool,
}

impl KeyboardInput {
    pub fn new(mode: KeyboardMode) -> Self {
        Self {
            mode,
            held: HashMap::new(),
            versus_computer: false,
            quit: false,
        }
    }

    pub fn get_mode_description(&self) -> &'static str {
        match self.mode {
            KeyboardMode::Enhanced => "Enhanced (hold keys)",
            KeyboardMode::Latched => "Latched (key repeat)",
        }
    }

    /// Against the computer both key sets steer the left paddle
    pub fn set_versus_computer(&mut self, versus_computer: bool) {
        self.versus_computer = versus_computer;
    }

    pub fn handle_key_event(&mut self, event: KeyEvent, now: Instant) {
        let Some(key) = map_keycode_to_game_key(event.code) else {
            return;
        };

        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(key, now);
            }
            KeyEventKind::Release => {
                self.held.remove(&key);
            }
        }
    }

    /// Ask for the match to end at the next tick boundary
    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn is_held(&self, key: GameKey, now: Instant) -> bool {
        match (self.held.get(&key), self.mode) {
            (None, _) => false,
            (Some(_), KeyboardMode::Enhanced) => true,
            (Some(&pressed), KeyboardMode::Latched) => {
                now.saturating_duration_since(pressed) < LATCH_WINDOW
            }
        }
    }

    pub fn controls(&self, now: Instant) -> Controls {
        let held = |key| self.is_held(key, now);

        let player1 = PaddleInput::new(held(GameKey::Player1Up), held(GameKey::Player1Down));
        let player2 = PaddleInput::new(held(GameKey::Player2Up), held(GameKey::Player2Down));

        if self.versus_computer {
            let combined = PaddleInput::new(player1.up || player2.up, player1.down || player2.down);
            Controls::new(combined, PaddleInput::idle())
        } else {
            Controls::new(player1, player2)
        }
    }

    pub fn reset(&mut self) {
        self.held.clear();
        self.quit = false;
    }
}

impl InputSource for KeyboardInput {
    fn sample(&mut self, _game: &Game) -> FrameInput {
        FrameInput {
            controls: self.controls(Instant::now()),
            quit: std::mem::take(&mut self.quit),
        }
    }
}
