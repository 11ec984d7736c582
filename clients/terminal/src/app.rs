use crate::audio::TerminalBell;
use crate::event::{AppEvent, Event, Events, MenuKey};
use crate::input::{KeyboardInput, KeyboardMode};
use color_eyre::eyre::WrapErr;
use pong_core::{Game, MatchResult, Orchestrator, Preset};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal,
};
use std::io::stdout;
use std::time::Instant;
use tracing::info;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Start,
    Setup,
    Game,
    GameOver,
}

/// Rows of the setup menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupItem {
    Preset,
    Opponent,
    Start,
    Back,
}

impl SetupItem {
    pub const ALL: [SetupItem; 4] = [
        SetupItem::Preset,
        SetupItem::Opponent,
        SetupItem::Start,
        SetupItem::Back,
    ];
}

pub const START_MENU_ITEMS: [&str; 2] = ["Play", "Quit"];

/// Menu states for navigation
#[derive(Debug, Default)]
pub struct MenuState {
    pub start_selected: usize,
    pub setup_selected: usize,
}

/// Options chosen on the setup screen
#[derive(Debug, Clone, Copy)]
pub struct MatchSetup {
    pub preset: Preset,
    pub versus_computer: bool,
}

impl Default for MatchSetup {
    fn default() -> Self {
        Self {
            preset: Preset::Pro,
            versus_computer: false,
        }
    }
}

/// Game board size constants
pub const MIN_GAME_WIDTH: u16 = 60;
pub const MIN_GAME_HEIGHT: u16 = 20;
const FIXED_GAME_WIDTH: u16 = 80;
const FIXED_GAME_HEIGHT: u16 = 24;

/// Main application
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current screen
    pub screen: AppScreen,
    /// Menu states
    pub menu_state: MenuState,
    /// Preset and opponent for the next match
    pub setup: MatchSetup,
    /// Current (or just finished) match
    pub orchestrator: Option<Orchestrator>,
    /// Result of the most recent match, shown on the start screen
    pub last_result: Option<MatchResult>,
    /// Keyboard input collaborator
    pub input: KeyboardInput,
    /// Terminal bell audio collaborator
    pub audio: TerminalBell,
    /// Last tick pulse
    pub last_tick: Instant,
    /// Event pump
    pub events: Events,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Whether the match is paused due to a small terminal
    pub ui_paused: bool,
}

impl App {
    /// Constructs a new instance of App
    pub fn new() -> color_eyre::Result<Self> {
        let events = Events::start()?;
        let mode = if events.reports_releases() {
            KeyboardMode::Enhanced
        } else {
            KeyboardMode::Latched
        };
        let input = KeyboardInput::new(mode);
        info!(mode = input.get_mode_description(), "input mode detected");

        Ok(Self {
            running: true,
            screen: AppScreen::Start,
            menu_state: MenuState::default(),
            setup: MatchSetup::default(),
            orchestrator: None,
            last_result: None,
            input,
            audio: TerminalBell::new(),
            last_tick: Instant::now(),
            events,
            terminal_size: (80, 24), // Default size
            ui_paused: false,
        })
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let area = terminal.size().wrap_err("failed to read terminal size")?;
        self.handle_resize(area.width, area.height);

        while self.running {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.audio
                .flush_to(&mut stdout())
                .wrap_err("failed to ring terminal bell")?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub fn handle_events(&mut self) -> color_eyre::Result<()> {
        match self.events.next()? {
            Event::Pulse => self.tick(),
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::Resize(width, height) => self.handle_resize(width, height),
            Event::App(app_event) => self.handle_app_event(app_event)?,
        }
        Ok(())
    }

    /// Handle key events and convert to app events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            self.events.push(AppEvent::Quit);
            return;
        }

        if self.screen == AppScreen::Game {
            self.handle_game_key(key_event);
            return;
        }

        // Menus react to presses only
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        let action = match (self.screen, key_event.code) {
            (_, KeyCode::Char('q')) => AppEvent::Quit,
            (AppScreen::GameOver, KeyCode::Enter | KeyCode::Esc) => AppEvent::OpenStart,
            (AppScreen::GameOver, KeyCode::Char('r') | KeyCode::Char('R')) => AppEvent::StartMatch,
            (AppScreen::GameOver, _) => return,
            (_, KeyCode::Up) => AppEvent::Menu(MenuKey::Up),
            (_, KeyCode::Down) => AppEvent::Menu(MenuKey::Down),
            (_, KeyCode::Left) => AppEvent::Menu(MenuKey::Previous),
            (_, KeyCode::Right) => AppEvent::Menu(MenuKey::Next),
            (_, KeyCode::Enter) => AppEvent::Menu(MenuKey::Select),
            (AppScreen::Setup, KeyCode::Esc) => AppEvent::OpenStart,
            (_, KeyCode::Esc) => AppEvent::Quit,
            _ => return,
        };
        self.events.push(action);
    }

    fn handle_game_key(&mut self, key_event: KeyEvent) {
        let pressed = key_event.kind == KeyEventKind::Press;
        match key_event.code {
            KeyCode::Esc if pressed => self.abort_match(),
            KeyCode::Char('m') | KeyCode::Char('M') if pressed => self.audio.toggle(),
            _ => self.input.handle_key_event(key_event, Instant::now()),
        }
    }

    /// Handle application events
    fn handle_app_event(&mut self, app_event: AppEvent) -> color_eyre::Result<()> {
        match app_event {
            AppEvent::Quit => self.quit(),
            AppEvent::OpenStart => self.navigate_to_start(),
            AppEvent::OpenSetup => self.navigate_to_setup(),
            AppEvent::StartMatch => self.start_match()?,
            AppEvent::Menu(MenuKey::Up) => self.menu_up(),
            AppEvent::Menu(MenuKey::Down) => self.menu_down(),
            AppEvent::Menu(MenuKey::Previous) => self.menu_cycle(false),
            AppEvent::Menu(MenuKey::Next) => self.menu_cycle(true),
            AppEvent::Menu(MenuKey::Select) => self.menu_select(),
        }
        Ok(())
    }

    /// Advance the match by the wall-clock time since the last pulse
    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;

        if self.screen != AppScreen::Game || self.ui_paused {
            return;
        }

        let Some(orchestrator) = self.orchestrator.as_mut() else {
            return;
        };
        if let Some(result) = orchestrator.advance(elapsed, &mut self.input, &mut self.audio) {
            self.finish_match(result);
        }
    }

    fn start_match(&mut self) -> color_eyre::Result<()> {
        let mut config = self.setup.preset.config();
        config.ai_opponent = self.setup.versus_computer;
        let game = Game::new(config).wrap_err("invalid match configuration")?;

        info!(
            preset = self.setup.preset.name(),
            versus_computer = self.setup.versus_computer,
            "match started"
        );

        self.input.reset();
        self.input.set_versus_computer(self.setup.versus_computer);
        self.orchestrator = Some(Orchestrator::new(game));
        self.last_tick = Instant::now();
        self.screen = AppScreen::Game;
        Ok(())
    }

    /// Leave the match at the next tick, or now if the match is paused
    fn abort_match(&mut self) {
        if !self.ui_paused {
            self.input.request_quit();
            return;
        }
        if let Some(orchestrator) = self.orchestrator.as_mut() {
            let result = orchestrator.game_mut().abort();
            self.finish_match(result);
        }
    }

    fn finish_match(&mut self, result: MatchResult) {
        info!(%result, "match finished");
        self.last_result = Some(result);
        self.input.reset();
        self.screen = screen_after(result);
    }

    /// Line shown under the start menu
    pub fn last_result_line(&self) -> String {
        describe_last_result(self.last_result)
    }

    // Navigation methods
    fn quit(&mut self) {
        self.running = false;
    }

    fn navigate_to_start(&mut self) {
        self.screen = AppScreen::Start;
    }

    fn navigate_to_setup(&mut self) {
        self.screen = AppScreen::Setup;
    }

    // Menu navigation
    fn menu_up(&mut self) {
        match self.screen {
            AppScreen::Start => {
                let len = START_MENU_ITEMS.len();
                self.menu_state.start_selected = (self.menu_state.start_selected + len - 1) % len;
            }
            AppScreen::Setup => {
                let len = SetupItem::ALL.len();
                self.menu_state.setup_selected = (self.menu_state.setup_selected + len - 1) % len;
            }
            _ => {}
        }
    }

    fn menu_down(&mut self) {
        match self.screen {
            AppScreen::Start => {
                self.menu_state.start_selected =
                    (self.menu_state.start_selected + 1) % START_MENU_ITEMS.len();
            }
            AppScreen::Setup => {
                self.menu_state.setup_selected =
                    (self.menu_state.setup_selected + 1) % SetupItem::ALL.len();
            }
            _ => {}
        }
    }

    /// Left/right on a setup option row
    fn menu_cycle(&mut self, forward: bool) {
        if self.screen != AppScreen::Setup {
            return;
        }
        match self.selected_setup_item() {
            SetupItem::Preset => {
                self.setup.preset = if forward {
                    self.setup.preset.next()
                } else {
                    self.setup.preset.prev()
                };
            }
            SetupItem::Opponent => {
                self.setup.versus_computer = !self.setup.versus_computer;
            }
            SetupItem::Start | SetupItem::Back => {}
        }
    }

    fn menu_select(&mut self) {
        match self.screen {
            AppScreen::Start => match self.menu_state.start_selected {
                0 => self.events.push(AppEvent::OpenSetup), // Play
                _ => self.events.push(AppEvent::Quit),      // Quit
            },
            AppScreen::Setup => match self.selected_setup_item() {
                SetupItem::Preset | SetupItem::Opponent => self.menu_cycle(true),
                SetupItem::Start => self.events.push(AppEvent::StartMatch),
                SetupItem::Back => self.events.push(AppEvent::OpenStart),
            },
            _ => {}
        }
    }

    pub fn selected_setup_item(&self) -> SetupItem {
        SetupItem::ALL[self.menu_state.setup_selected % SetupItem::ALL.len()]
    }

    // Terminal size management
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);

        let too_small = width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT;
        if too_small != self.ui_paused {
            info!(width, height, paused = too_small, "terminal resized");
        }
        self.ui_paused = too_small;
    }

    pub fn calculate_centered_game_area(
        &self,
        area: ratatui::layout::Rect,
    ) -> Option<ratatui::layout::Rect> {
        if self.ui_paused {
            return None; // Too small
        }

        let game_width = FIXED_GAME_WIDTH.min(area.width);
        let game_height = FIXED_GAME_HEIGHT.min(area.height);

        let x_offset = area.width.saturating_sub(game_width) / 2;
        let y_offset = area.height.saturating_sub(game_height) / 2;

        Some(ratatui::layout::Rect {
            x: area.x + x_offset,
            y: area.y + y_offset,
            width: game_width,
            height: game_height,
        })
    }
}

/// Abandoned matches go straight back to the start menu
fn screen_after(result: MatchResult) -> AppScreen {
    match result {
        MatchResult::Aborted => AppScreen::Start,
        MatchResult::Won { .. } => AppScreen::GameOver,
    }
}

fn describe_last_result(last: Option<MatchResult>) -> String {
    match last {
        None => "Last Match: No record".to_string(),
        Some(result) => format!("Last Match: {result}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pong_core::Side;

    #[test]
    fn test_abandoned_match_returns_to_start() {
        assert_eq!(screen_after(MatchResult::Aborted), AppScreen::Start);
        assert_eq!(
            describe_last_result(Some(MatchResult::Aborted)),
            "Last Match: Match abandoned"
        );
    }

    #[test]
    fn test_won_match_shows_game_over() {
        let result = MatchResult::Won {
            winner: Side::Right,
            sets: [1, 3],
        };
        assert_eq!(screen_after(result), AppScreen::GameOver);
        assert_eq!(
            describe_last_result(Some(result)),
            "Last Match: Player 2 won 3:1"
        );
    }

    #[test]
    fn test_no_record_before_first_match() {
        assert_eq!(describe_last_result(None), "Last Match: No record");
    }
}
