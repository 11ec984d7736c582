//! Event pump for the terminal client.
//!
//! A background thread forwards key presses and resizes from the terminal and
//! adds a redraw pulse every [`PULSE_INTERVAL`]. Menu actions are queued on
//! the same channel so they run in the order they were triggered.

use color_eyre::eyre::WrapErr;
use ratatui::crossterm::{
    event::{
        self as term, Event as TermEvent, KeyEvent, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use std::{
    io::stdout,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, error};

/// Redraw and simulation pulse, about 60 per second
pub const PULSE_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Pulse,
    Key(KeyEvent),
    Resize(u16, u16),
    App(AppEvent),
}

/// Actions queued by the app itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    OpenStart,
    OpenSetup,
    StartMatch,
    Menu(MenuKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    Previous,
    Next,
    Select,
}

/// Terminal events the app cares about; mouse, focus and paste are dropped
fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) => Some(Event::Key(key)),
        TermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}

/// Press/release reporting, switched off again on drop
struct ReleaseReporting;

impl ReleaseReporting {
    fn enable() -> color_eyre::Result<Option<Self>> {
        if !matches!(supports_keyboard_enhancement(), Ok(true)) {
            return Ok(None);
        }
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .wrap_err("failed to enable key release reporting")?;
        Ok(Some(ReleaseReporting))
    }
}

impl Drop for ReleaseReporting {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
}

pub struct Events {
    queue: Sender<Event>,
    inbox: Receiver<Event>,
    release_reporting: Option<ReleaseReporting>,
}

impl Events {
    /// Starts the pump thread. Raw mode must already be on.
    pub fn start() -> color_eyre::Result<Self> {
        let release_reporting = ReleaseReporting::enable()?;
        debug!(releases = release_reporting.is_some(), "event pump started");

        let (queue, inbox) = mpsc::channel();
        let pump_queue = queue.clone();
        thread::spawn(move || {
            if let Err(e) = pump(pump_queue) {
                error!("event pump failed: {e:?}");
            }
        });

        Ok(Self {
            queue,
            inbox,
            release_reporting,
        })
    }

    /// Whether the terminal reports key releases
    pub fn reports_releases(&self) -> bool {
        self.release_reporting.is_some()
    }

    /// Blocks until the next event
    pub fn next(&self) -> color_eyre::Result<Event> {
        self.inbox.recv().wrap_err("event pump stopped")
    }

    pub fn push(&self, action: AppEvent) {
        let _ = self.queue.send(Event::App(action));
    }
}

/// Runs until the receiving side goes away
fn pump(queue: Sender<Event>) -> color_eyre::Result<()> {
    let mut next_pulse = Instant::now() + PULSE_INTERVAL;

    loop {
        let now = Instant::now();
        if now >= next_pulse {
            next_pulse = now + PULSE_INTERVAL;
            if queue.send(Event::Pulse).is_err() {
                return Ok(());
            }
        }

        let wait = next_pulse.saturating_duration_since(Instant::now());
        if !term::poll(wait).wrap_err("failed to poll terminal events")? {
            continue;
        }
        let event = term::read().wrap_err("failed to read terminal event")?;
        if let Some(event) = translate(event) {
            if queue.send(event).is_err() {
                return Ok(());
            }
        }
    }
}
