//! Frame orchestration.
//!
//! Each tick runs input → paddles → ball → scoring → audio, then hands the
//! resulting [`View`] to whatever presents it. The simulation always moves in
//! whole ticks; [`FixedTimestep`] converts wall-clock time into a tick count
//! so a front-end can redraw at any rate without rescaling speeds.

use crate::game::Game;
use crate::types::{Controls, Event, MatchResult, SoundCue, View};
use std::time::{Duration, Instant};

/// Most ticks [`Orchestrator::advance`] will run to catch up after a stall
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Everything the input collaborator reports for one tick
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub controls: Controls,
    /// Quit/escape requested; checked once at the tick boundary
    pub quit: bool,
}

/// Supplies the held keys for the coming tick
pub trait InputSource {
    fn sample(&mut self, game: &Game) -> FrameInput;
}

/// Draws one frame from draw data
pub trait Renderer {
    type Error;

    fn present(&mut self, view: &View) -> Result<(), Self::Error>;
}

/// Plays sound cues; the unit type is the silent sink
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

impl AudioSink for () {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_ticks: u32,
}

impl FixedTimestep {
    pub fn new(tick_hz: u16) -> Self {
        FixedTimestep {
            step: Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1))),
            accumulator: Duration::ZERO,
            max_ticks: MAX_CATCH_UP_TICKS,
        }
    }

    /// Length of one tick
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add `elapsed` wall-clock time and return how many ticks are now due.
    ///
    /// A backlog beyond the catch-up limit is dropped rather than replayed.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut due = 0;
        while self.accumulator >= self.step && due < self.max_ticks {
            self.accumulator -= self.step;
            due += 1;
        }

        if due == self.max_ticks && self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        due
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

/// How [`Orchestrator::run`] spaces ticks out
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pacing {
    /// One tick per `1 / tick_hz` seconds
    RealTime,
    /// As fast as possible (headless runs)
    Unthrottled,
}

/// What one tick produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickReport {
    pub events: Vec<Event>,
    /// Set once the match is over
    pub result: Option<MatchResult>,
}

/// Single driver of a match: owns the [`Game`] and sequences each tick.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    game: Game,
    timestep: FixedTimestep,
}

impl Orchestrator {
    pub fn new(game: Game) -> Self {
        let timestep = FixedTimestep::new(game.config.tick_hz);
        Orchestrator { game, timestep }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    /// Run exactly one tick
    pub fn tick<I, A>(&mut self, input: &mut I, audio: &mut A) -> TickReport
    where
        I: InputSource + ?Sized,
        A: AudioSink + ?Sized,
    {
        if self.game.is_over() {
            return TickReport {
                events: Vec::new(),
                result: self.game.result(),
            };
        }

        let frame = input.sample(&self.game);
        if frame.quit {
            let result = self.game.abort();
            return TickReport {
                events: Vec::new(),
                result: Some(result),
            };
        }

        let events = self.game.step(&frame.controls);
        for cue in events.iter().filter_map(Event::sound_cue) {
            audio.play(cue);
        }

        TickReport {
            events,
            result: self.game.result(),
        }
    }

    /// Run however many ticks `elapsed` wall-clock time pays for.
    ///
    /// Returns the match result once the match is over.
    pub fn advance<I, A>(
        &mut self,
        elapsed: Duration,
        input: &mut I,
        audio: &mut A,
    ) -> Option<MatchResult>
    where
        I: InputSource + ?Sized,
        A: AudioSink + ?Sized,
    {
        let due = self.timestep.accumulate(elapsed);
        for _ in 0..due {
            if let Some(result) = self.tick(input, audio).result {
                return Some(result);
            }
        }
        self.game.result()
    }

    /// Drive the match to the end, presenting every tick
    pub fn run<I, R, A>(
        &mut self,
        input: &mut I,
        renderer: &mut R,
        audio: &mut A,
        pacing: Pacing,
    ) -> Result<MatchResult, R::Error>
    where
        I: InputSource + ?Sized,
        R: Renderer + ?Sized,
        A: AudioSink + ?Sized,
    {
        let step = self.timestep.step();
        let mut deadline = Instant::now() + step;

        loop {
            let report = self.tick(input, audio);
            renderer.present(&self.game.view())?;

            if let Some(result) = report.result {
                return Ok(result);
            }

            if pacing == Pacing::RealTime {
                let now = Instant::now();
                if deadline > now {
                    std::thread::sleep(deadline - now);
                    deadline += step;
                } else {
                    // Running behind: restart the cadence from now
                    deadline = now + step;
                }
            }
        }
    }
}
