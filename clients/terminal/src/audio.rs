//! Terminal bell audio collaborator.

use pong_core::{AudioSink, SoundCue};
use std::io::{self, Write};

/// Rings the terminal bell when a point is scored.
///
/// Cues are queued during the tick and written after the frame is drawn so
/// the bell byte never lands in the middle of a ratatui update.
#[derive(Debug)]
pub struct TerminalBell {
    enabled: bool,
    pending: u32,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self {
            enabled: true,
            pending: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        self.pending = 0;
    }

    /// Write queued bells to `out`
    pub fn flush_to(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.pending == 0 {
            return Ok(());
        }
        // One bell per frame; terminals merge rapid bells anyway
        self.pending = 0;
        out.write_all(b"\x07")?;
        out.flush()
    }
}

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: SoundCue) {
        if self.enabled && cue == SoundCue::PointScored {
            self.pending += 1;
        }
    }
}
