//! Core types for the Pong rules engine.

use crate::config::Config;
use crate::geometry::{Rect, Vec2};
use std::fmt;

/// Tick counter type
pub type Tick = u32;

/// Player/paddle side
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Index into per-side arrays (`[left, right]`)
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Player label shown to users
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "Player 1",
            Side::Right => "Player 2",
        }
    }
}

/// Play area: `x` in `[0, width]`, `y` in `[top, height]`.
///
/// `top` reserves a score bar above the table.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
    pub top: f32,
}

impl PlayField {
    pub fn new(width: f32, height: f32, top: f32) -> Self {
        PlayField { width, height, top }
    }

    pub fn left(&self) -> f32 {
        0.0
    }

    pub fn right(&self) -> f32 {
        self.width
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn bottom(&self) -> f32 {
        self.height
    }

    pub fn play_height(&self) -> f32 {
        self.height - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.top + self.play_height() / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, self.top, self.width, self.play_height())
    }
}

/// Paddle state
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Paddle {
    pub side: Side,
    /// Left edge, fixed for the match
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity applied on the last tick
    pub vy: f32,
}

impl Paddle {
    /// Paddle on `side`, vertically centred in the play field
    pub fn new(side: Side, config: &Config) -> Self {
        let field = &config.field;
        let x = match side {
            Side::Left => config.paddle_margin,
            Side::Right => field.width - config.paddle_margin - config.paddle_width,
        };
        Paddle {
            side,
            x,
            y: field.top + (field.play_height() - config.paddle_height) / 2.0,
            width: config.paddle_width,
            height: config.paddle_height,
            vy: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Ball state
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ball {
    /// Top-left corner
    pub pos: Vec2,
    /// Velocity
    pub vel: Vec2,
    /// Edge length of the square hitbox
    pub size: f32,
    /// Ticks until the ball moves again after a serve
    pub serve_cooldown: u32,
    /// Ticks until paddle collisions are checked again
    pub hit_cooldown: u32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, size: f32) -> Self {
        Ball {
            pos,
            vel,
            size,
            serve_cooldown: 0,
            hit_cooldown: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size / 2.0, self.pos.y + self.size / 2.0)
    }
}

/// Held direction keys for one paddle on one tick
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
}

impl PaddleInput {
    pub fn new(up: bool, down: bool) -> Self {
        PaddleInput { up, down }
    }

    pub fn idle() -> Self {
        PaddleInput::default()
    }

    /// -1 for up, 1 for down, 0 when neither or both are held
    pub fn direction(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Key state for both paddles on a specific tick
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    pub left: PaddleInput,
    pub right: PaddleInput,
}

impl Controls {
    pub fn new(left: PaddleInput, right: PaddleInput) -> Self {
        Controls { left, right }
    }

    pub fn get(&self, side: Side) -> PaddleInput {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Match status after the most recent tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// Ball waits at the centre for the serve cooldown to run out
    Serving,
    /// Ball in play
    Rallying,
    /// A point was scored this tick
    PointScored(Side),
    /// A point was scored and it decided a set
    SetWon(Side),
    /// Match finished (winner)
    MatchWon(Side),
    /// Match quit before completion
    Aborted,
}

impl Status {
    /// No further updates happen once terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::MatchWon(_) | Status::Aborted)
    }
}

/// How a match ended
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchResult {
    Won { winner: Side, sets: [u32; 2] },
    Aborted,
}

impl MatchResult {
    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchResult::Won { winner, .. } => Some(*winner),
            MatchResult::Aborted => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Won { winner, sets } => {
                let won = sets[winner.index()];
                let lost = sets[winner.opposite().index()];
                write!(f, "{} won {}:{}", winner.label(), won, lost)
            }
            MatchResult::Aborted => write!(f, "Match abandoned"),
        }
    }
}

/// Sounds the audio collaborator may play
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SoundCue {
    BallHit,
    WallBounce,
    PointScored,
}

/// Game events that can occur during a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    PaddleHit(Side),
    WallBounce,
    PointScored {
        scorer: Side,
        points: [u32; 2], // Points after this one, before any set reset
    },
    SetWon {
        winner: Side,
        sets: [u32; 2],
    },
    MatchWon(MatchResult),
}

impl Event {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            Event::PaddleHit(_) => Some(SoundCue::BallHit),
            Event::WallBounce => Some(SoundCue::WallBounce),
            Event::PointScored { .. } => Some(SoundCue::PointScored),
            Event::SetWon { .. } | Event::MatchWon(_) => None,
        }
    }
}

/// Draw data handed to the render collaborator once per tick
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View {
    pub tick: Tick,
    pub status: Status,
    pub field: PlayField,
    pub left_paddle: Rect,
    pub right_paddle: Rect,
    pub ball: Rect,
    pub points: [u32; 2], // [left, right]
    pub sets: [u32; 2],   // [left, right]
    pub score_limit: u32,
    pub sets_to_win: u32,
    /// Ticks left before the ball is served
    pub serve_countdown: u32,
    pub ai_opponent: bool,
}

impl View {
    /// Status line for the score bar
    pub fn status_text(&self) -> String {
        match self.status {
            Status::Serving => "Get ready...".to_string(),
            Status::Rallying => "Playing".to_string(),
            Status::PointScored(side) => format!("Point to {}", side.label()),
            Status::SetWon(side) => format!("Set to {}", side.label()),
            Status::MatchWon(side) => format!("{} wins the match!", side.label()),
            Status::Aborted => "Match abandoned".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Left.index(), 0);
        assert_eq!(Side::Right.index(), 1);
    }

    #[test]
    fn test_paddle_input_direction() {
        assert_eq!(PaddleInput::new(true, false).direction(), -1.0);
        assert_eq!(PaddleInput::new(false, true).direction(), 1.0);
        assert_eq!(PaddleInput::new(true, true).direction(), 0.0);
        assert_eq!(PaddleInput::idle().direction(), 0.0);
    }

    #[test]
    fn test_controls_get() {
        let left = PaddleInput::new(true, false);
        let right = PaddleInput::new(false, true);
        let controls = Controls::new(left, right);

        assert_eq!(controls.get(Side::Left), left);
        assert_eq!(controls.get(Side::Right), right);
    }

    #[test]
    fn test_paddle_placement() {
        let config = Config::pro();
        let left = Paddle::new(Side::Left, &config);
        let right = Paddle::new(Side::Right, &config);

        assert_eq!(left.x, 30.0);
        assert_eq!(right.x, 800.0 - 30.0 - 12.0);
        // Centred in the play area below the 60px score bar
        assert_eq!(left.center_y(), config.field.center().y);
        assert_eq!(left.y, right.y);
    }

    #[test]
    fn test_play_field_center() {
        let field = PlayField::new(800.0, 560.0, 60.0);
        assert_eq!(field.play_height(), 500.0);
        assert_eq!(field.center(), Vec2::new(400.0, 310.0));
        assert_eq!(field.rect(), Rect::new(0.0, 60.0, 800.0, 500.0));
    }

    #[test]
    fn test_match_result_display() {
        let result = MatchResult::Won {
            winner: Side::Right,
            sets: [1, 3],
        };
        assert_eq!(result.to_string(), "Player 2 won 3:1");
        assert_eq!(result.winner(), Some(Side::Right));
        assert_eq!(MatchResult::Aborted.to_string(), "Match abandoned");
        assert_eq!(MatchResult::Aborted.winner(), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(Status::MatchWon(Side::Left).is_terminal());
        assert!(Status::Aborted.is_terminal());
        assert!(!Status::SetWon(Side::Left).is_terminal());
        assert!(!Status::Serving.is_terminal());
    }

    #[test]
    fn test_sound_cues() {
        assert_eq!(Event::WallBounce.sound_cue(), Some(SoundCue::WallBounce));
        assert_eq!(
            Event::PaddleHit(Side::Left).sound_cue(),
            Some(SoundCue::BallHit)
        );
        assert_eq!(
            Event::SetWon {
                winner: Side::Left,
                sets: [1, 0]
            }
            .sound_cue(),
            None
        );
    }
}
