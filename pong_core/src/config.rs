//! Match configuration, rule presets and validation.
//!
//! Every speed in this module is in pixels per tick; the simulation runs at
//! `tick_hz` ticks per second and never rescales constants by frame time.

use crate::types::PlayField;
use thiserror::Error;

/// How the ball reacts when it meets a paddle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Deflection {
    /// Vertical speed blends toward an angle derived from where the ball
    /// struck the paddle; horizontal speed ramps up on every hit.
    Angled,
    /// Horizontal velocity is inverted, nothing else changes.
    Reflect,
}

/// Game configuration
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Play area
    pub field: PlayField,
    /// Paddle width
    pub paddle_width: f32,
    /// Paddle height
    pub paddle_height: f32,
    /// Gap between a paddle and its side edge
    pub paddle_margin: f32,
    /// Paddle movement speed
    pub paddle_speed: f32,
    /// Ball edge length (the ball is a square hitbox)
    pub ball_size: f32,
    /// Serve speed, and the floor for horizontal speed
    pub ball_speed: f32,
    /// Ceiling for horizontal speed
    pub max_speed: f32,
    /// Ceiling for vertical speed
    pub max_vy: f32,
    /// Horizontal speed gained per angled paddle hit
    pub speed_up: f32,
    /// Scales the hit offset into a target vertical speed
    pub angle_multiplier: f32,
    /// Vertical speed on serve
    pub serve_vy: f32,
    /// Randomise the vertical direction of each serve
    pub random_serve: bool,
    /// Paddle collision rule
    pub deflection: Deflection,
    /// Ticks during which paddle collisions are ignored after a hit
    pub paddle_hit_cooldown_ticks: u32,
    /// Ticks the ball waits at the centre after each point
    pub serve_cooldown_ticks: u32,
    /// Right paddle follows the ball instead of reading input
    pub ai_opponent: bool,
    /// Points needed to take a set (with a two point lead)
    pub score_limit: u32,
    /// Sets needed to take the match
    pub sets_to_win: u32,
    /// Random seed
    pub seed: u64,
    /// Tick frequency (Hz)
    pub tick_hz: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config::pro()
    }
}

impl Config {
    /// Single set against the tracking computer, plain reflection.
    pub fn classic() -> Self {
        Config {
            field: PlayField::new(800.0, 600.0, 0.0),
            paddle_width: 10.0,
            paddle_height: 140.0,
            paddle_margin: 20.0,
            paddle_speed: 7.0,
            ball_size: 14.0,
            ball_speed: 7.0,
            max_speed: 7.0,
            max_vy: 7.0,
            speed_up: 0.0,
            angle_multiplier: 0.0,
            serve_vy: 7.0,
            random_serve: true,
            deflection: Deflection::Reflect,
            paddle_hit_cooldown_ticks: 0,
            serve_cooldown_ticks: 0,
            ai_opponent: true,
            score_limit: 11,
            sets_to_win: 1,
            seed: 0xC0FFEE,
            tick_hz: 60,
        }
    }

    /// Best of five sets, angled deflection with an anti-vibration cooldown.
    pub fn pro() -> Self {
        Config {
            field: PlayField::new(800.0, 560.0, 60.0),
            paddle_width: 12.0,
            paddle_height: 90.0,
            paddle_margin: 30.0,
            paddle_speed: 10.0,
            ball_size: 12.0,
            ball_speed: 5.0,
            max_speed: 12.0,
            max_vy: 7.0,
            speed_up: 0.3,
            angle_multiplier: 0.12,
            serve_vy: 3.0,
            random_serve: false,
            deflection: Deflection::Angled,
            paddle_hit_cooldown_ticks: 4,
            serve_cooldown_ticks: 60,
            ai_opponent: false,
            score_limit: 11,
            sets_to_win: 3,
            seed: 0xC0FFEE,
            tick_hz: 60,
        }
    }

    /// Best of three sets on a large table with fast, flat rallies.
    pub fn hyper() -> Self {
        Config {
            field: PlayField::new(960.0, 720.0, 0.0),
            paddle_width: 15.0,
            paddle_height: 160.0,
            paddle_margin: 30.0,
            paddle_speed: 8.0,
            ball_size: 20.0,
            ball_speed: 8.0,
            max_speed: 8.0,
            max_vy: 8.0,
            speed_up: 0.0,
            angle_multiplier: 0.0,
            serve_vy: 8.0,
            random_serve: true,
            deflection: Deflection::Reflect,
            paddle_hit_cooldown_ticks: 0,
            serve_cooldown_ticks: 30,
            ai_opponent: false,
            score_limit: 11,
            sets_to_win: 2,
            seed: 0xC0FFEE,
            tick_hz: 60,
        }
    }

    /// Reject configurations that could never finish a match or that put
    /// objects outside the play area.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        let measures = [
            ("field.width", field.width),
            ("field.height", field.height),
            ("field.top", field.top),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_margin", self.paddle_margin),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("ball_speed", self.ball_speed),
            ("max_speed", self.max_speed),
            ("max_vy", self.max_vy),
            ("speed_up", self.speed_up),
            ("angle_multiplier", self.angle_multiplier),
            ("serve_vy", self.serve_vy),
        ];
        if let Some((name, _)) = measures.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite(name));
        }

        if !(field.width > 0.0 && field.height > field.top && field.top >= 0.0) {
            return Err(ConfigError::EmptyField {
                width: field.width,
                height: field.height,
                top: field.top,
            });
        }
        if self.score_limit <= 1 {
            return Err(ConfigError::ScoreLimitTooLow(self.score_limit));
        }
        if self.sets_to_win == 0 {
            return Err(ConfigError::NoSetsToWin);
        }
        if self.tick_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.paddle_width <= 0.0 || self.paddle_height <= 0.0 || self.ball_size <= 0.0 {
            return Err(ConfigError::NonPositiveSize);
        }
        if self.paddle_height > field.play_height() || self.ball_size >= field.play_height() {
            return Err(ConfigError::DoesNotFit);
        }
        if 2.0 * (self.paddle_margin + self.paddle_width) >= field.width || self.paddle_margin < 0.0
        {
            return Err(ConfigError::DoesNotFit);
        }
        if self.paddle_speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed("paddle_speed"));
        }
        if self.ball_speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed("ball_speed"));
        }
        if self.max_speed < self.ball_speed {
            return Err(ConfigError::SpeedRange {
                min: self.ball_speed,
                max: self.max_speed,
            });
        }
        if self.max_vy < 0.0 || self.serve_vy.abs() > self.max_vy {
            return Err(ConfigError::ServeTooSteep {
                serve_vy: self.serve_vy,
                max_vy: self.max_vy,
            });
        }
        Ok(())
    }
}

/// Configuration rejected at match setup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    #[error("play field {width}x{height} with top bar {top} has no area")]
    EmptyField { width: f32, height: f32, top: f32 },
    #[error("score limit must be at least 2, got {0}")]
    ScoreLimitTooLow(u32),
    #[error("sets to win must be at least 1")]
    NoSetsToWin,
    #[error("tick rate must be non-zero")]
    ZeroTickRate,
    #[error("paddle and ball sizes must be positive")]
    NonPositiveSize,
    #[error("paddles and ball do not fit inside the play field")]
    DoesNotFit,
    #[error("{0} must be positive")]
    NonPositiveSpeed(&'static str),
    #[error("ball speed range is empty: min {min} > max {max}")]
    SpeedRange { min: f32, max: f32 },
    #[error("serve vertical speed {serve_vy} exceeds the vertical cap {max_vy}")]
    ServeTooSteep { serve_vy: f32, max_vy: f32 },
}

/// Named rule sets offered by the front-ends
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Preset {
    Classic,
    Pro,
    Hyper,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Classic, Preset::Pro, Preset::Hyper];

    pub fn config(self) -> Config {
        match self {
            Preset::Classic => Config::classic(),
            Preset::Pro => Config::pro(),
            Preset::Hyper => Config::hyper(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Pro => "pro",
            Preset::Hyper => "hyper",
        }
    }

    /// One-line rules summary for menus
    pub fn description(self) -> String {
        let config = self.config();
        let sets = config.sets_to_win * 2 - 1;
        let bounce = match config.deflection {
            Deflection::Angled => "angled bounces",
            Deflection::Reflect => "flat bounces",
        };
        if sets == 1 {
            format!("Single set | {} pts (win by 2) | {}", config.score_limit, bounce)
        } else {
            format!(
                "Best of {} | {} pts (win by 2) | {}",
                sets, config.score_limit, bounce
            )
        }
    }

    /// Look a preset up by its `name()`, ignoring case.
    pub fn from_name(name: &str) -> Option<Preset> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    /// Next preset in menu order, wrapping around.
    pub fn next(self) -> Preset {
        match self {
            Preset::Classic => Preset::Pro,
            Preset::Pro => Preset::Hyper,
            Preset::Hyper => Preset::Classic,
        }
    }

    /// Previous preset in menu order, wrapping around.
    pub fn prev(self) -> Preset {
        match self {
            Preset::Classic => Preset::Hyper,
            Preset::Pro => Preset::Classic,
            Preset::Hyper => Preset::Pro,
        }
    }
}
