//! Main game logic and state management.

use crate::config::{Config, ConfigError};
use crate::geometry::Vec2;
use crate::physics::Physics;
use crate::scoring::{PointOutcome, Scoreboard};
use crate::types::*;
use tracing::{debug, info, warn};

/// The world: everything one match needs, owned in one place and advanced by
/// [`Game::step`].
#[derive(Debug, Clone)]
pub struct Game {
    pub config: Config,
    pub tick: Tick,
    pub status: Status,
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub scoreboard: Scoreboard,
    pub rng: u64,
}

impl Game {
    /// Create a new game, rejecting configurations that cannot finish a match
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut game = Game {
            config,
            tick: 0,
            status: Status::Serving,
            paddles: [
                Paddle::new(Side::Left, &config),
                Paddle::new(Side::Right, &config),
            ],
            ball: Ball::new(config.field.center(), Vec2::zero(), config.ball_size),
            scoreboard: Scoreboard::new(config.score_limit, config.sets_to_win),
            rng: config.seed,
        };

        game.reset_for_serve(Side::Right);
        Ok(game)
    }

    /// Step the game simulation forward by one tick.
    ///
    /// Does nothing once the match is won or aborted.
    pub fn step(&mut self, controls: &Controls) -> Vec<Event> {
        let mut events = Vec::new();
        if self.status.is_terminal() {
            return events;
        }

        let speed = self.config.paddle_speed;
        let right_input = if self.config.ai_opponent {
            Physics::tracking_input(&self.paddles[1], &self.ball, speed)
        } else {
            controls.right
        };

        Physics::update_paddle(&mut self.paddles[0], controls.left, speed, &self.config.field);
        Physics::update_paddle(&mut self.paddles[1], right_input, speed, &self.config.field);

        let ball_step = Physics::advance_ball(&mut self.ball, &self.paddles, &self.config);

        if ball_step.wall_bounce {
            events.push(Event::WallBounce);
        }
        if let Some(side) = ball_step.paddle_hit {
            events.push(Event::PaddleHit(side));
        }

        self.status = match ball_step.scored {
            Some(scorer) => self.handle_score(scorer, &mut events),
            None if self.ball.serve_cooldown > 0 => Status::Serving,
            None => Status::Rallying,
        };

        self.tick += 1;
        events
    }

    /// Quit the match. Any score so far is discarded; a match that was
    /// already won keeps its result.
    pub fn abort(&mut self) -> MatchResult {
        if let Status::MatchWon(_) = self.status {
            if let Some(result) = self.result() {
                return result;
            }
        }

        if self.status != Status::Aborted {
            warn!(
                tick = self.tick,
                points = ?self.scoreboard.points,
                sets = ?self.scoreboard.sets,
                "match aborted"
            );
        }
        self.status = Status::Aborted;
        MatchResult::Aborted
    }

    /// Final result, once the match is over
    pub fn result(&self) -> Option<MatchResult> {
        match self.status {
            Status::MatchWon(winner) => Some(MatchResult::Won {
                winner,
                sets: self.scoreboard.sets,
            }),
            Status::Aborted => Some(MatchResult::Aborted),
            _ => None,
        }
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        View {
            tick: self.tick,
            status: self.status,
            field: self.config.field,
            left_paddle: self.paddles[0].rect(),
            right_paddle: self.paddles[1].rect(),
            ball: self.ball.rect(),
            points: self.scoreboard.points,
            sets: self.scoreboard.sets,
            score_limit: self.scoreboard.score_limit,
            sets_to_win: self.scoreboard.sets_to_win,
            serve_countdown: self.ball.serve_cooldown,
            ai_opponent: self.config.ai_opponent,
        }
    }

    /// Reset the game for a new match (rematch)
    pub fn reset_match(&mut self) {
        self.tick = 0;
        self.status = Status::Serving;
        self.scoreboard = Scoreboard::new(self.config.score_limit, self.config.sets_to_win);
        self.paddles = [
            Paddle::new(Side::Left, &self.config),
            Paddle::new(Side::Right, &self.config),
        ];
        self.rng = self.config.seed;
        self.reset_for_serve(Side::Right);
    }

    /// Get the match winner (if the match is over)
    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Status::MatchWon(winner) => Some(winner),
            _ => None,
        }
    }

    /// Check if the match has ended, either way
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Handle a scoring event and decide what the new status is
    fn handle_score(&mut self, scorer: Side, events: &mut Vec<Event>) -> Status {
        let mut points = self.scoreboard.points;
        points[scorer.index()] += 1;
        events.push(Event::PointScored { scorer, points });

        match self.scoreboard.award_point(scorer) {
            PointOutcome::Point => {
                debug!(tick = self.tick, scorer = ?scorer, points = ?points, "point scored");
                self.reset_for_serve(scorer.opposite());
                Status::PointScored(scorer)
            }
            PointOutcome::SetWon(winner) => {
                let sets = self.scoreboard.sets;
                info!(tick = self.tick, winner = ?winner, sets = ?sets, "set won");
                events.push(Event::SetWon { winner, sets });
                self.reset_for_serve(scorer.opposite());
                Status::SetWon(winner)
            }
            PointOutcome::MatchWon(winner) => {
                let result = MatchResult::Won {
                    winner,
                    sets: self.scoreboard.sets,
                };
                info!(tick = self.tick, %result, "match won");
                events.push(Event::MatchWon(result));
                self.ball.vel = Vec2::zero();
                Status::MatchWon(winner)
            }
        }
    }

    /// Put the ball back in the centre, heading for `receiver`
    fn reset_for_serve(&mut self, receiver: Side) {
        Physics::serve_ball(&mut self.ball, receiver, &self.config, &mut self.rng);
    }
}
