//! Paddle and ball physics for Pong.
//!
//! One call per tick, explicit Euler, no sub-stepping. A ball faster than a
//! paddle is wide can pass through it between two ticks.

use crate::config::{Config, Deflection};
use crate::geometry::{clamp, Vec2};
use crate::types::*;

/// Share of the previous vertical speed kept on an angled hit
const BLEND_KEEP: f32 = 0.6;
/// Share of the target vertical speed mixed in on an angled hit
const BLEND_TARGET: f32 = 0.4;

/// What happened to the ball during one tick
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct BallStep {
    pub wall_bounce: bool,
    pub paddle_hit: Option<Side>,
    /// Side that won the point, if the ball left the field
    pub scored: Option<Side>,
}

/// Physics calculations for game simulation
pub struct Physics;

impl Physics {
    /// Update paddle position from the keys held this tick
    pub fn update_paddle(paddle: &mut Paddle, input: PaddleInput, speed: f32, field: &PlayField) {
        paddle.vy = input.direction() * speed;
        paddle.y += paddle.vy;

        // Constrain paddle to field bounds
        let min_y = field.top();
        let max_y = field.bottom() - paddle.height;

        paddle.y = clamp(paddle.y, min_y, max_y);

        // Stop velocity if we hit bounds
        if paddle.y <= min_y || paddle.y >= max_y {
            paddle.vy = 0.0;
        }
    }

    /// Keys a reactive opponent would hold to bring the paddle centre to the
    /// ball. Within one paddle step of the ball it holds nothing.
    pub fn tracking_input(paddle: &Paddle, ball: &Ball, speed: f32) -> PaddleInput {
        let diff = ball.center().y - paddle.center_y();
        if diff > speed {
            PaddleInput::new(false, true)
        } else if diff < -speed {
            PaddleInput::new(true, false)
        } else {
            PaddleInput::idle()
        }
    }

    /// Advance the ball by one tick: serve delay, movement, walls, paddles and
    /// scoring, in that order.
    pub fn advance_ball(ball: &mut Ball, paddles: &[Paddle; 2], config: &Config) -> BallStep {
        let mut step = BallStep::default();

        if ball.serve_cooldown > 0 {
            ball.serve_cooldown -= 1;
        } else {
            ball.pos.x += ball.vel.x;
            ball.pos.y += ball.vel.y;
        }

        step.wall_bounce = Self::bounce_walls(ball, &config.field);

        if ball.hit_cooldown > 0 {
            ball.hit_cooldown -= 1;
        }

        if ball.hit_cooldown == 0 {
            step.paddle_hit = paddles
                .iter()
                .find(|paddle| Self::check_paddle_collision(ball, paddle, config))
                .map(|paddle| paddle.side);
        }

        step.scored = Self::check_scoring(ball, &config.field);
        step
    }

    /// Keep the ball between the top and bottom edges. The vertical speed is
    /// pointed away from the wall that was reached, so applying this twice
    /// changes nothing. Returns true if the ball was heading into the wall.
    pub fn bounce_walls(ball: &mut Ball, field: &PlayField) -> bool {
        let top = field.top();
        let bottom = field.bottom() - ball.size;

        if ball.pos.y <= top {
            let into_wall = ball.vel.y < 0.0;
            ball.pos.y = top;
            ball.vel.y = ball.vel.y.abs();
            into_wall
        } else if ball.pos.y >= bottom {
            let into_wall = ball.vel.y > 0.0;
            ball.pos.y = bottom;
            ball.vel.y = -ball.vel.y.abs();
            into_wall
        } else {
            false
        }
    }

    /// Check for paddle-ball collision and handle it.
    ///
    /// Only the paddle the ball is travelling toward can be hit.
    pub fn check_paddle_collision(ball: &mut Ball, paddle: &Paddle, config: &Config) -> bool {
        let approaching = match paddle.side {
            Side::Left => ball.vel.x < 0.0,
            Side::Right => ball.vel.x > 0.0,
        };
        if !approaching || !ball.rect().overlaps(&paddle.rect()) {
            return false;
        }

        match config.deflection {
            Deflection::Angled => {
                let max_vy = config.max_vy;
                let diff = ball.center().y - paddle.center_y();
                let target_vy = clamp(diff * config.angle_multiplier * 2.0, -max_vy, max_vy);
                ball.vel.y = clamp(
                    BLEND_KEEP * ball.vel.y + BLEND_TARGET * target_vy,
                    -max_vy,
                    max_vy,
                );

                let speed = clamp(
                    ball.vel.x.abs() + config.speed_up,
                    config.ball_speed,
                    config.max_speed,
                );

                // Send it back from the paddle face
                match paddle.side {
                    Side::Left => {
                        ball.vel.x = speed;
                        ball.pos.x = paddle.rect().right();
                    }
                    Side::Right => {
                        ball.vel.x = -speed;
                        ball.pos.x = paddle.rect().left() - ball.size;
                    }
                }
            }
            Deflection::Reflect => {
                ball.vel.x = -ball.vel.x;
            }
        }

        ball.hit_cooldown = config.paddle_hit_cooldown_ticks;
        true
    }

    /// Check if ball is out of bounds (scoring condition)
    pub fn check_scoring(ball: &Ball, field: &PlayField) -> Option<Side> {
        if ball.pos.x < field.left() {
            Some(Side::Right) // Right player scored
        } else if ball.pos.x > field.right() {
            Some(Side::Left) // Left player scored
        } else {
            None
        }
    }

    /// Reset ball for serve, heading toward `receiver`
    pub fn serve_ball(ball: &mut Ball, receiver: Side, config: &Config, rng_state: &mut u64) {
        let center = config.field.center();
        ball.size = config.ball_size;
        ball.pos = Vec2::new(center.x - ball.size / 2.0, center.y - ball.size / 2.0);

        let vy = if config.random_serve {
            // Simple linear congruential generator for deterministic randomness
            *rng_state = rng_state.wrapping_mul(1103515245).wrapping_add(12345);
            if (*rng_state >> 16) & 1 == 1 {
                -config.serve_vy
            } else {
                config.serve_vy
            }
        } else {
            config.serve_vy
        };

        let vx = match receiver {
            Side::Left => -config.ball_speed,
            Side::Right => config.ball_speed,
        };

        ball.vel = Vec2::new(vx, vy);
        ball.serve_cooldown = config.serve_cooldown_ticks;
        ball.hit_cooldown = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddles(config: &Config) -> [Paddle; 2] {
        [
            Paddle::new(Side::Left, config),
            Paddle::new(Side::Right, config),
        ]
    }

    /// Ball whose centre sits `offset` pixels below the left paddle's centre,
    /// overlapping the paddle face.
    fn ball_on_left_paddle(config: &Config, paddle: &Paddle, offset: f32, vel: Vec2) -> Ball {
        let size = config.ball_size;
        let pos = Vec2::new(
            paddle.rect().right() - 1.0,
            paddle.center_y() + offset - size / 2.0,
        );
        Ball::new(pos, vel, size)
    }

    #[test]
    fn test_paddle_movement() {
        let config = Config::default();
        let mut paddle = Paddle::new(Side::Left, &config);
        let start = paddle.y;

        Physics::update_paddle(
            &mut paddle,
            PaddleInput::new(true, false),
            config.paddle_speed,
            &config.field,
        );
        assert_eq!(paddle.vy, -config.paddle_speed);
        assert_eq!(paddle.y, start - config.paddle_speed);

        Physics::update_paddle(
            &mut paddle,
            PaddleInput::new(false, true),
            config.paddle_speed,
            &config.field,
        );
        assert_eq!(paddle.vy, config.paddle_speed);
        assert_eq!(paddle.y, start);

        // Both keys cancel out, as does no key
        Physics::update_paddle(
            &mut paddle,
            PaddleInput::new(true, true),
            config.paddle_speed,
            &config.field,
        );
        assert_eq!(paddle.vy, 0.0);
        Physics::update_paddle(&mut paddle, PaddleInput::idle(), config.paddle_speed, &config.field);
        assert_eq!(paddle.vy, 0.0);
        assert_eq!(paddle.y, start);
    }

    #[test]
    fn test_paddle_bounds() {
        let config = Config::default();
        let field = config.field;
        let mut paddle = Paddle::new(Side::Right, &config);

        for _ in 0..200 {
            Physics::update_paddle(&mut paddle, PaddleInput::new(true, false), 10.0, &field);
            assert!(paddle.y >= field.top());
        }
        assert_eq!(paddle.y, field.top());
        assert_eq!(paddle.vy, 0.0); // No bounce off the top

        for _ in 0..200 {
            Physics::update_paddle(&mut paddle, PaddleInput::new(false, true), 10.0, &field);
            assert!(paddle.rect().bottom() <= field.bottom());
        }
        assert_eq!(paddle.rect().bottom(), field.bottom());
        assert_eq!(paddle.vy, 0.0);
    }

    #[test]
    fn test_tracking_input() {
        let config = Config::classic();
        let paddle = Paddle::new(Side::Right, &config);
        let speed = config.paddle_speed;

        let mut ball = Ball::new(Vec2::new(400.0, 0.0), Vec2::zero(), config.ball_size);

        ball.pos.y = paddle.rect().bottom() + 50.0;
        assert_eq!(
            Physics::tracking_input(&paddle, &ball, speed),
            PaddleInput::new(false, true)
        );

        ball.pos.y = paddle.y - 50.0;
        assert_eq!(
            Physics::tracking_input(&paddle, &ball, speed),
            PaddleInput::new(true, false)
        );

        // Close enough: hold still rather than overshoot
        ball.pos.y = paddle.center_y() - ball.size / 2.0 + speed / 2.0;
        assert_eq!(
            Physics::tracking_input(&paddle, &ball, speed),
            PaddleInput::idle()
        );
    }

    #[test]
    fn test_wall_reflection_is_idempotent() {
        let config = Config::default();
        let field = config.field;
        let paddles = paddles(&config);

        // At the top edge, heading up
        let mut ball = Ball::new(
            Vec2::new(400.0, field.top()),
            Vec2::new(0.0, -4.0),
            config.ball_size,
        );
        let step = Physics::advance_ball(&mut ball, &paddles, &config);

        assert!(step.wall_bounce);
        assert_eq!(ball.pos.y, field.top());
        assert_eq!(ball.vel, Vec2::new(0.0, 4.0));

        // Reflecting again leaves the ball alone
        assert!(!Physics::bounce_walls(&mut ball, &field));
        assert_eq!(ball.vel, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_bottom_wall_reflection() {
        let config = Config::default();
        let field = config.field;
        let mut ball = Ball::new(
            Vec2::new(400.0, field.bottom() - config.ball_size - 1.0),
            Vec2::new(5.0, 3.0),
            config.ball_size,
        );

        let step = Physics::advance_ball(&mut ball, &paddles(&config), &config);

        assert!(step.wall_bounce);
        assert_eq!(ball.rect().bottom(), field.bottom());
        assert_eq!(ball.vel, Vec2::new(5.0, -3.0));
    }

    #[test]
    fn test_scoring_detection() {
        let field = Config::default().field;

        let ball_left = Ball::new(Vec2::new(-1.0, 300.0), Vec2::zero(), 12.0);
        assert_eq!(Physics::check_scoring(&ball_left, &field), Some(Side::Right));

        let ball_right = Ball::new(Vec2::new(field.right() + 1.0, 300.0), Vec2::zero(), 12.0);
        assert_eq!(Physics::check_scoring(&ball_right, &field), Some(Side::Left));

        let ball_center = Ball::new(Vec2::new(400.0, 300.0), Vec2::zero(), 12.0);
        assert_eq!(Physics::check_scoring(&ball_center, &field), None);
    }

    #[test]
    fn test_ball_leaving_left_edge_scores_for_right() {
        let config = Config::default();
        let mut ball = Ball::new(
            Vec2::new(config.field.left() - 1.0, 300.0),
            Vec2::new(-5.0, 0.0),
            config.ball_size,
        );

        let step = Physics::advance_ball(&mut ball, &paddles(&config), &config);
        assert_eq!(step.scored, Some(Side::Right));
    }

    #[test]
    fn test_centered_hit_blends_toward_flat() {
        let config = Config::default();
        let [left, right] = paddles(&config);
        let mut ball = ball_on_left_paddle(&config, &left, 0.0, Vec2::new(-5.0, 5.0));

        assert!(Physics::check_paddle_collision(&mut ball, &left, &config));

        // Target is flat; 60% of the old vertical speed survives this hit
        assert!((ball.vel.y - 3.0).abs() < 1e-5);
        assert!(ball.vel.y != 0.0);
        assert!((ball.vel.x - 5.3).abs() < 1e-5);
        assert_eq!(ball.pos.x, left.rect().right());
        assert_eq!(ball.hit_cooldown, config.paddle_hit_cooldown_ticks);

        // The far paddle is not involved
        assert!(!Physics::check_paddle_collision(&mut ball, &right, &config));
    }

    #[test]
    fn test_edge_hit_is_clamped() {
        let config = Config::default();
        let left = Paddle::new(Side::Left, &config);
        let mut ball = ball_on_left_paddle(&config, &left, 50.0, Vec2::new(-11.9, 0.0));

        assert!(Physics::check_paddle_collision(&mut ball, &left, &config));

        // 50 * 0.12 * 2 = 12 clamps to 7, blended from 0 gives 2.8
        assert!((ball.vel.y - 0.4 * config.max_vy).abs() < 1e-5);
        assert_eq!(ball.vel.x, config.max_speed);
    }

    #[test]
    fn test_right_paddle_sends_ball_left() {
        let config = Config::default();
        let right = Paddle::new(Side::Right, &config);
        let mut ball = Ball::new(
            Vec2::new(right.x - config.ball_size + 1.0, right.y),
            Vec2::new(6.0, -2.0),
            config.ball_size,
        );

        assert!(Physics::check_paddle_collision(&mut ball, &right, &config));
        assert!(ball.vel.x < 0.0);
        assert_eq!(ball.rect().right(), right.x);
    }

    #[test]
    fn test_receding_ball_is_ignored() {
        let config = Config::default();
        let left = Paddle::new(Side::Left, &config);
        let mut ball = ball_on_left_paddle(&config, &left, 0.0, Vec2::new(5.0, 1.0));
        let before = ball;

        assert!(!Physics::check_paddle_collision(&mut ball, &left, &config));
        assert_eq!(ball, before);
    }

    #[test]
    fn test_hit_cooldown_suppresses_collision() {
        let config = Config::default();
        let paddles = paddles(&config);
        let mut ball = ball_on_left_paddle(&config, &paddles[0], 0.0, Vec2::new(-1.0, 0.0));
        ball.hit_cooldown = 3;

        let step = Physics::advance_ball(&mut ball, &paddles, &config);

        assert_eq!(step.paddle_hit, None);
        assert_eq!(ball.hit_cooldown, 2);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_reflect_deflection() {
        let config = Config::classic();
        let left = Paddle::new(Side::Left, &config);
        let mut ball = ball_on_left_paddle(&config, &left, 30.0, Vec2::new(-7.0, 7.0));

        assert!(Physics::check_paddle_collision(&mut ball, &left, &config));
        assert_eq!(ball.vel, Vec2::new(7.0, 7.0));
    }

    #[test]
    fn test_serve_cooldown_holds_ball() {
        let config = Config::default();
        let mut ball = Ball::new(Vec2::zero(), Vec2::zero(), config.ball_size);
        let mut rng = config.seed;
        Physics::serve_ball(&mut ball, Side::Right, &config, &mut rng);
        let served_at = ball.pos;

        let step = Physics::advance_ball(&mut ball, &paddles(&config), &config);

        assert_eq!(step, BallStep::default());
        assert_eq!(ball.pos, served_at);
        assert_eq!(ball.serve_cooldown, config.serve_cooldown_ticks - 1);
    }

    #[test]
    fn test_serve_ball() {
        let config = Config::default();
        let mut ball = Ball::new(Vec2::zero(), Vec2::zero(), config.ball_size);
        let mut rng = 12345u64;

        Physics::serve_ball(&mut ball, Side::Right, &config, &mut rng);

        // Ball should be centred
        assert_eq!(ball.center(), config.field.center());
        assert_eq!(ball.vel, Vec2::new(config.ball_speed, config.serve_vy));
        assert_eq!(ball.serve_cooldown, config.serve_cooldown_ticks);
        assert_eq!(ball.hit_cooldown, 0);

        Physics::serve_ball(&mut ball, Side::Left, &config, &mut rng);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_deterministic_rng() {
        let config = Config::hyper();
        let mut ball1 = Ball::new(Vec2::zero(), Vec2::zero(), config.ball_size);
        let mut ball2 = Ball::new(Vec2::zero(), Vec2::zero(), config.ball_size);
        let mut rng1 = 12345u64;
        let mut rng2 = 12345u64;

        for _ in 0..8 {
            Physics::serve_ball(&mut ball1, Side::Left, &config, &mut rng1);
            Physics::serve_ball(&mut ball2, Side::Left, &config, &mut rng2);
            assert_eq!(ball1.vel, ball2.vel);
            assert_eq!(ball1.vel.y.abs(), config.serve_vy);
        }
        assert_eq!(rng1, rng2);
    }
}
