use pong_core::*;

/// Runs the left paddle from wall to wall and checks the world each tick
struct Sweeper {
    up: bool,
    ticks: u32,
}

impl Sweeper {
    fn new() -> Self {
        Sweeper { up: true, ticks: 0 }
    }

    fn check(game: &Game) {
        let config = &game.config;
        for paddle in &game.paddles {
            assert!(paddle.y >= config.field.top(), "paddle above the field");
            assert!(
                paddle.y + paddle.height <= config.field.bottom(),
                "paddle below the field"
            );
        }

        if !game.is_over() {
            let vx = game.ball.vel.x.abs();
            assert!(vx >= config.ball_speed && vx <= config.max_speed, "vx {vx}");
            assert!(game.ball.vel.y.abs() <= config.max_vy, "vy {}", game.ball.vel.y);
        }

        let [a, b] = game.scoreboard.points;
        assert!(!check_set_won(a, b, config.score_limit), "set left open at {a}-{b}");
    }
}

impl InputSource for Sweeper {
    fn sample(&mut self, game: &Game) -> FrameInput {
        Self::check(game);
        self.ticks += 1;

        let paddle = &game.paddles[0];
        if paddle.y <= game.config.field.top() {
            self.up = false;
        } else if paddle.y + paddle.height >= game.config.field.bottom() {
            self.up = true;
        }

        let held = PaddleInput::new(self.up, !self.up);
        FrameInput {
            controls: Controls::new(held, held),
            quit: false,
        }
    }
}

/// Paddles never move
struct Idle;

impl InputSource for Idle {
    fn sample(&mut self, game: &Game) -> FrameInput {
        Sweeper::check(game);
        FrameInput::default()
    }
}

/// Gives up once the match runs too long
struct TickCap {
    limit: u32,
}

impl Renderer for TickCap {
    type Error = String;

    fn present(&mut self, view: &View) -> Result<(), Self::Error> {
        if view.tick > self.limit {
            return Err(format!("no result after {} ticks", view.tick));
        }
        Ok(())
    }
}

#[derive(Default)]
struct Cues(Vec<SoundCue>);

impl AudioSink for Cues {
    fn play(&mut self, cue: SoundCue) {
        self.0.push(cue);
    }
}

#[test]
fn classic_match_against_computer_finishes() {
    let game = Game::new(Preset::Classic.config()).unwrap();
    let mut orchestrator = Orchestrator::new(game);
    let mut cues = Cues::default();

    let result = orchestrator
        .run(
            &mut Sweeper::new(),
            &mut TickCap { limit: 1_000_000 },
            &mut cues,
            Pacing::Unthrottled,
        )
        .unwrap();

    let game = orchestrator.game();
    let winner = result.winner().unwrap();
    assert_eq!(game.status, Status::MatchWon(winner));
    assert_eq!(game.scoreboard.sets[winner.index()], 1);
    assert_eq!(game.scoreboard.sets[winner.opposite().index()], 0);

    let points = cues.0.iter().filter(|cue| **cue == SoundCue::PointScored).count();
    assert!(points >= 11);
    assert!(cues.0.contains(&SoundCue::BallHit));
}

#[test]
fn unreturned_serves_decide_the_match() {
    // Fixed serves that miss a centred paddle: the scorer keeps the serve
    // pointed at the opponent, so every point goes the same way.
    let config = Preset::Pro.config();
    let mut orchestrator = Orchestrator::new(Game::new(config).unwrap());

    let result = orchestrator
        .run(
            &mut Idle,
            &mut TickCap { limit: 100_000 },
            &mut (),
            Pacing::Unthrottled,
        )
        .unwrap();

    assert_eq!(
        result,
        MatchResult::Won {
            winner: Side::Left,
            sets: [3, 0],
        }
    );
    assert_eq!(orchestrator.game().scoreboard.points, [0, 0]);
}

#[test]
fn finished_match_ignores_further_ticks() {
    let mut orchestrator = Orchestrator::new(Game::new(Preset::Pro.config()).unwrap());
    let result = orchestrator
        .run(
            &mut Idle,
            &mut TickCap { limit: 100_000 },
            &mut (),
            Pacing::Unthrottled,
        )
        .unwrap();

    let finished = orchestrator.game().clone();
    let report = orchestrator.tick(&mut Idle, &mut ());

    assert!(report.events.is_empty());
    assert_eq!(report.result, Some(result));
    assert_eq!(orchestrator.game().tick, finished.tick);
    assert_eq!(orchestrator.game().scoreboard, finished.scoreboard);

    // Aborting afterwards keeps the win
    assert_eq!(orchestrator.game_mut().abort(), result);
}

#[test]
fn pro_rallies_stay_within_speed_bounds() {
    // Angled deflection speeds the ball up on every hit; the sweeper checks
    // vx and vy against the configured caps before each tick.
    let mut orchestrator = Orchestrator::new(Game::new(Preset::Pro.config()).unwrap());
    let mut sweeper = Sweeper::new();
    let mut cues = Cues::default();

    for _ in 0..20_000 {
        if orchestrator.tick(&mut sweeper, &mut cues).result.is_some() {
            break;
        }
    }

    let hits = cues.0.iter().filter(|cue| **cue == SoundCue::BallHit).count();
    assert!(hits > 0, "no rally in {} ticks", sweeper.ticks);
    Sweeper::check(orchestrator.game());
}

#[test]
fn same_seed_same_match() {
    let run = || {
        let mut orchestrator = Orchestrator::new(Game::new(Preset::Hyper.config()).unwrap());
        let mut sweeper = Sweeper::new();
        for _ in 0..5_000 {
            orchestrator.tick(&mut sweeper, &mut ());
        }
        orchestrator.game().view()
    };

    assert_eq!(run(), run());
}

#[cfg(feature = "serde")]
#[test]
fn config_survives_json() {
    for preset in Preset::ALL {
        let config = preset.config();
        let json = serde_json::to_string(&config).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    let result = MatchResult::Won {
        winner: Side::Right,
        sets: [1, 3],
    };
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(serde_json::from_str::<MatchResult>(&json).unwrap(), result);
}
