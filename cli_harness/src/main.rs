//! Headless harness: plays computer-controlled matches through the frame
//! orchestrator, checks the world every tick and prints a summary.

use color_eyre::eyre::{eyre, WrapErr};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use pong_core::*;
use serde::Serialize;
use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

const USAGE: &str = "usage: cli_harness [--preset classic|pro|hyper] [--matches N] [--seed N] \
                     [--max-ticks N] [--json] [--verbose]";

/// Command-line options
#[derive(Debug, Clone, PartialEq)]
struct Options {
    preset: Preset,
    matches: u32,
    seed: u64,
    max_ticks: u32,
    json: bool,
    verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            preset: Preset::Pro,
            matches: 1,
            seed: Config::default().seed,
            max_ticks: 200_000,
            json: false,
            verbose: false,
        }
    }
}

/// `None` when help was requested
fn parse_args(args: impl IntoIterator<Item = String>) -> color_eyre::Result<Option<Options>> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| eyre!("{flag} needs a value"));

        match arg.as_str() {
            "--preset" => {
                let name = value("--preset")?;
                options.preset =
                    Preset::from_name(&name).ok_or_else(|| eyre!("unknown preset `{name}`"))?;
            }
            "--matches" => {
                options.matches = value("--matches")?
                    .parse()
                    .wrap_err("--matches must be a whole number")?;
                if options.matches == 0 {
                    return Err(eyre!("--matches must be at least 1"));
                }
            }
            "--seed" => {
                options.seed = value("--seed")?
                    .parse()
                    .wrap_err("--seed must be a whole number")?;
            }
            "--max-ticks" => {
                options.max_ticks = value("--max-ticks")?
                    .parse()
                    .wrap_err("--max-ticks must be a whole number")?;
            }
            "--json" => options.json = true,
            "-v" | "--verbose" => options.verbose = true,
            "-h" | "--help" => return Ok(None),
            other => return Err(eyre!("unknown argument `{other}`\n{USAGE}")),
        }
    }
    Ok(Some(options))
}

/// Holds up, down or nothing for a random 5-40 ticks at a time
#[derive(Debug, Clone)]
struct RandomWalkBot {
    rng: u64,
    hold: PaddleInput,
    remaining: u32,
}

impl RandomWalkBot {
    fn new(seed: u64) -> Self {
        Self {
            rng: seed,
            hold: PaddleInput::idle(),
            remaining: 0,
        }
    }

    fn next_random(&mut self) -> u64 {
        self.rng = self.rng.wrapping_mul(1103515245).wrapping_add(12345);
        self.rng >> 16
    }

    fn next_input(&mut self) -> PaddleInput {
        if self.remaining == 0 {
            self.hold = match self.next_random() % 3 {
                0 => PaddleInput::new(true, false),
                1 => PaddleInput::new(false, true),
                _ => PaddleInput::idle(),
            };
            self.remaining = 5 + (self.next_random() % 36) as u32;
        }
        self.remaining -= 1;
        self.hold
    }
}

/// Input collaborator: two bots, an interrupt flag and a tick cap
struct BotInput {
    left: RandomWalkBot,
    right: RandomWalkBot,
    interrupted: Arc<AtomicBool>,
    max_ticks: u32,
    timed_out: bool,
}

impl InputSource for BotInput {
    fn sample(&mut self, game: &Game) -> FrameInput {
        let controls = Controls::new(self.left.next_input(), self.right.next_input());

        if game.tick >= self.max_ticks {
            self.timed_out = true;
        }
        let quit = self.timed_out || self.interrupted.load(Ordering::SeqCst);
        FrameInput { controls, quit }
    }
}

/// Render collaborator that draws nothing and checks every frame instead
#[derive(Debug, Default)]
struct InvariantChecker {
    frames: u64,
}

impl Renderer for InvariantChecker {
    type Error = color_eyre::Report;

    fn present(&mut self, view: &View) -> Result<(), Self::Error> {
        self.frames += 1;
        let field = view.field;

        for (side, paddle) in [(Side::Left, view.left_paddle), (Side::Right, view.right_paddle)] {
            if paddle.top() < field.top() || paddle.bottom() > field.bottom() {
                return Err(eyre!(
                    "tick {}: {} paddle left the field at y={}",
                    view.tick,
                    side.label(),
                    paddle.y
                ));
            }
        }

        let [a, b] = view.points;
        if check_set_won(a, b, view.score_limit) {
            return Err(eyre!("tick {}: set left open at {a}-{b}", view.tick));
        }
        if view.sets.iter().any(|&sets| sets > view.sets_to_win) {
            return Err(eyre!("tick {}: sets {:?} past the target", view.tick, view.sets));
        }
        Ok(())
    }
}

/// Audio collaborator that counts cues
#[derive(Debug, Default, Clone, Copy, Serialize)]
struct CueCounts {
    paddle_hits: u32,
    wall_bounces: u32,
    points: u32,
}

impl AudioSink for CueCounts {
    fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::BallHit => self.paddle_hits += 1,
            SoundCue::WallBounce => self.wall_bounces += 1,
            SoundCue::PointScored => self.points += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct MatchReport {
    seed: u64,
    result: MatchResult,
    ticks: Tick,
    timed_out: bool,
    cues: CueCounts,
}

#[derive(Debug, Serialize)]
struct Summary {
    preset: Preset,
    config: Config,
    matches: Vec<MatchReport>,
    wins: [u32; 2],
    abandoned: u32,
    interrupted: bool,
}

impl Summary {
    /// Empty summary whose config carries the first match's seed
    fn new(options: &Options) -> Self {
        let mut config = options.preset.config();
        config.seed = options.seed;
        Summary {
            preset: options.preset,
            config,
            matches: Vec::new(),
            wins: [0, 0],
            abandoned: 0,
            interrupted: false,
        }
    }
}

fn run_match(
    preset: Preset,
    seed: u64,
    max_ticks: u32,
    interrupted: Arc<AtomicBool>,
) -> color_eyre::Result<MatchReport> {
    let mut config = preset.config();
    config.seed = seed;
    let game = Game::new(config).wrap_err_with(|| format!("invalid {} preset", preset.name()))?;

    let mut orchestrator = Orchestrator::new(game);
    let mut input = BotInput {
        left: RandomWalkBot::new(seed ^ 0x5EED_0001),
        right: RandomWalkBot::new(seed ^ 0x5EED_0002),
        interrupted,
        max_ticks,
        timed_out: false,
    };
    let mut checker = InvariantChecker::default();
    let mut cues = CueCounts::default();

    let result = orchestrator
        .run(&mut input, &mut checker, &mut cues, Pacing::Unthrottled)
        .wrap_err_with(|| format!("invariant broken in match with seed {seed}"))?;

    let ticks = orchestrator.game().tick;
    debug!(seed, ticks, frames = checker.frames, "match checked");
    if input.timed_out {
        warn!(seed, max_ticks, "match hit the tick cap");
    }

    Ok(MatchReport {
        seed,
        result,
        ticks,
        timed_out: input.timed_out,
        cues,
    })
}

fn print_text(summary: &Summary) -> color_eyre::Result<()> {
    let mut out = stdout();

    queue!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(format!(
            "Pong harness: {} ({})\n",
            summary.preset.name(),
            summary.preset.description()
        )),
        ResetColor
    )?;

    for (i, report) in summary.matches.iter().enumerate() {
        let color = match report.result {
            MatchResult::Won { .. } => Color::Green,
            MatchResult::Aborted => Color::Yellow,
        };
        let note = if report.timed_out { " (tick cap)" } else { "" };
        queue!(
            out,
            SetForegroundColor(color),
            Print(format!(
                "Match {:>3} seed {:<10} {}{note}  {} ticks, {} points, {} paddle hits\n",
                i + 1,
                report.seed,
                report.result,
                report.ticks,
                report.cues.points,
                report.cues.paddle_hits,
            )),
            ResetColor
        )?;
    }

    queue!(
        out,
        SetForegroundColor(Color::DarkGrey),
        Print(format!(
            "{}: {}  {}: {}  abandoned: {}{}\n",
            Side::Left.label(),
            summary.wins[0],
            Side::Right.label(),
            summary.wins[1],
            summary.abandoned,
            if summary.interrupted { "  (interrupted)" } else { "" }
        )),
        ResetColor
    )?;

    out.flush()?;
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let Some(options) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    if options.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    // Ctrl-C abandons the running match at the next tick
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .wrap_err("failed to set Ctrl-C handler")?;

    let mut summary = Summary::new(&options);

    for i in 0..options.matches {
        let seed = options.seed.wrapping_add(u64::from(i));
        let report = run_match(
            options.preset,
            seed,
            options.max_ticks,
            Arc::clone(&interrupted),
        )?;
        info!(seed, result = %report.result, ticks = report.ticks, "match finished");

        match report.result.winner() {
            Some(side) => summary.wins[side.index()] += 1,
            None => summary.abandoned += 1,
        }
        summary.matches.push(report);

        if interrupted.load(Ordering::SeqCst) {
            summary.interrupted = true;
            break;
        }
    }

    if options.json {
        let mut out = stdout();
        serde_json::to_writer_pretty(&mut out, &summary).wrap_err("failed to write report")?;
        writeln!(out)?;
    } else {
        print_text(&summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_flags() {
        let options = parse_args(args(&[
            "--preset",
            "Hyper",
            "--matches",
            "4",
            "--seed",
            "99",
            "--max-ticks",
            "1000",
            "--json",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(options.preset, Preset::Hyper);
        assert_eq!(options.matches, 4);
        assert_eq!(options.seed, 99);
        assert_eq!(options.max_ticks, 1000);
        assert!(options.json);
        assert!(!options.verbose);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_args(args(&["--preset", "ultra"])).is_err());
        assert!(parse_args(args(&["--matches", "0"])).is_err());
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["-h"])).unwrap().is_none());
    }

    #[test]
    fn test_bot_is_deterministic() {
        let mut a = RandomWalkBot::new(7);
        let mut b = RandomWalkBot::new(7);

        for _ in 0..500 {
            assert_eq!(a.next_input(), b.next_input());
            assert!(a.remaining < 40);
        }
    }

    #[test]
    fn test_classic_match_finishes() {
        let report = run_match(Preset::Classic, 3, 500_000, Arc::new(AtomicBool::new(false)))
            .unwrap();

        assert!(!report.timed_out);
        assert!(matches!(report.result, MatchResult::Won { .. }));
        assert!(report.cues.points >= 11);
    }

    #[test]
    fn test_interrupt_abandons_match() {
        let report = run_match(Preset::Pro, 1, 500_000, Arc::new(AtomicBool::new(true))).unwrap();

        assert_eq!(report.result, MatchResult::Aborted);
        assert_eq!(report.ticks, 0);
        assert!(!report.timed_out);
    }

    #[test]
    fn test_tick_cap_abandons_match() {
        let report = run_match(Preset::Hyper, 1, 10, Arc::new(AtomicBool::new(false))).unwrap();

        assert_eq!(report.result, MatchResult::Aborted);
        assert_eq!(report.ticks, 10);
        assert!(report.timed_out);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = Summary {
            preset: Preset::Classic,
            config: Preset::Classic.config(),
            matches: vec![MatchReport {
                seed: 1,
                result: MatchResult::Won {
                    winner: Side::Right,
                    sets: [0, 1],
                },
                ticks: 1234,
                timed_out: false,
                cues: CueCounts::default(),
            }],
            wins: [0, 1],
            abandoned: 0,
            interrupted: false,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["wins"], serde_json::json!([0, 1]));
        assert_eq!(json["matches"][0]["ticks"], 1234);
        assert_eq!(json["config"]["score_limit"], 11);
    }

    #[test]
    fn test_summary_config_uses_chosen_seed() {
        let options = parse_args(args(&["--preset", "hyper", "--seed", "4242"]))
            .unwrap()
            .unwrap();

        let summary = Summary::new(&options);
        assert_eq!(summary.config.seed, 4242);
        assert_eq!(summary.config.score_limit, Preset::Hyper.config().score_limit);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["config"]["seed"], 4242);
        assert_eq!(json["preset"], serde_json::to_value(Preset::Hyper).unwrap());
    }
}
