//! Terminal Pong: menus, local two-player or versus-computer matches.

use app::App;
use color_eyre::eyre::{eyre, WrapErr};
use std::{fs::File, path::PathBuf, sync::Mutex};

mod app;
mod audio;
mod event;
mod input;
mod ui;

const USAGE: &str = "usage: pong-terminal [--log <path>]";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let Some(options) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };
    if let Some(path) = options.log {
        init_logging(&path)?;
    }

    let terminal = ratatui::init();
    let result = App::new().and_then(|app| app.run(terminal));
    ratatui::restore();
    result
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    log: Option<PathBuf>,
}

/// `None` when help was requested
fn parse_args(args: impl IntoIterator<Item = String>) -> color_eyre::Result<Option<Options>> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--log" => {
                let path = args.next().ok_or_else(|| eyre!("--log needs a file path"))?;
                options.log = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(None),
            other => return Err(eyre!("unknown argument `{other}`\n{USAGE}")),
        }
    }
    Ok(Some(options))
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(path: &PathBuf) -> color_eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_log_path() {
        let options = parse_args(args(&["--log", "pong.log"])).unwrap().unwrap();
        assert_eq!(options.log, Some(PathBuf::from("pong.log")));
    }

    #[test]
    fn test_parse_rejects_bad_flags() {
        assert!(parse_args(args(&["--log"])).is_err());
        assert!(parse_args(args(&["--fast"])).is_err());
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
        assert_eq!(parse_args(args(&[])).unwrap(), Some(Options::default()));
    }
}
