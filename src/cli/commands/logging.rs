use clap::{Arg, ArgAction, Command, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Accepted level names, indexed by the verbosity count they stand for.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse `SORTEIOS_LOG_LEVEL`: a level name or a count from 0 to 5.
fn parse_log_level(raw: &str) -> Result<u8, String> {
    if let Ok(count) = raw.parse::<u8>() {
        return if count <= 5 {
            Ok(count)
        } else {
            Err(format!("log level count {count} is out of range (0-5)"))
        };
    }

    let lowered = raw.to_ascii_lowercase();
    LEVEL_NAMES
        .iter()
        .position(|name| *name == lowered)
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("invalid log level: {raw}"))
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_log_level)
}

/// Tracing level for a verbosity count; `None` keeps the default (ERROR).
#[must_use]
pub const fn level(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log level, repeat -v or set error|warn|info|debug|trace (default: error)")
            .env("SORTEIOS_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
