use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::time::Duration;
use url::Url;

use crate::session::bridge::DEFAULT_BACKEND_TIMEOUT_SECONDS;

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_BACKEND_TIMEOUT_SECONDS: &str = "backend-timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .long(ARG_BACKEND_URL)
                .help("Base URL of the raffle REST backend (login/logout are relayed here)")
                .env("SORTEIOS_BACKEND_URL")
                .default_value("http://localhost:3333"),
        )
        .arg(
            Arg::new(ARG_BACKEND_TIMEOUT_SECONDS)
                .long(ARG_BACKEND_TIMEOUT_SECONDS)
                .help("Timeout for relayed backend calls in seconds")
                .env("SORTEIOS_BACKEND_TIMEOUT_SECONDS")
                .default_value("15")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

pub struct Options {
    pub url: Url,
    pub timeout: Duration,
}

impl Options {
    /// # Errors
    /// Returns an error if the backend URL does not parse.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let raw = matches
            .get_one::<String>(ARG_BACKEND_URL)
            .context("missing required argument: --backend-url")?;
        let url = Url::parse(raw).with_context(|| format!("invalid backend URL: {raw}"))?;

        let timeout = matches
            .get_one::<u64>(ARG_BACKEND_TIMEOUT_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECONDS);

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout),
        })
    }
}
