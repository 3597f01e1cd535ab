use anyhow::{Result, anyhow};
use clap::{Arg, ArgAction, Command};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Shared secret used to verify the HMAC-signed auth cookie")
                .env("SORTEIOS_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark locally issued cookies as Secure (serve over HTTPS)")
                .env("SORTEIOS_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}

pub struct Options {
    pub jwt_secret: SecretString,
    pub cookie_secure: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if the secret is missing or blank.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_JWT_SECRET}"))?;

        Ok(Self {
            jwt_secret: SecretString::from(secret.as_str()),
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
        })
    }
}
