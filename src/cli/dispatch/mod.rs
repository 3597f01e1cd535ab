//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_PORT, auth, backend};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);

    let auth_opts = auth::Options::parse(matches)?;
    let backend_opts = backend::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        jwt_secret: auth_opts.jwt_secret,
        cookie_secure: auth_opts.cookie_secure,
        backend_url: backend_opts.url,
        backend_timeout: backend_opts.timeout,
    }))
}
