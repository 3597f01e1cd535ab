//! # Sorteios (raffle administration panel edge)
//!
//! `sorteios` is the server-side edge of the raffle administration panel. It
//! gates every request before any page logic runs and relays login/logout
//! calls to the raffle backend.
//!
//! ## Route Guard
//!
//! Each request path is classified against an ordered rule table
//! (ignored assets, public entry points, protected panel routes). Protected
//! routes require a valid `auth` cookie: an HMAC-signed JWT verified locally
//! against the shared secret, with no network round trip. Failures never
//! produce an error page; the caller is redirected to the login entry point
//! with the original path in the `from` query parameter.
//!
//! ## Session Bridge
//!
//! `POST /api/login` and `POST /api/logout` forward credentials to the
//! backend and copy its `Set-Cookie` headers onto the browser response. The
//! guard never writes the cookie; it only reads it.

pub mod api;
pub mod cli;
pub mod guard;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
