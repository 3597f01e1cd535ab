use crate::{
    api,
    guard::{RouteGuard, credential::CredentialVerifier},
    session::SessionBridge,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::debug;
use url::Url;

pub struct Args {
    pub port: u16,
    pub jwt_secret: SecretString,
    pub cookie_secure: bool,
    pub backend_url: Url,
    pub backend_timeout: Duration,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("jwt_secret", &"***")
            .field("cookie_secure", &self.cookie_secure)
            .field("backend_url", &self.backend_url.as_str())
            .field("backend_timeout", &self.backend_timeout)
            .finish()
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the backend client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let verifier = Arc::new(CredentialVerifier::new(&args.jwt_secret));
    let guard = RouteGuard::new(verifier);

    let bridge = SessionBridge::new(args.backend_url, args.backend_timeout, args.cookie_secure)
        .context("Failed to build backend client")?;

    api::new(args.port, guard, Arc::new(bridge)).await
}
