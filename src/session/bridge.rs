//! Relay of login/logout calls to the raffle backend.
//!
//! The backend owns the session: it issues the `auth` cookie on login and
//! clears it on logout. The bridge forwards the request and hands back the
//! backend's status, `Set-Cookie` headers and body untouched.

use axum::http::{
    HeaderValue, StatusCode,
    header::{COOKIE, SET_COOKIE},
};
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use super::{
    cookie::AUTH_COOKIE_NAME,
    schema::{BackendError, LoginRequest},
};
use crate::APP_USER_AGENT;

pub const DEFAULT_BACKEND_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    #[error("backend url cannot be used as a base: {0}")]
    NotABase(String),
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// What the backend answered, ready to be copied onto the browser response.
#[derive(Debug, Clone)]
pub struct Relay {
    pub status: StatusCode,
    pub set_cookies: Vec<HeaderValue>,
    body: Vec<u8>,
}

impl Relay {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `mensagem` from the backend error body, if it sent a readable one.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<BackendError>(&self.body)
            .ok()
            .and_then(|body| body.mensagem)
            .filter(|mensagem| !mensagem.trim().is_empty())
    }
}

#[derive(Clone, Debug)]
pub struct SessionBridge {
    client: Client,
    base_url: Url,
    cookie_secure: bool,
}

impl SessionBridge {
    /// # Errors
    ///
    /// Returns an error if the URL cannot carry paths or the HTTP client
    /// cannot be built.
    pub fn new(base_url: Url, timeout: Duration, cookie_secure: bool) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::NotABase(base_url.to_string()));
        }

        // Keep any path prefix when joining endpoint names.
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            cookie_secure,
        })
    }

    /// # Errors
    ///
    /// Returns an error if `name` does not form a valid URL.
    pub fn endpoint(&self, name: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(name)?)
    }

    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Forward credentials to `POST <backend>/login`.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure; backend rejections come
    /// back as a non-success [`Relay`].
    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn login(&self, request: &LoginRequest) -> Result<Relay, Error> {
        let url = self.endpoint("login")?;
        let response = self.client.post(url).json(request).send().await?;
        relay(response).await
    }

    /// Forward the caller's `auth` cookie to `POST <backend>/logout`.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure.
    #[instrument(skip_all, fields(has_cookie = token.is_some()))]
    pub async fn logout(&self, token: Option<&str>) -> Result<Relay, Error> {
        let url = self.endpoint("logout")?;
        let mut request = self.client.post(url);
        if let Some(token) = token {
            request = request.header(COOKIE, format!("{AUTH_COOKIE_NAME}={token}"));
        }
        let response = request.send().await?;
        relay(response).await
    }
}

async fn relay(response: Response) -> Result<Relay, Error> {
    let status = response.status();
    let set_cookies: Vec<HeaderValue> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .cloned()
        .collect();
    let body = response.bytes().await?.to_vec();

    debug!(
        status = status.as_u16(),
        cookies = set_cookies.len(),
        "backend answered"
    );

    Ok(Relay {
        status,
        set_cookies,
        body,
    })
}
