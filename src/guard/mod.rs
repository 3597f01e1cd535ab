//! Per-request gate in front of every panel route.
//!
//! Flow Overview: the middleware checks whether the path triggers the guard,
//! reads the `auth` cookie, classifies the path and, when the class needs it,
//! verifies the credential. The outcome is either a pass-through (with a
//! [`SessionContext`] attached when a credential was verified) or a 307
//! redirect. Verification failures never reach the caller as errors.

pub mod credential;
pub mod paths;

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;

use self::{
    credential::{Claims, CredentialVerifier, now_unix_seconds},
    paths::{Class, HOME_PATH, LOGIN_PATH},
};
use crate::session::{SessionContext, read_auth_cookie};

/// Query parameter carrying the original destination across a login redirect.
pub const FROM_PARAM: &str = "from";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue,
    RedirectToLogin { from: String },
    RedirectToHome,
}

/// A decision plus the claims of the credential that was verified on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub decision: Decision,
    pub claims: Option<Claims>,
}

impl Evaluation {
    const fn pass(claims: Option<Claims>) -> Self {
        Self {
            decision: Decision::Continue,
            claims,
        }
    }

    fn login(path: &str) -> Self {
        Self {
            decision: Decision::RedirectToLogin {
                from: path.to_string(),
            },
            claims: None,
        }
    }
}

/// Decide what happens to a request for `path` carrying `token`.
///
/// `token` is the raw `auth` cookie; `None` and blank values are treated
/// alike. Pure over its inputs.
#[must_use]
pub fn evaluate(
    path: &str,
    token: Option<&str>,
    verifier: &CredentialVerifier,
    now_unix_seconds: i64,
) -> Evaluation {
    let token = token.filter(|token| !token.trim().is_empty());

    match paths::classify(path) {
        Class::Ignored | Class::Other => Evaluation::pass(None),
        Class::Public => {
            let Some(token) = token else {
                return Evaluation::pass(None);
            };
            match verified(token, verifier, now_unix_seconds) {
                Some(_) if path == LOGIN_PATH => Evaluation {
                    decision: Decision::RedirectToHome,
                    claims: None,
                },
                claims => Evaluation::pass(claims),
            }
        }
        Class::Protected => {
            let Some(token) = token else {
                return Evaluation::login(path);
            };
            verified(token, verifier, now_unix_seconds)
                .map_or_else(|| Evaluation::login(path), |claims| Evaluation::pass(Some(claims)))
        }
    }
}

/// [`evaluate`] without the claims.
#[must_use]
pub fn decide(
    path: &str,
    token: Option<&str>,
    verifier: &CredentialVerifier,
    now_unix_seconds: i64,
) -> Decision {
    evaluate(path, token, verifier, now_unix_seconds).decision
}

fn verified(token: &str, verifier: &CredentialVerifier, now_unix_seconds: i64) -> Option<Claims> {
    match verifier.decode(token, now_unix_seconds) {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!(reason = %err, "credential rejected");
            None
        }
    }
}

/// Shared state of the guard middleware.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    verifier: Arc<CredentialVerifier>,
}

impl RouteGuard {
    #[must_use]
    pub const fn new(verifier: Arc<CredentialVerifier>) -> Self {
        Self { verifier }
    }

    #[must_use]
    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }
}

/// axum middleware; install with `middleware::from_fn_with_state`.
pub async fn route_guard(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !paths::triggers(&path) {
        return next.run(request).await;
    }

    let token = read_auth_cookie(request.headers());
    let evaluation = evaluate(
        &path,
        token.as_deref(),
        guard.verifier(),
        now_unix_seconds(),
    );

    match evaluation.decision {
        Decision::Continue => {
            if let Some(claims) = evaluation.claims {
                request
                    .extensions_mut()
                    .insert(SessionContext::from_claims(&claims));
            }
            next.run(request).await
        }
        Decision::RedirectToLogin { from } => {
            debug!(%path, "redirecting to login");
            Redirect::temporary(&login_location(request.uri(), &from)).into_response()
        }
        Decision::RedirectToHome => {
            debug!(%path, "already signed in, redirecting home");
            Redirect::temporary(&home_location(request.uri())).into_response()
        }
    }
}

/// `/` with the request query kept and `from` set to the original path.
#[must_use]
pub fn login_location(uri: &Uri, from: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes()) {
        if key != FROM_PARAM {
            query.append_pair(&key, &value);
        }
    }
    query.append_pair(FROM_PARAM, from);
    format!("{LOGIN_PATH}?{}", query.finish())
}

/// `/dashboard` with the request query kept.
#[must_use]
pub fn home_location(uri: &Uri) -> String {
    match uri.query() {
        Some(query) if !query.is_empty() => format!("{HOME_PATH}?{query}"),
        _ => HOME_PATH.to_string(),
    }
}
