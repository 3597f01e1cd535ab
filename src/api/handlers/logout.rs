use axum::{
    Extension, Json,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, instrument};

use crate::session::{
    SessionBridge, clear_auth_cookie, read_auth_cookie, schema::LogoutResponse,
};

#[utoipa::path(
    post,
    path = "/api/logout",
    responses (
        (status = 200, description = "Session cleared", body = LogoutResponse),
    ),
    tag = "session"
)]
#[instrument(skip_all)]
pub async fn logout(headers: HeaderMap, bridge: Extension<Arc<SessionBridge>>) -> Response {
    let token = read_auth_cookie(&headers);

    let mut set_cookies = match bridge.logout(token.as_deref()).await {
        Ok(relay) => relay.set_cookies,
        Err(err) => {
            error!("Logout relay failed: {err}");
            Vec::new()
        }
    };

    // Always clear the cookie, even if the backend did not.
    if set_cookies.is_empty() {
        if let Ok(cookie) = clear_auth_cookie(bridge.cookie_secure()) {
            set_cookies.push(cookie);
        }
    }

    let mut response_headers = HeaderMap::new();
    for cookie in set_cookies {
        response_headers.append(SET_COOKIE, cookie);
    }

    (
        StatusCode::OK,
        response_headers,
        Json(LogoutResponse { success: true }),
    )
        .into_response()
}
