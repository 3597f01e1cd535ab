use axum::{
    Extension, Json,
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::message;
use crate::session::{
    SessionBridge,
    schema::{
        ErrorResponse, LoginRequest, LoginResponse, MSG_INVALID_CREDENTIALS, MSG_LOGIN_FAILED,
        MSG_LOGIN_REJECTED,
    },
};

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Signed in; backend Set-Cookie headers relayed", body = LoginResponse),
        (status = 400, description = "Missing login or senha", body = ErrorResponse),
        (status = 401, description = "Backend rejected the credentials (status relayed)", body = ErrorResponse),
        (status = 500, description = "Backend unreachable", body = ErrorResponse),
    ),
    tag = "session"
)]
#[instrument(skip_all)]
pub async fn login(
    bridge: Extension<Arc<SessionBridge>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) if request.is_complete() => request,
        Ok(_) => return message(StatusCode::BAD_REQUEST, MSG_INVALID_CREDENTIALS),
        Err(rejection) => {
            warn!("Unreadable login payload: {rejection}");
            return message(StatusCode::BAD_REQUEST, MSG_INVALID_CREDENTIALS);
        }
    };

    let relay = match bridge.login(&request).await {
        Ok(relay) => relay,
        Err(err) => {
            error!("Login relay failed: {err}");
            return message(StatusCode::INTERNAL_SERVER_ERROR, MSG_LOGIN_FAILED);
        }
    };

    if !relay.is_success() {
        info!(status = relay.status.as_u16(), "Backend rejected login");
        let mensagem = relay
            .error_message()
            .unwrap_or_else(|| MSG_LOGIN_REJECTED.to_string());
        return message(relay.status, &mensagem);
    }

    let mut headers = HeaderMap::new();
    for cookie in relay.set_cookies {
        headers.append(SET_COOKIE, cookie);
    }

    (StatusCode::OK, headers, Json(LoginResponse { ok: true })).into_response()
}
