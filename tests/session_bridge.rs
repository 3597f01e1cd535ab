//! `/api/login` and `/api/logout` against a fake raffle backend.
//!
//! The fake backend is a small axum app bound to an ephemeral port on the
//! loopback interface; the panel router is driven with `oneshot`.

use anyhow::Result;
use axum::{
    Json, Router,
    body::{Body, to_bytes},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use sorteios::{
    api,
    guard::{RouteGuard, credential::CredentialVerifier},
    session::SessionBridge,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

async fn backend_login(Json(body): Json<Value>) -> Response {
    match (body["login"].as_str(), body["senha"].as_str()) {
        (Some("admin"), Some("certa")) => {
            let mut headers = HeaderMap::new();
            headers.append(
                header::SET_COOKIE,
                HeaderValue::from_static("auth=abc.def.ghi; Path=/; HttpOnly; SameSite=Lax"),
            );
            headers.append(
                header::SET_COOKIE,
                HeaderValue::from_static("refresh=xyz; Path=/; HttpOnly"),
            );
            (StatusCode::OK, headers, Json(json!({ "ok": true }))).into_response()
        }
        (Some("bloqueado"), _) => (StatusCode::FORBIDDEN, "conta bloqueada").into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "mensagem": "Usuário ou senha incorretos" })),
        )
            .into_response(),
    }
}

/// Clears the session only when exactly the `auth` cookie was forwarded.
async fn backend_logout(headers: HeaderMap) -> Response {
    let forwarded = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        == Some("auth=abc.def.ghi");

    let mut response_headers = HeaderMap::new();
    if forwarded {
        response_headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("auth=; Path=/; Max-Age=0"),
        );
    }
    (StatusCode::OK, response_headers, Json(json!({}))).into_response()
}

async fn spawn_backend() -> Result<SocketAddr> {
    let backend = Router::new()
        .route("/login", post(backend_login))
        .route("/logout", post(backend_logout));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, backend).await;
    });
    Ok(addr)
}

fn app(backend: &str) -> Result<Router> {
    let verifier = Arc::new(CredentialVerifier::new(&SecretString::from("segredo")));
    let bridge = SessionBridge::new(Url::parse(backend)?, Duration::from_secs(2), false)?;
    Ok(api::router(RouteGuard::new(verifier), Arc::new(bridge)))
}

async fn post_json(router: Router, uri: &str, body: &str) -> Result<Response> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;
    Ok(router.oneshot(request).await?)
}

async fn json_body(response: Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(ToString::to_string))
        .collect()
}

#[tokio::test]
async fn login_relays_every_cookie() -> Result<()> {
    let addr = spawn_backend().await?;
    let response = post_json(
        app(&format!("http://{addr}"))?,
        "/api/login",
        r#"{"login":"admin","senha":"certa"}"#,
    )
    .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies[0].starts_with("auth=abc.def.ghi"));
    assert!(cookies[1].starts_with("refresh=xyz"));
    assert_eq!(json_body(response).await?, json!({ "ok": true }));
    Ok(())
}

#[tokio::test]
async fn login_relays_backend_status_and_message() -> Result<()> {
    let addr = spawn_backend().await?;
    let response = post_json(
        app(&format!("http://{addr}"))?,
        "/api/login",
        r#"{"login":"admin","senha":"errada"}"#,
    )
    .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(
        json_body(response).await?,
        json!({ "mensagem": "Usuário ou senha incorretos" })
    );
    Ok(())
}

#[tokio::test]
async fn login_falls_back_to_default_message() -> Result<()> {
    let addr = spawn_backend().await?;
    let response = post_json(
        app(&format!("http://{addr}"))?,
        "/api/login",
        r#"{"login":"bloqueado","senha":"qualquer"}"#,
    )
    .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await?,
        json!({ "mensagem": "Login inválido" })
    );
    Ok(())
}

#[tokio::test]
async fn login_rejects_incomplete_payload() -> Result<()> {
    let addr = spawn_backend().await?;
    for body in [r#"{"login":"admin"}"#, r#"{"login":" ","senha":"x"}"#, "nada"] {
        let response = post_json(app(&format!("http://{addr}"))?, "/api/login", body).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({ "mensagem": "Credenciais inválidas" })
        );
    }
    Ok(())
}

#[tokio::test]
async fn login_reports_unreachable_backend() -> Result<()> {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let response = post_json(
        app(&format!("http://{addr}"))?,
        "/api/login",
        r#"{"login":"admin","senha":"certa"}"#,
    )
    .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await?,
        json!({ "mensagem": "Erro no login" })
    );
    Ok(())
}

#[tokio::test]
async fn logout_forwards_cookie_and_relays_clearing() -> Result<()> {
    let addr = spawn_backend().await?;
    let request = Request::builder()
        .method("POST")
        .uri("/api/logout")
        .header(header::COOKIE, "theme=dark; auth=abc.def.ghi")
        .body(Body::empty())?;
    let response = app(&format!("http://{addr}"))?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response), vec!["auth=; Path=/; Max-Age=0"]);
    assert_eq!(json_body(response).await?, json!({ "success": true }));
    Ok(())
}

#[tokio::test]
async fn logout_clears_locally_when_backend_sends_nothing() -> Result<()> {
    let addr = spawn_backend().await?;
    let request = Request::builder()
        .method("POST")
        .uri("/api/logout")
        .body(Body::empty())?;
    let response = app(&format!("http://{addr}"))?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        set_cookies(&response),
        vec!["auth=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"]
    );
    Ok(())
}

#[tokio::test]
async fn logout_clears_locally_when_backend_is_down() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let request = Request::builder()
        .method("POST")
        .uri("/api/logout")
        .header(header::COOKIE, "auth=abc.def.ghi")
        .body(Body::empty())?;
    let response = app(&format!("http://{addr}"))?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        set_cookies(&response),
        vec!["auth=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"]
    );
    assert_eq!(json_body(response).await?, json!({ "success": true }));
    Ok(())
}

#[tokio::test]
async fn bridge_logout_forwards_auth_cookie() -> Result<()> {
    let addr = spawn_backend().await?;
    let bridge = SessionBridge::new(
        Url::parse(&format!("http://{addr}/"))?,
        Duration::from_secs(2),
        false,
    )?;

    let relay = bridge.logout(Some("abc.def.ghi")).await?;
    assert!(relay.is_success());
    assert_eq!(relay.set_cookies.len(), 1);
    Ok(())
}
