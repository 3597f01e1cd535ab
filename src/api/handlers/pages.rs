//! HTML shells for the panel routes.
//!
//! The screens themselves are rendered client-side; the server only answers
//! with a document naming the page and the signed-in user so the guard gates
//! real routes.

use axum::{
    Extension,
    extract::{Path, RawQuery},
    response::Html,
};
use url::form_urlencoded;

use crate::{
    guard::{FROM_PARAM, paths::HOME_PATH},
    session::SessionContext,
};

type Session = Option<Extension<SessionContext>>;

/// `GET /`: login entry point.
pub async fn login_page(RawQuery(query): RawQuery) -> Html<String> {
    let from = return_target(query.as_deref());

    Html(shell(
        "Entrar",
        &format!(
            r#"<form id="login" method="post" action="/api/login" data-{FROM_PARAM}="{}"></form>"#,
            escape_html(&from)
        ),
    ))
}

pub async fn dashboard(session: Session) -> Html<String> {
    panel("Dashboard", session, "")
}

pub async fn sorteios(session: Session) -> Html<String> {
    panel("Sorteios", session, "")
}

pub async fn sorteio(session: Session, Path(id): Path<String>) -> Html<String> {
    panel("Sorteio", session, &id)
}

pub async fn editar_sorteio(session: Session, Path(id): Path<String>) -> Html<String> {
    panel("Editar sorteio", session, &id)
}

pub async fn criar_sorteio(session: Session) -> Html<String> {
    panel("Criar sorteio", session, "")
}

/// First `from` value of the query when it is a same-site path, else the
/// dashboard. Repeated or malformed parameters never fail the page.
fn return_target(query: Option<&str>) -> String {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .find(|(key, _)| key == FROM_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|from| from.starts_with('/') && !from.starts_with("//"))
        .unwrap_or_else(|| HOME_PATH.to_string())
}

fn panel(title: &str, session: Session, id: &str) -> Html<String> {
    let user = session
        .as_ref()
        .map_or("usuário", |Extension(ctx)| ctx.display_name());

    Html(shell(
        title,
        &format!(
            r#"<main id="painel" data-usuario="{}" data-id="{}"></main>"#,
            escape_html(user),
            escape_html(id)
        ),
    ))
}

fn shell(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"pt-BR\"><head><meta charset=\"utf-8\"><title>{} | Sorteios</title></head><body>{body}</body></html>",
        escape_html(title)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
