//! Route handlers: session bridge endpoints, health and page shells.

pub mod health;
pub mod login;
pub mod logout;
pub mod pages;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::session::schema::ErrorResponse;

/// JSON `{ "mensagem": ... }` body with the given status.
pub(crate) fn message(status: StatusCode, mensagem: &str) -> Response {
    (status, Json(ErrorResponse::new(mensagem))).into_response()
}
