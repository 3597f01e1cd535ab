//! JSON bodies exchanged by the session bridge.
//!
//! Backend responses are read through these types instead of being passed
//! on as untyped JSON.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MSG_INVALID_CREDENTIALS: &str = "Credenciais inválidas";
pub const MSG_LOGIN_REJECTED: &str = "Login inválido";
pub const MSG_LOGIN_FAILED: &str = "Erro no login";

#[derive(ToSchema, Serialize, Deserialize, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub senha: String,
}

impl LoginRequest {
    /// Both fields must carry something other than whitespace.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.login.trim().is_empty() && !self.senha.trim().is_empty()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("login", &self.login)
            .field("senha", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub ok: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub mensagem: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(mensagem: impl Into<String>) -> Self {
        Self {
            mensagem: mensagem.into(),
        }
    }
}

/// Error body as sent by the backend, where `mensagem` may be missing.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct BackendError {
    #[serde(default)]
    pub mensagem: Option<String>,
}
