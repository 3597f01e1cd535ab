//! Per-request identity of a verified caller.

use serde_json::Value;

use crate::guard::credential::Claims;

/// Identity attached to a request after the guard verified its credential.
///
/// Lives in request extensions only; handlers receive it through
/// `Option<Extension<SessionContext>>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    subject: Option<String>,
    name: Option<String>,
    issued_at: Option<i64>,
    expires_at: Option<i64>,
}

impl SessionContext {
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        let subject = claims
            .sub
            .clone()
            .or_else(|| claims.extra.get("id").and_then(scalar_to_string));
        let name = ["nome", "name"]
            .iter()
            .find_map(|key| claims.extra.get(*key).and_then(Value::as_str))
            .map(ToString::to_string);

        Self {
            subject,
            name,
            issued_at: claims.iat.map(whole_seconds),
            expires_at: claims.exp.map(whole_seconds),
        }
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name if present, else subject, else a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name()
            .or_else(|| self.subject())
            .unwrap_or("usuário")
    }

    #[must_use]
    pub const fn issued_at(&self) -> Option<i64> {
        self.issued_at
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole_seconds(numeric_date: f64) -> i64 {
    numeric_date.floor() as i64
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
