//! Local verification of the `auth` cookie credential.
//!
//! The backend signs session tokens as HMAC JWTs with a secret shared with
//! this service. Verification is offline: signature, expiry and not-before
//! are checked against an injected clock, with no leeway.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Registered time claims are NumericDate values: seconds since the epoch,
/// possibly with a fractional part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<f64>,
    /// Identity claims set by the backend (`id`, `nome`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed token")]
    Malformed,
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token has no expiry")]
    MissingExpiry,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedAlgorithm
            }
            _ => Self::Malformed,
        }
    }
}

/// Verifies credentials against the shared secret.
///
/// Holds only read-only key material; share it behind an `Arc`.
#[derive(Clone)]
pub struct CredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl CredentialVerifier {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Time claims are checked against the injected clock in `decode`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token at `now_unix_seconds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, signed with another
    /// algorithm or key, has no `exp`, is expired, or is not yet valid.
    pub fn decode(&self, token: &str, now_unix_seconds: i64) -> Result<Claims, Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)?;
        let claims = data.claims;

        #[allow(clippy::cast_precision_loss)]
        let now = now_unix_seconds as f64;

        let exp = claims.exp.ok_or(Error::MissingExpiry)?;
        if exp <= now {
            return Err(Error::Expired);
        }
        if claims.nbf.is_some_and(|nbf| nbf > now) {
            return Err(Error::NotYetValid);
        }

        Ok(claims)
    }

    /// `true` only when [`Self::decode`] succeeds.
    #[must_use]
    pub fn verify(&self, token: &str, now_unix_seconds: i64) -> bool {
        self.decode(token, now_unix_seconds).is_ok()
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("key", &"***")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

/// Current wall clock as unix seconds.
#[must_use]
pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "segredo-compartilhado";
    const NOW: i64 = 1_700_000_000;

    #[allow(clippy::cast_precision_loss)]
    fn at(seconds: i64) -> Option<f64> {
        Some(seconds as f64)
    }

    fn verifier() -> CredentialVerifier {
        CredentialVerifier::new(&SecretString::from(SECRET))
    }

    fn sign(alg: Algorithm, secret: &str, claims: &Value) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn session_claims(exp: i64) -> Value {
        json!({ "id": 7, "nome": "Ana", "iat": NOW - 60, "exp": exp })
    }

    #[test]
    fn accepts_valid_token() {
        let token = sign(Algorithm::HS256, SECRET, &session_claims(NOW + 3600));
        let claims = verifier().decode(&token, NOW).unwrap();
        assert_eq!(claims.exp, at(NOW + 3600));
        assert_eq!(claims.iat, at(NOW - 60));
        assert_eq!(claims.extra.get("nome"), Some(&json!("Ana")));
        assert!(verifier().verify(&token, NOW));
    }

    #[test]
    fn accepts_every_hmac_variant() {
        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let token = sign(alg, SECRET, &session_claims(NOW + 60));
            assert!(verifier().verify(&token, NOW), "{alg:?}");
        }
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = sign(Algorithm::HS256, "outro-segredo", &session_claims(NOW + 60));
        assert_eq!(
            verifier().decode(&token, NOW),
            Err(Error::InvalidSignature)
        );
        assert!(!verifier().verify(&token, NOW));
    }

    #[test]
    fn rejects_expired_token_at_boundary() {
        let token = sign(Algorithm::HS256, SECRET, &session_claims(NOW));
        assert_eq!(verifier().decode(&token, NOW), Err(Error::Expired));
        assert!(verifier().verify(&token, NOW - 1));
    }

    #[test]
    fn accepts_fractional_numeric_dates() {
        let claims = json!({ "id": 7, "iat": 1_700_000_000.25, "exp": 1_700_003_600.5 });
        let token = sign(Algorithm::HS256, SECRET, &claims);
        let decoded = verifier().decode(&token, NOW).unwrap();
        assert_eq!(decoded.exp, Some(1_700_003_600.5));
        assert_eq!(decoded.iat, Some(1_700_000_000.25));
    }

    #[test]
    fn fractional_expiry_keeps_boundary() {
        let claims = json!({ "sub": "7", "exp": 1_700_000_000.5 });
        let token = sign(Algorithm::HS256, SECRET, &claims);
        assert!(verifier().verify(&token, NOW));
        assert_eq!(verifier().decode(&token, NOW + 1), Err(Error::Expired));
    }

    #[test]
    fn fractional_not_before_is_honoured() {
        let claims = json!({ "sub": "7", "exp": NOW + 600, "nbf": 1_700_000_000.5 });
        let token = sign(Algorithm::HS256, SECRET, &claims);
        assert_eq!(verifier().decode(&token, NOW), Err(Error::NotYetValid));
        assert!(verifier().verify(&token, NOW + 1));
    }

    #[test]
    fn rejects_token_without_expiry() {
        let token = sign(Algorithm::HS256, SECRET, &json!({ "sub": "7" }));
        assert_eq!(verifier().decode(&token, NOW), Err(Error::MissingExpiry));
    }

    #[test]
    fn rejects_not_yet_valid_token() {
        let claims = json!({ "sub": "7", "exp": NOW + 600, "nbf": NOW + 60 });
        let token = sign(Algorithm::HS256, SECRET, &claims);
        assert_eq!(verifier().decode(&token, NOW), Err(Error::NotYetValid));
        assert!(verifier().verify(&token, NOW + 60));
    }

    #[test]
    fn ignores_audience_claim() {
        let claims = json!({ "sub": "7", "aud": "painel", "exp": NOW + 60 });
        let token = sign(Algorithm::HS256, SECRET, &claims);
        assert!(verifier().verify(&token, NOW));
    }

    #[test]
    fn malformed_input_is_false_not_panic() {
        for token in ["", " ", "garbage", "a.b", "a.b.c", "a.b.c.d", "...."] {
            assert!(!verifier().verify(token, NOW), "{token:?}");
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = sign(Algorithm::HS256, SECRET, &session_claims(NOW + 60));
        let forged = sign(Algorithm::HS256, SECRET, &session_claims(NOW + 999_999));
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];
        assert!(!verifier().verify(&parts.join("."), NOW));
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", verifier());
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn clock_is_after_epoch() {
        assert!(now_unix_seconds() > NOW);
    }
}
