//! Signed session-token codec.
//!
//! A session token is a compact HS256 JWT carrying an opaque session id and an
//! expiration. Possessing a valid token is necessary but not sufficient for
//! authentication — the referenced session must still exist, unrevoked and
//! within its max age, on the server side. That second check is what makes
//! logout effective before the token's own expiry.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Session reference extracted from a validated token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub session_id: Uuid,
    pub exp: u64,
}

/// Errors returned by [`validate_session_token`].
///
/// Callers must collapse all variants into a single user-visible
/// "unauthenticated" outcome; the distinction exists for internal logging only.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("signing failed")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims payload shared by token issuance (auth service) and validation
/// (everything else).
///
/// # Feature gate
///
/// [`Deserialize`] is always available — all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature.
/// Only the auth service enables it because it is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct SessionClaims {
    /// Session ID (UUID string).
    pub sub: String,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Decode and validate a session token, returning the session reference.
///
/// Validation: HS256, exp checked, required claims `exp` + `sub`.
/// Default leeway = 60s — tolerates clock skew between services.
pub fn validate_session_token(token: &str, secret: &str) -> Result<TokenInfo, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let session_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;

    Ok(TokenInfo {
        session_id,
        exp: data.claims.exp,
    })
}

/// Sign a fresh session token expiring `ttl_secs` from now.
///
/// Returns the encoded token and its `exp` timestamp. Requires the
/// `USE_ONLY_IN_AUTH_SERVICE` feature — only the auth service mints tokens.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn issue_session_token(
    session_id: Uuid,
    secret: &str,
    ttl_secs: u64,
) -> Result<(String, u64), TokenError> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let exp = now_secs() + ttl_secs;
    let claims = SessionClaims {
        sub: session_id.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}

#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
fn now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}
