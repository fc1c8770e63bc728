//! Bearer-token issuance and verification, plus the [`AuthUser`] extractor.
//!
//! Tokens are HS256 JWTs carrying `{"user":{"id"}, "iat", "exp"}`. They are
//! verified statelessly: a token is valid iff its signature matches the
//! process-wide secret and `now < exp`. Every failure collapses into the same
//! [`Error::Unauthenticated`].

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::Error};
use devlink_core::store::DocumentStore;

/// Header carrying the raw token.
pub const TOKEN_HEADER: &str = "x-auth-token";

#[derive(Debug, Serialize, Deserialize)]
struct TokenUser {
  id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  user: TokenUser,
  iat:  i64,
  exp:  i64,
}

/// Signing material, loaded once at startup and shared read-only.
///
/// Intentionally not `Debug`: the secret must never reach a log line.
pub struct TokenKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      Duration,
}

impl TokenKeys {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      ttl,
    }
  }

  /// Sign a token for `identity`, valid from `now` for the configured TTL.
  pub fn issue(&self, identity: Uuid, now: DateTime<Utc>) -> Result<String, Error> {
    let claims = Claims {
      user: TokenUser { id: identity },
      iat:  now.timestamp(),
      exp:  (now + self.ttl).timestamp(),
    };
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|e| Error::Internal(format!("token signing failed: {e}")))
  }

  /// Resolve a token to the identity it was issued for, as seen at `now`.
  pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against the caller-supplied clock.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
      .map_err(|_| Error::Unauthenticated)?;

    if now.timestamp() >= data.claims.exp {
      return Err(Error::Unauthenticated);
    }
    Ok(data.claims.user.id)
  }
}

/// Pull the raw token out of `x-auth-token`, or `Authorization: Bearer`.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
  if let Some(token) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
    return Some(token.trim());
  }
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
}

/// The authenticated caller. Present in a handler means the token was valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: DocumentStore + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = token_from_headers(&parts.headers).ok_or(Error::Unauthenticated)?;
    let id = state.keys.verify(token, Utc::now())?;
    Ok(AuthUser(id))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn keys() -> TokenKeys {
    TokenKeys::new(b"test-secret", Duration::seconds(3600))
  }

  #[test]
  fn issued_token_resolves_to_same_identity() {
    let keys = keys();
    let id = Uuid::new_v4();
    let now = Utc::now();
    let token = keys.issue(id, now).unwrap();
    assert_eq!(keys.verify(&token, now).unwrap(), id);
  }

  #[test]
  fn token_expires_after_ttl() {
    let keys = keys();
    let issued = Utc::now();
    let token = keys.issue(Uuid::new_v4(), issued).unwrap();

    let just_before = issued + Duration::seconds(3599);
    assert!(keys.verify(&token, just_before).is_ok());

    let at_expiry = issued + Duration::seconds(3600);
    assert!(matches!(keys.verify(&token, at_expiry), Err(Error::Unauthenticated)));

    let later = issued + Duration::days(2);
    assert!(matches!(keys.verify(&token, later), Err(Error::Unauthenticated)));
  }

  #[test]
  fn token_from_another_secret_is_rejected() {
    let other = TokenKeys::new(b"other-secret", Duration::seconds(3600));
    let token = other.issue(Uuid::new_v4(), Utc::now()).unwrap();
    assert!(matches!(keys().verify(&token, Utc::now()), Err(Error::Unauthenticated)));
  }

  #[test]
  fn tampered_and_garbage_tokens_are_rejected() {
    let keys = keys();
    let token = keys.issue(Uuid::new_v4(), Utc::now()).unwrap();

    let (signed, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{signed}.{flipped}{}", &signature[1..]);

    for bad in [tampered.as_str(), "", "not-a-jwt", "a.b.c"] {
      assert!(
        matches!(keys.verify(bad, Utc::now()), Err(Error::Unauthenticated)),
        "accepted {bad:?}"
      );
    }
  }

  #[test]
  fn token_header_forms() {
    let mut headers = HeaderMap::new();
    assert_eq!(token_from_headers(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    assert_eq!(token_from_headers(&headers), Some("abc"));

    headers.insert(TOKEN_HEADER, HeaderValue::from_static("xyz"));
    assert_eq!(token_from_headers(&headers), Some("xyz"));

    let mut basic = HeaderMap::new();
    basic.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
    assert_eq!(token_from_headers(&basic), None);
  }
}
