//! Handler for `POST /users` — registration.

use axum::{Json, extract::State};
use chrono::Utc;
use devlink_core::{identity::NewIdentity, store::DocumentStore};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
  AppState,
  avatar::gravatar_url,
  credentials::hash_password,
  error::Error,
  handlers::TokenResponse,
  validate::{Checks, JsonBody, Text},
};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterBody {
  pub name:     Text,
  pub email:    Text,
  pub password: Text,
}

/// `POST /users`, returning `{"token"}` for the new identity.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<RegisterBody>,
) -> Result<Json<TokenResponse>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  let mut checks = Checks::new();
  let name = checks.required("name", body.name.into(), "Name is required");
  let email =
    checks.email("email", body.email.into(), "Please include a valid email");
  let password = checks.min_len(
    "password",
    body.password.into(),
    MIN_PASSWORD_LEN,
    "Please enter a password with 6 or more characters",
  );
  checks.finish()?;

  let existing = state
    .store
    .find_identity_by_email(&email)
    .await
    .map_err(Error::store)?;
  if existing.is_some() {
    warn!(%email, "user already exists");
    return Err(Error::AlreadyExists);
  }

  let new_identity = NewIdentity {
    name,
    avatar: gravatar_url(&email),
    password_hash: hash_password(password).await?,
    email,
  };

  // The unique email index still guards the gap since the lookup above.
  let identity = state
    .store
    .insert_identity(new_identity)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AlreadyExists)?;
  info!(id = %identity.id, email = %identity.email, "user created");

  let token = state.keys.issue(identity.id, Utc::now())?;
  Ok(Json(TokenResponse { token }))
}
