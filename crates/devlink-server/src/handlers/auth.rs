//! Handlers for `/auth`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/auth` | Token required; returns the caller without the password hash |
//! | `POST` | `/auth` | Body: `{"email","password"}`; returns `{"token"}` |

use axum::{Json, extract::State};
use chrono::Utc;
use devlink_core::{identity::PublicIdentity, store::DocumentStore};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
  AppState,
  auth::AuthUser,
  credentials::verify_credentials,
  error::Error,
  handlers::{TokenResponse, caller_identity},
  validate::{Checks, JsonBody, Text},
};

/// `GET /auth`
pub async fn current<S>(
  State(state): State<AppState<S>>,
  AuthUser(id): AuthUser,
) -> Result<Json<PublicIdentity>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%id, "identity requested");
  let identity = caller_identity(state.store.as_ref(), id).await?;
  Ok(Json(PublicIdentity::from(&identity)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginBody {
  pub email:    Text,
  pub password: Text,
}

/// `POST /auth`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<TokenResponse>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  let mut checks = Checks::new();
  let email =
    checks.email("email", body.email.into(), "Please include a valid email");
  let password =
    checks.present("password", body.password.into(), "Password is required");
  checks.finish()?;

  info!(%email, "login requested");
  let identity = match verify_credentials(state.store.as_ref(), &email, password).await {
    Ok(identity) => identity,
    Err(e) => {
      warn!(%email, "login rejected");
      return Err(e);
    }
  };

  let token = state.keys.issue(identity.id, Utc::now())?;
  info!(id = %identity.id, "token issued");
  Ok(Json(TokenResponse { token }))
}
