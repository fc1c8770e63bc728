//! HTTP API for the devlink social network.
//!
//! Exposes an axum [`Router`] serving registration, login, posts and
//! profiles under `/api`, backed by any [`DocumentStore`].

pub mod auth;
pub mod avatar;
pub mod credentials;
pub mod error;
pub mod github;
pub mod handlers;
pub mod validate;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use chrono::Duration;
use devlink_core::store::DocumentStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::TokenKeys;
use github::GithubClient;
use handlers::{auth as login, posts, profile, users};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }
fn default_token_ttl_secs() -> u32 { 3600 }

/// Runtime server configuration, deserialised from `config.toml` and
/// `DEVLINK_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// HS256 signing secret for issued tokens.
  pub jwt_secret:           String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs:       u32,
  #[serde(default)]
  pub github_client_id:     Option<String>,
  #[serde(default)]
  pub github_client_secret: Option<String>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: DocumentStore> {
  pub store:  Arc<S>,
  pub keys:   Arc<TokenKeys>,
  pub github: Arc<GithubClient>,
}

impl<S: DocumentStore> AppState<S> {
  pub fn new(store: S, config: &ServerConfig) -> Self {
    Self {
      store:  Arc::new(store),
      keys:   Arc::new(TokenKeys::new(
        config.jwt_secret.as_bytes(),
        Duration::seconds(i64::from(config.token_ttl_secs)),
      )),
      github: Arc::new(GithubClient::new(
        config.github_client_id.clone(),
        config.github_client_secret.clone(),
      )),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`], with every route under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DocumentStore + Clone + 'static,
{
  Router::new()
    .nest("/api", api_routes::<S>())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn api_routes<S>() -> Router<AppState<S>>
where
  S: DocumentStore + Clone + 'static,
{
  Router::new()
    .route("/users",                          post(users::register::<S>))
    .route("/auth",                           get(login::current::<S>).post(login::login::<S>))
    // posts
    .route("/posts",                          get(posts::list::<S>).post(posts::create::<S>))
    .route("/posts/{id}",                     get(posts::get_one::<S>).delete(posts::delete_one::<S>))
    .route("/posts/like/{id}",                put(posts::like::<S>))
    .route("/posts/unlike/{id}",              put(posts::unlike::<S>))
    .route("/posts/comment/{id}",             post(posts::comment::<S>))
    .route("/posts/comment/{id}/{comment_id}", delete(posts::uncomment::<S>))
    // profiles
    .route(
      "/profile",
      get(profile::list::<S>)
        .post(profile::upsert::<S>)
        .delete(profile::delete_account::<S>),
    )
    .route("/profile/me",                     get(profile::me::<S>))
    .route("/profile/user/{user_id}",         get(profile::by_user::<S>))
    .route("/profile/experience",             put(profile::add_experience::<S>))
    .route("/profile/experience/{exp_id}",    delete(profile::remove_experience::<S>))
    .route("/profile/education",              put(profile::add_education::<S>))
    .route("/profile/education/{edu_id}",     delete(profile::remove_education::<S>))
    .route("/profile/github/{username}",      get(profile::github_repos::<S>))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
