//! Handlers for `/posts` endpoints. Every route requires a token.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Newest first |
//! | `POST`   | `/posts` | Body: `{"text"}` |
//! | `GET`    | `/posts/:id` | 404 on missing or malformed id |
//! | `DELETE` | `/posts/:id` | Creator only |
//! | `PUT`    | `/posts/like/:id` | Returns the like list |
//! | `PUT`    | `/posts/unlike/:id` | Returns the like list |
//! | `POST`   | `/posts/comment/:id` | Body: `{"text"}`; returns the post |
//! | `DELETE` | `/posts/comment/:id/:comment_id` | Comment author only; returns the comment list |

use axum::{
  Json,
  extract::{Path, State},
};
use devlink_core::{
  guard,
  post::{Comment, Like, Post},
  store::DocumentStore,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  AppState,
  auth::AuthUser,
  error::Error,
  handlers::{Ack, caller_identity, parse_id, persist},
  validate::{Checks, JsonBody, Text},
};

const POST_NOT_FOUND: &str = "Post not found";

async fn fetch_post<S>(store: &S, raw_id: &str) -> Result<Post, Error>
where
  S: DocumentStore,
{
  let id = parse_id(raw_id, Error::NotFound(POST_NOT_FOUND))?;
  store
    .find_post_by_id(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound(POST_NOT_FOUND))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TextBody {
  pub text: Text,
}

fn required_text(body: TextBody) -> Result<String, Error> {
  let mut checks = Checks::new();
  let text = checks.required("text", body.text.into(), "Text is required");
  checks.finish()?;
  Ok(text)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /posts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  JsonBody(body): JsonBody<TextBody>,
) -> Result<Json<Post>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, "post requested");
  let text = required_text(body)?;
  let author = caller_identity(state.store.as_ref(), caller).await?;

  let post = state
    .store
    .insert_post(Post::new(&author, text))
    .await
    .map_err(Error::store)?;
  info!(%caller, post = %post.id, "post created");
  Ok(Json(post))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
) -> Result<Json<Vec<Post>>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, "all posts requested");
  let posts = state.store.list_posts().await.map_err(Error::store)?;
  Ok(Json(posts))
}

/// `GET /posts/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Post>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, post = %id, "post requested by id");
  let post = fetch_post(state.store.as_ref(), &id).await?;
  Ok(Json(post))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /posts/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Ack>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, post = %id, "post deletion requested");
  let post = fetch_post(state.store.as_ref(), &id).await?;

  if let Err(e) = guard::authorize(caller, &post) {
    warn!(%caller, post = %post.id, "post deletion refused");
    return Err(e.into());
  }

  state.store.delete_post(post.id).await.map_err(Error::store)?;
  info!(%caller, post = %post.id, "post deleted");
  Ok(Json(Ack { msg: "Removed" }))
}

// ─── Likes ────────────────────────────────────────────────────────────────────

/// `PUT /posts/like/:id`
pub async fn like<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, post = %id, "like requested");
  caller_identity(state.store.as_ref(), caller).await?;
  let mut post = fetch_post(state.store.as_ref(), &id).await?;
  post.like(caller)?;

  let post = persist(state.store.as_ref(), post).await?;
  info!(%caller, post = %post.id, "like added");
  Ok(Json(post.likes))
}

/// `PUT /posts/unlike/:id`
pub async fn unlike<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, post = %id, "unlike requested");
  caller_identity(state.store.as_ref(), caller).await?;
  let mut post = fetch_post(state.store.as_ref(), &id).await?;
  post.unlike(caller)?;

  let post = persist(state.store.as_ref(), post).await?;
  info!(%caller, post = %post.id, "like removed");
  Ok(Json(post.likes))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `POST /posts/comment/:id`
pub async fn comment<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<TextBody>,
) -> Result<Json<Post>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, post = %id, "comment requested");
  let text = required_text(body)?;
  let author = caller_identity(state.store.as_ref(), caller).await?;
  let mut post = fetch_post(state.store.as_ref(), &id).await?;

  post.add_comment(Comment::new(&author, text));
  let post = persist(state.store.as_ref(), post).await?;
  info!(%caller, post = %post.id, "comment added");
  Ok(Json(post))
}

/// `DELETE /posts/comment/:id/:comment_id`
pub async fn uncomment<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, post = %id, comment = %comment_id, "comment deletion requested");
  let mut post = fetch_post(state.store.as_ref(), &id).await?;
  let comment_id: Uuid =
    parse_id(&comment_id, Error::NotFound("Comment does not exist"))?;

  if let Err(e) = post.remove_comment(comment_id, caller) {
    warn!(%caller, post = %post.id, %comment_id, error = %e, "comment deletion refused");
    return Err(e.into());
  }

  let post = persist(state.store.as_ref(), post).await?;
  info!(%caller, post = %post.id, %comment_id, "comment deleted");
  Ok(Json(post.comments))
}
