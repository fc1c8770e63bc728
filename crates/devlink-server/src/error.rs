//! Error types and axum `IntoResponse` implementation.
//!
//! Every variant maps to a fixed status code and a JSON body. Authentication
//! failures never say why they failed, and server-side failures are logged in
//! full but returned to the client only as `Server error`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::validate::FieldError;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing or malformed request fields.
  #[error("validation failed: {0:?}")]
  Validation(Vec<FieldError>),

  /// Unknown email or wrong password; deliberately indistinguishable.
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("user already exists")]
  AlreadyExists,

  /// Absent, malformed, forged, or expired token.
  #[error("unauthenticated")]
  Unauthenticated,

  /// Authenticated, but not the owner of the target resource.
  #[error("forbidden")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(&'static str),

  #[error("bad request: {0}")]
  BadRequest(&'static str),

  /// The document changed between fetch and replace.
  #[error("concurrent modification")]
  Conflict,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl Error {
  /// Box a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

#[derive(Serialize)]
struct Message<'a> {
  msg: &'a str,
}

fn errors_body(msg: &str) -> serde_json::Value {
  json!({ "errors": [{ "msg": msg }] })
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Validation(errors) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
      }
      Error::InvalidCredentials => {
        (StatusCode::BAD_REQUEST, Json(errors_body("Invalid credentials")))
          .into_response()
      }
      Error::AlreadyExists => {
        (StatusCode::BAD_REQUEST, Json(errors_body("User already exists")))
          .into_response()
      }
      Error::Unauthenticated => (
        StatusCode::UNAUTHORIZED,
        Json(Message { msg: "Token is not valid" }),
      )
        .into_response(),
      Error::Forbidden => (
        StatusCode::UNAUTHORIZED,
        Json(Message { msg: "User not authorized" }),
      )
        .into_response(),
      Error::NotFound(msg) => {
        (StatusCode::NOT_FOUND, Json(Message { msg })).into_response()
      }
      Error::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(Message { msg })).into_response()
      }
      Error::Conflict => (
        StatusCode::CONFLICT,
        Json(Message { msg: "Document was modified concurrently, retry" }),
      )
        .into_response(),
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
      }
      Error::Internal(e) => {
        tracing::error!(error = %e, "internal failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
      }
    }
  }
}

impl From<devlink_core::Error> for Error {
  fn from(e: devlink_core::Error) -> Self {
    use devlink_core::Error as Core;
    match e {
      Core::AlreadyLiked(_) => Error::BadRequest("Post already liked"),
      Core::NotLiked(_) => Error::BadRequest("Post has not yet been liked"),
      Core::CommentNotFound(_) => Error::NotFound("Comment does not exist"),
      Core::ExperienceNotFound(_) => Error::NotFound("Experience not found"),
      Core::EducationNotFound(_) => Error::NotFound("Education not found"),
      Core::Forbidden { .. } => Error::Forbidden,
    }
  }
}
