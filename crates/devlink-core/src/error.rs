//! Error types for `devlink-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("post {0} is already liked by this identity")]
  AlreadyLiked(Uuid),

  #[error("post {0} has not been liked by this identity")]
  NotLiked(Uuid),

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("experience entry not found: {0}")]
  ExperienceNotFound(Uuid),

  #[error("education entry not found: {0}")]
  EducationNotFound(Uuid),

  /// The caller is authenticated but does not own the target resource.
  #[error("identity {caller} may not modify a resource owned by {owner}")]
  Forbidden { caller: Uuid, owner: Uuid },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
