//! Post — a top-level document with two embedded, ordered sub-collections.
//!
//! Both `likes` and `comments` are kept most-recent-first; new entries are
//! always inserted at the head. The author name and avatar are snapshots taken
//! when the post or comment was written and are not kept in sync afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  identity::Identity,
  store::{Collection, Document},
};

// ─── Sub-collection entries ──────────────────────────────────────────────────

/// One like; at most one per identity on any post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
  pub user: Uuid,
}

/// A comment on a post, owned by its own author rather than the post's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  #[serde(rename = "_id")]
  pub id:     Uuid,
  pub user:   Uuid,
  pub text:   String,
  pub name:   String,
  pub avatar: String,
  pub date:   DateTime<Utc>,
}

impl Comment {
  /// Build a fresh comment with a new sub-id, stamped now.
  pub fn new(author: &Identity, text: impl Into<String>) -> Self {
    Self {
      id:     Uuid::new_v4(),
      user:   author.id,
      text:   text.into(),
      name:   author.name.clone(),
      avatar: author.avatar.clone(),
      date:   Utc::now(),
    }
  }
}

// ─── Post ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  #[serde(rename = "_id")]
  pub id:       Uuid,
  /// The creator; immutable after creation.
  pub user:     Uuid,
  pub text:     String,
  pub name:     String,
  pub avatar:   String,
  pub likes:    Vec<Like>,
  pub comments: Vec<Comment>,
  pub date:     DateTime<Utc>,
  /// Optimistic-concurrency stamp, bumped by every successful replace.
  #[serde(rename = "__v", default)]
  pub version:  u64,
}

impl Post {
  /// A new, empty post authored by `author`.
  pub fn new(author: &Identity, text: impl Into<String>) -> Self {
    Self {
      id:       Uuid::new_v4(),
      user:     author.id,
      text:     text.into(),
      name:     author.name.clone(),
      avatar:   author.avatar.clone(),
      likes:    Vec::new(),
      comments: Vec::new(),
      date:     Utc::now(),
      version:  0,
    }
  }
}

impl Document for Post {
  const COLLECTION: Collection = Collection::Posts;

  fn key(&self) -> Uuid { self.id }

  fn version(&self) -> u64 { self.version }

  fn set_version(&mut self, version: u64) { self.version = version; }
}
