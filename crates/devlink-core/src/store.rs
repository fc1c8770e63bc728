//! The `DocumentStore` trait and the [`Document`] abstraction.
//!
//! The trait is implemented by storage backends (e.g. `devlink-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
  identity::{Identity, NewIdentity},
  post::Post,
  profile::Profile,
};

// ─── Documents ───────────────────────────────────────────────────────────────

/// The collection a [`Document`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
  Posts,
  Profiles,
}

/// A whole document that is read, mutated in memory, and written back with a
/// single [`DocumentStore::replace`].
pub trait Document:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  const COLLECTION: Collection;

  /// The document's primary key.
  fn key(&self) -> Uuid;

  /// The version this snapshot was read at.
  fn version(&self) -> u64;

  fn set_version(&mut self, version: u64);
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the devlink persistence engine.
///
/// Reads return `None` when nothing matches. Sub-collections are never patched
/// in place; callers replace the whole parent document.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identities ────────────────────────────────────────────────────────

  /// Persist a new identity. Returns `None` if the email is already taken.
  fn insert_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Look up an identity by exact email match.
  fn find_identity_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  fn find_identity_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Delete an identity together with its profile, atomically. Posts authored
  /// by the identity are left in place. Returns `false` if it did not exist.
  fn delete_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Persist a freshly built profile. Returns `None` if the owner already
  /// has one.
  fn insert_profile(
    &self,
    profile: Profile,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn find_profile_by_identity(
    &self,
    identity: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  fn insert_post(
    &self,
    post: Post,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn find_post_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// All posts, most recent first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Returns `false` if the post did not exist.
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Whole-document replace ────────────────────────────────────────────

  /// Atomically replace a stored document with `doc`.
  ///
  /// The write only happens if the stored version still equals
  /// `doc.version()`; on success the returned document carries the bumped
  /// version. Returns `None` if another writer got there first or the
  /// document no longer exists.
  fn replace<D: Document>(
    &self,
    doc: D,
  ) -> impl Future<Output = Result<Option<D>, Self::Error>> + Send + '_;
}
