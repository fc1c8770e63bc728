//! Identity — a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account as held by the store.
///
/// Carries the password hash, so it is never serialised to a client directly;
/// handlers convert it to [`PublicIdentity`] first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  pub id:            Uuid,
  pub name:          String,
  /// Unique across all identities; compared by exact match.
  pub email:         String,
  pub avatar:        String,
  /// argon2 PHC string.
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::DocumentStore::insert_identity`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:          String,
  pub email:         String,
  pub avatar:        String,
  pub password_hash: String,
}

/// The outbound view of an [`Identity`]; everything but the secret hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
  #[serde(rename = "_id")]
  pub id:     Uuid,
  pub name:   String,
  pub email:  String,
  pub avatar: String,
  #[serde(rename = "date")]
  pub created_at: DateTime<Utc>,
}

impl From<&Identity> for PublicIdentity {
  fn from(identity: &Identity) -> Self {
    Self {
      id:         identity.id,
      name:       identity.name.clone(),
      email:      identity.email.clone(),
      avatar:     identity.avatar.clone(),
      created_at: identity.created_at,
    }
  }
}

/// The `{_id, name, avatar}` projection embedded into populated profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
  #[serde(rename = "_id")]
  pub id:     Uuid,
  pub name:   String,
  pub avatar: String,
}

impl From<&Identity> for AuthorSummary {
  fn from(identity: &Identity) -> Self {
    Self {
      id:     identity.id,
      name:   identity.name.clone(),
      avatar: identity.avatar.clone(),
    }
  }
}
