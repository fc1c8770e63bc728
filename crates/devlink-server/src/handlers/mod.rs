pub mod auth;
pub mod posts;
pub mod profile;
pub mod users;

use devlink_core::{
  identity::Identity,
  store::{Document, DocumentStore},
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Error;

/// Body of a successful login or registration.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub token: String,
}

/// `{"msg": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Ack {
  pub msg: &'static str,
}

/// Parse a path id; a malformed id is reported exactly like a missing one.
pub(crate) fn parse_id(raw: &str, missing: Error) -> Result<Uuid, Error> {
  Uuid::parse_str(raw).map_err(|_| missing)
}

/// Fetch the caller's full identity record.
///
/// A valid token for an identity that has since been deleted no longer
/// authenticates anyone.
pub(crate) async fn caller_identity<S>(store: &S, id: Uuid) -> Result<Identity, Error>
where
  S: DocumentStore,
{
  store
    .find_identity_by_id(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::Unauthenticated)
}

/// Write back a mutated snapshot; losing the version race is a conflict.
pub(crate) async fn persist<S, D>(store: &S, doc: D) -> Result<D, Error>
where
  S: DocumentStore,
  D: Document,
{
  let key = doc.key();
  store
    .replace(doc)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| {
      tracing::warn!(%key, "stale snapshot, replace refused");
      Error::Conflict
    })
}
