//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond precision
//! so that they sort lexically. Documents are stored as compact JSON. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use devlink_core::{identity::Identity, store::{Collection, Document}};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Collections ─────────────────────────────────────────────────────────────

/// Table and primary-key column backing a [`Collection`].
pub fn collection_table(c: Collection) -> (&'static str, &'static str) {
  match c {
    Collection::Posts => ("posts", "post_id"),
    Collection::Profiles => ("profiles", "profile_id"),
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub fn encode_document<D: Document>(doc: &D) -> Result<String> {
  Ok(serde_json::to_string(doc)?)
}

/// Decode a document body; the `version` column is authoritative over any
/// stamp embedded in the JSON.
pub fn decode_document<D: Document>(body: &str, version: i64) -> Result<D> {
  let mut doc: D = serde_json::from_str(body)?;
  doc.set_version(version as u64);
  Ok(doc)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id:   String,
  pub email:         String,
  pub name:          String,
  pub avatar:        String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawIdentity {
  pub const COLUMNS: &'static str =
    "identity_id, email, name, avatar, password_hash, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawIdentity {
      identity_id:   row.get(0)?,
      email:         row.get(1)?,
      name:          row.get(2)?,
      avatar:        row.get(3)?,
      password_hash: row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      id:            decode_uuid(&self.identity_id)?,
      name:          self.name,
      email:         self.email,
      avatar:        self.avatar,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// A document body with its version column.
pub struct RawDocument {
  pub body:    String,
  pub version: i64,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawDocument { body: row.get(0)?, version: row.get(1)? })
  }

  pub fn into_document<D: Document>(self) -> Result<D> {
    decode_document(&self.body, self.version)
  }
}
