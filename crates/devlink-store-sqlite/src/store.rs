//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use devlink_core::{
  identity::{Identity, NewIdentity},
  post::Post,
  profile::Profile,
  store::{Document, DocumentStore},
};

use crate::{
  Result,
  encode::{
    RawDocument, RawIdentity, collection_table, encode_document, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A devlink document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_identity_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM identities WHERE {column} = ?1",
          RawIdentity::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawIdentity::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  /// Fetch one document body by an arbitrary indexed column.
  async fn find_document_where<D: Document>(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<D>> {
    let (table, _) = collection_table(D::COLLECTION);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT body, version FROM {table} WHERE {column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawDocument::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = crate::Error;

  // ── Identities ────────────────────────────────────────────────────────────

  async fn insert_identity(&self, input: NewIdentity) -> Result<Option<Identity>> {
    let identity = Identity {
      id:            Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      avatar:        input.avatar,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(identity.id);
    let at_str   = encode_dt(identity.created_at);
    let email    = identity.email.clone();
    let name     = identity.name.clone();
    let avatar   = identity.avatar.clone();
    let hash     = identity.password_hash.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO identities (identity_id, email, name, avatar, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(email) DO NOTHING",
          rusqlite::params![id_str, email, name, avatar, hash, at_str],
        )?)
      })
      .await?;

    Ok((inserted == 1).then_some(identity))
  }

  async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>> {
    self.find_identity_where("email", email.to_owned()).await
  }

  async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<Identity>> {
    self.find_identity_where("identity_id", encode_uuid(id)).await
  }

  async fn delete_identity(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM profiles WHERE identity_id = ?1",
          rusqlite::params![id_str],
        )?;
        let n = tx.execute(
          "DELETE FROM identities WHERE identity_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    Ok(deleted == 1)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn insert_profile(&self, mut profile: Profile) -> Result<Option<Profile>> {
    profile.set_version(0);

    let id_str       = encode_uuid(profile.id);
    let identity_str = encode_uuid(profile.user);
    let body         = encode_document(&profile)?;

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO profiles (profile_id, identity_id, version, body)
           VALUES (?1, ?2, 0, ?3)
           ON CONFLICT(identity_id) DO NOTHING",
          rusqlite::params![id_str, identity_str, body],
        )?)
      })
      .await?;

    Ok((inserted == 1).then_some(profile))
  }

  async fn find_profile_by_identity(&self, identity: Uuid) -> Result<Option<Profile>> {
    self
      .find_document_where("identity_id", encode_uuid(identity))
      .await
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawDocument> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT body, version FROM profiles")?;
        let rows = stmt
          .query_map([], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn insert_post(&self, mut post: Post) -> Result<Post> {
    post.set_version(0);

    let id_str       = encode_uuid(post.id);
    let identity_str = encode_uuid(post.user);
    let at_str       = encode_dt(post.date);
    let body         = encode_document(&post)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, identity_id, created_at, version, body)
           VALUES (?1, ?2, ?3, 0, ?4)",
          rusqlite::params![id_str, identity_str, at_str, body],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn find_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
    self.find_document_where("post_id", encode_uuid(id)).await
  }

  async fn list_posts(&self) -> Result<Vec<Post>> {
    let raws: Vec<RawDocument> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT body, version FROM posts ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn delete_post(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM posts WHERE post_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted == 1)
  }

  // ── Whole-document replace ────────────────────────────────────────────────

  async fn replace<D: Document>(&self, mut doc: D) -> Result<Option<D>> {
    let (table, key_col) = collection_table(D::COLLECTION);
    let expected = doc.version() as i64;
    doc.set_version(doc.version() + 1);

    let key_str  = encode_uuid(doc.key());
    let next     = doc.version() as i64;
    let body     = encode_document(&doc)?;

    let replaced = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "UPDATE {table} SET body = ?1, version = ?2
           WHERE {key_col} = ?3 AND version = ?4"
        );
        Ok(conn.execute(
          &sql,
          rusqlite::params![body, next, key_str, expected],
        )?)
      })
      .await?;

    Ok((replaced == 1).then_some(doc))
  }
}
