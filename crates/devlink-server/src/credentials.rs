//! Password hashing and the credential check behind `POST /auth`.
//!
//! argon2 is deliberately expensive, so both hashing and verification run on
//! the blocking thread pool.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use devlink_core::{identity::Identity, store::DocumentStore};
use rand_core::OsRng;

use crate::error::Error;

/// Produce an argon2 PHC string for `password`.
pub async fn hash_password(password: String) -> Result<String, Error> {
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| Error::Internal(format!("argon2 error: {e}")))
  })
  .await
  .map_err(|e| Error::Internal(format!("hashing task failed: {e}")))?
}

/// `true` iff `password` matches the stored PHC string.
pub async fn verify_password(password: String, phc: String) -> Result<bool, Error> {
  tokio::task::spawn_blocking(move || {
    let Ok(parsed) = PasswordHash::new(&phc) else {
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
  .await
  .map_err(|e| Error::Internal(format!("verification task failed: {e}")))
}

/// Look up `email` and check `password` against its stored hash.
///
/// An unknown email and a wrong password both yield
/// [`Error::InvalidCredentials`] so callers cannot probe for accounts.
pub async fn verify_credentials<S>(
  store: &S,
  email: &str,
  password: String,
) -> Result<Identity, Error>
where
  S: DocumentStore,
{
  let identity = store
    .find_identity_by_email(email)
    .await
    .map_err(Error::store)?
    .ok_or(Error::InvalidCredentials)?;

  if verify_password(password, identity.password_hash.clone()).await? {
    Ok(identity)
  } else {
    Err(Error::InvalidCredentials)
  }
}

#[cfg(test)]
mod tests {
  use devlink_core::identity::NewIdentity;
  use devlink_store_sqlite::SqliteStore;

  use super::*;

  async fn store_with(email: &str, password: &str) -> SqliteStore {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .insert_identity(NewIdentity {
        name:          "Alice".into(),
        email:         email.into(),
        avatar:        String::new(),
        password_hash: hash_password(password.into()).await.unwrap(),
      })
      .await
      .unwrap()
      .unwrap();
    store
  }

  #[tokio::test]
  async fn hash_is_salted_and_verifiable() {
    let a = hash_password("secret1".into()).await.unwrap();
    let b = hash_password("secret1".into()).await.unwrap();
    assert_ne!(a, b);
    assert!(a.starts_with("$argon2"));
    assert!(verify_password("secret1".into(), a).await.unwrap());
  }

  #[tokio::test]
  async fn malformed_hash_never_verifies() {
    assert!(!verify_password("x".into(), "not-a-phc".into()).await.unwrap());
  }

  #[tokio::test]
  async fn correct_credentials() {
    let store = store_with("a@x.com", "secret1").await;
    let identity = verify_credentials(&store, "a@x.com", "secret1".into())
      .await
      .unwrap();
    assert_eq!(identity.email, "a@x.com");
  }

  #[tokio::test]
  async fn wrong_password_and_unknown_email_look_the_same() {
    let store = store_with("a@x.com", "secret1").await;

    let wrong = verify_credentials(&store, "a@x.com", "secret2".into()).await;
    let unknown = verify_credentials(&store, "b@x.com", "secret1".into()).await;

    assert!(matches!(wrong, Err(Error::InvalidCredentials)));
    assert!(matches!(unknown, Err(Error::InvalidCredentials)));
  }
}
