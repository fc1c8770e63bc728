//! Gravatar URLs derived from an account's email address.
//!
//! Uses Gravatar's SHA-256 addressing over the trimmed, lowercased email,
//! requesting a 200px, PG-rated image with the "mystery person" fallback.

use sha2::{Digest, Sha256};

pub fn gravatar_url(email: &str) -> String {
  let normalized = email.trim().to_lowercase();
  let digest = Sha256::digest(normalized.as_bytes());
  format!(
    "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
    hex::encode(digest)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_email_before_hashing() {
    assert_eq!(gravatar_url(" A@X.com "), gravatar_url("a@x.com"));
  }

  #[test]
  fn url_shape() {
    let url = gravatar_url("a@x.com");
    let hash = url
      .strip_prefix("https://www.gravatar.com/avatar/")
      .and_then(|rest| rest.strip_suffix("?s=200&r=pg&d=mm"))
      .unwrap();
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
  }
}
