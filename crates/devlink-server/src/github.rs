//! Outbound lookup of a user's public GitHub repositories.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Error;

const USER_AGENT: &str = "devlink-server";

/// Thin client for the GitHub REST API, authenticated with OAuth app
/// credentials when they are configured.
#[derive(Clone)]
pub struct GithubClient {
  http:          reqwest::Client,
  api_base:      String,
  client_id:     Option<String>,
  client_secret: Option<String>,
}

impl GithubClient {
  pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
    Self::with_base("https://api.github.com", client_id, client_secret)
  }

  /// Point the client at an alternative API root (GitHub Enterprise, tests).
  pub fn with_base(
    api_base: impl Into<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
  ) -> Self {
    Self {
      http: reqwest::Client::new(),
      api_base: api_base.into().trim_end_matches('/').to_owned(),
      client_id,
      client_secret,
    }
  }

  fn repos_url(&self, username: &str) -> String {
    format!("{}/users/{username}/repos", self.api_base)
  }

  fn query(&self) -> Vec<(&'static str, &str)> {
    let mut query = vec![("per_page", "5"), ("sort", "created"), ("direction", "asc")];
    if let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) {
      query.push(("client_id", id.as_str()));
      query.push(("client_secret", secret.as_str()));
    }
    query
  }

  /// The five most recently created public repositories of `username`.
  ///
  /// Any non-success answer from GitHub is reported as
  /// [`Error::NotFound`]; transport failures as [`Error::Internal`].
  pub async fn latest_repos(&self, username: &str) -> Result<Value, Error> {
    let response = self
      .http
      .get(self.repos_url(username))
      .query(&self.query())
      .header(reqwest::header::USER_AGENT, USER_AGENT)
      .send()
      .await
      .map_err(|e| Error::Internal(format!("github request failed: {e}")))?;

    if response.status() != StatusCode::OK {
      tracing::warn!(username, status = %response.status(), "github lookup failed");
      return Err(Error::NotFound("No github profile found"));
    }

    response
      .json::<Value>()
      .await
      .map_err(|e| Error::Internal(format!("github response unreadable: {e}")))
  }
}

/// A fake GitHub API on an ephemeral local port, in which only `octocat`
/// exists.
#[cfg(test)]
pub(crate) async fn spawn_stub() -> String {
  use std::collections::HashMap;

  use axum::{Json, Router, extract::Query, routing::get};
  use serde_json::json;

  let app = Router::new().route(
    "/users/octocat/repos",
    get(|Query(query): Query<HashMap<String, String>>| async move {
      Json(json!([{
        "name":      "hello-world",
        "per_page":  query.get("per_page"),
        "client_id": query.get("client_id"),
      }]))
    }),
  );
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let address = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  format!("http://{address}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn lists_repositories_of_a_known_user() {
    let base = spawn_stub().await;
    let client = GithubClient::with_base(base, Some("id".into()), Some("shh".into()));

    let repos = client.latest_repos("octocat").await.unwrap();
    assert_eq!(repos[0]["name"], "hello-world");
    assert_eq!(repos[0]["per_page"], "5");
    assert_eq!(repos[0]["client_id"], "id");
  }

  #[tokio::test]
  async fn unknown_user_is_not_found() {
    let base = spawn_stub().await;
    let client = GithubClient::with_base(base, None, None);

    let err = client.latest_repos("nobody").await.unwrap_err();
    assert!(matches!(err, Error::NotFound("No github profile found")));
  }

  #[test]
  fn builds_repos_url_against_base() {
    let client = GithubClient::with_base("http://localhost:9/", None, None);
    assert_eq!(client.repos_url("octocat"), "http://localhost:9/users/octocat/repos");
  }

  #[test]
  fn credentials_only_sent_when_both_present() {
    let anonymous = GithubClient::new(Some("id".into()), None);
    assert!(anonymous.query().iter().all(|(k, _)| !k.starts_with("client_")));

    let app = GithubClient::new(Some("id".into()), Some("shh".into()));
    let query = app.query();
    assert!(query.contains(&("client_id", "id")));
    assert!(query.contains(&("client_secret", "shh")));
  }
}
