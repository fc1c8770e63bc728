//! Request-field validation.
//!
//! [`Checks`] accumulates one [`FieldError`] per failing field so a client
//! sees every problem at once. Each check hands back a usable value even when
//! it fails (an empty string, the epoch date); callers must only use those
//! values after [`Checks::finish`] succeeded.

use axum::{
  body::Bytes,
  extract::{FromRequest, Request},
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Error;

// ─── Request bodies ───────────────────────────────────────────────────────────

/// JSON request body extractor whose failures are ordinary 400 validation
/// errors.
///
/// An absent or blank body reads as `{}`, so every required field is reported
/// by the handler's own [`Checks`]. The `Content-Type` header is not inspected.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

const MALFORMED_BODY: FieldError = FieldError {
  msg:   "Request body must be a JSON object",
  param: "body",
};

impl<S, T> FromRequest<S> for JsonBody<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = Error;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|_| Error::Validation(vec![MALFORMED_BODY]))?;

    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
      b"{}"
    } else {
      &bytes
    };
    serde_json::from_slice(raw)
      .map(JsonBody)
      .map_err(|_| Error::Validation(vec![MALFORMED_BODY]))
  }
}

/// A body field that only counts when the client sent a JSON string.
///
/// Any other JSON type reads as absent, so it fails the field's check instead
/// of the whole request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Text(Option<String>);

impl<'de> Deserialize<'de> for Text {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
      Value::String(s) => Text(Some(s)),
      _ => Text(None),
    })
  }
}

impl From<Text> for Option<String> {
  fn from(text: Text) -> Self { text.0 }
}

/// A boolean body field; anything but `true`/`false` reads as absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flag(Option<bool>);

impl Flag {
  pub fn unwrap_or(self, default: bool) -> bool { self.0.unwrap_or(default) }
}

impl<'de> Deserialize<'de> for Flag {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(Flag(Value::deserialize(deserializer)?.as_bool()))
  }
}

// ─── Field checks ─────────────────────────────────────────────────────────────

/// One failing field, serialised into the `errors` array of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub msg:   &'static str,
  pub param: &'static str,
}

#[derive(Debug, Default)]
pub struct Checks {
  errors: Vec<FieldError>,
}

/// Trimmed, non-empty value or `None`.
fn non_empty(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

fn looks_like_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && !s.chars().any(char::is_whitespace)
    && domain.contains('.')
    && domain.split('.').all(|label| !label.is_empty())
}

impl Checks {
  pub fn new() -> Self { Self::default() }

  fn fail(&mut self, param: &'static str, msg: &'static str) {
    self.errors.push(FieldError { msg, param });
  }

  /// The field must be present and non-blank.
  pub fn required(
    &mut self,
    param: &'static str,
    value: Option<String>,
    msg: &'static str,
  ) -> String {
    non_empty(value).unwrap_or_else(|| {
      self.fail(param, msg);
      String::new()
    })
  }

  /// The field must be present; its content is taken verbatim.
  pub fn present(
    &mut self,
    param: &'static str,
    value: Option<String>,
    msg: &'static str,
  ) -> String {
    value.unwrap_or_else(|| {
      self.fail(param, msg);
      String::new()
    })
  }

  /// The field must be a syntactically valid email address.
  pub fn email(
    &mut self,
    param: &'static str,
    value: Option<String>,
    msg: &'static str,
  ) -> String {
    match non_empty(value) {
      Some(v) if looks_like_email(&v) => v,
      _ => {
        self.fail(param, msg);
        String::new()
      }
    }
  }

  /// The field must hold at least `min` characters.
  pub fn min_len(
    &mut self,
    param: &'static str,
    value: Option<String>,
    min: usize,
    msg: &'static str,
  ) -> String {
    match value {
      Some(v) if v.chars().count() >= min => v,
      _ => {
        self.fail(param, msg);
        String::new()
      }
    }
  }

  /// The field must be a `YYYY-MM-DD` date.
  pub fn date(
    &mut self,
    param: &'static str,
    value: Option<String>,
    msg: &'static str,
  ) -> NaiveDate {
    match non_empty(value).and_then(|v| parse_date(&v)) {
      Some(d) => d,
      None => {
        self.fail(param, msg);
        NaiveDate::default()
      }
    }
  }

  /// Like [`Checks::date`], but an absent or blank field is fine.
  pub fn optional_date(
    &mut self,
    param: &'static str,
    value: Option<String>,
    msg: &'static str,
  ) -> Option<NaiveDate> {
    let raw = non_empty(value)?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
      self.fail(param, msg);
    }
    parsed
  }

  pub fn finish(self) -> Result<(), Error> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(self.errors))
    }
  }
}

/// Accepts a bare date or the date prefix of an RFC 3339 timestamp.
fn parse_date(s: &str) -> Option<NaiveDate> {
  let date_part = s.get(..10).unwrap_or(s);
  NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
