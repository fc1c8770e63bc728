//! Profile — the one-per-identity developer profile.
//!
//! Besides scalar attributes a profile embeds two ordered sub-collections,
//! `experience` and `education`, kept most-recent-first. Every entry carries
//! its own sub-id, which is the only handle used to remove it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Collection, Document};

// ─── Social links ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub youtube:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub twitter:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub facebook:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub linkedin:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
}

// ─── Experience ──────────────────────────────────────────────────────────────

/// A work-experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  #[serde(rename = "_id")]
  pub id:          Uuid,
  pub title:       String,
  pub company:     String,
  pub location:    Option<String>,
  pub from:        NaiveDate,
  pub to:          Option<NaiveDate>,
  #[serde(default)]
  pub current:     bool,
  pub description: Option<String>,
}

/// Caller-supplied fields of an [`Experience`]; the sub-id is assigned on
/// insertion.
#[derive(Debug, Clone)]
pub struct NewExperience {
  pub title:       String,
  pub company:     String,
  pub location:    Option<String>,
  pub from:        NaiveDate,
  pub to:          Option<NaiveDate>,
  pub current:     bool,
  pub description: Option<String>,
}

impl NewExperience {
  pub(crate) fn into_entry(self) -> Experience {
    Experience {
      id:          Uuid::new_v4(),
      title:       self.title,
      company:     self.company,
      location:    self.location,
      from:        self.from,
      to:          self.to,
      current:     self.current,
      description: self.description,
    }
  }
}

// ─── Education ───────────────────────────────────────────────────────────────

/// An education entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  #[serde(rename = "_id")]
  pub id:           Uuid,
  pub school:       String,
  pub degree:       String,
  pub fieldofstudy: String,
  pub from:         NaiveDate,
  pub to:           Option<NaiveDate>,
  #[serde(default)]
  pub current:      bool,
  pub description:  Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEducation {
  pub school:       String,
  pub degree:       String,
  pub fieldofstudy: String,
  pub from:         NaiveDate,
  pub to:           Option<NaiveDate>,
  pub current:      bool,
  pub description:  Option<String>,
}

impl NewEducation {
  pub(crate) fn into_entry(self) -> Education {
    Education {
      id:           Uuid::new_v4(),
      school:       self.school,
      degree:       self.degree,
      fieldofstudy: self.fieldofstudy,
      from:         self.from,
      to:           self.to,
      current:      self.current,
      description:  self.description,
    }
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  #[serde(rename = "_id")]
  pub id:             Uuid,
  /// The owning identity; unique across profiles.
  pub user:           Uuid,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub status:         String,
  pub skills:         Vec<String>,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  #[serde(default)]
  pub social:         Social,
  #[serde(default)]
  pub experience:     Vec<Experience>,
  #[serde(default)]
  pub education:      Vec<Education>,
  pub date:           DateTime<Utc>,
  #[serde(rename = "__v", default)]
  pub version:        u64,
}

impl Profile {
  /// An empty profile for `user`. Callers fill it through
  /// [`ProfilePatch::apply`](crate::patch::ProfilePatch::apply).
  pub fn new(user: Uuid) -> Self {
    Self {
      id:             Uuid::new_v4(),
      user,
      company:        None,
      website:        None,
      location:       None,
      status:         String::new(),
      skills:         Vec::new(),
      bio:            None,
      githubusername: None,
      social:         Social::default(),
      experience:     Vec::new(),
      education:      Vec::new(),
      date:           Utc::now(),
      version:        0,
    }
  }
}

impl Document for Profile {
  const COLLECTION: Collection = Collection::Profiles;

  fn key(&self) -> Uuid { self.id }

  fn version(&self) -> u64 { self.version }

  fn set_version(&mut self, version: u64) { self.version = version; }
}
