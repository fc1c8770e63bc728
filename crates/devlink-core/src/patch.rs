//! [`ProfilePatch`] — a change-set accumulating only the fields a caller sent.
//!
//! Applying a patch to an existing profile overwrites exactly the fields that
//! are present; everything else keeps its stored value. The social block is
//! the exception: it is always replaced as a whole.

use crate::profile::{Profile, Social};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
  company:        Option<String>,
  website:        Option<String>,
  location:       Option<String>,
  bio:            Option<String>,
  status:         Option<String>,
  githubusername: Option<String>,
  skills:         Option<Vec<String>>,
  social:         Social,
}

/// Treat empty strings the same as absent fields.
fn present(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

impl ProfilePatch {
  pub fn new() -> Self { Self::default() }

  pub fn company(mut self, value: Option<String>) -> Self {
    self.company = present(value);
    self
  }

  pub fn website(mut self, value: Option<String>) -> Self {
    self.website = present(value);
    self
  }

  pub fn location(mut self, value: Option<String>) -> Self {
    self.location = present(value);
    self
  }

  pub fn bio(mut self, value: Option<String>) -> Self {
    self.bio = present(value);
    self
  }

  pub fn status(mut self, value: Option<String>) -> Self {
    self.status = present(value);
    self
  }

  pub fn githubusername(mut self, value: Option<String>) -> Self {
    self.githubusername = present(value);
    self
  }

  /// Accepts the comma-separated form sent by clients, e.g. `"rust, go"`.
  pub fn skills_csv(mut self, value: Option<String>) -> Self {
    self.skills = present(value).map(|csv| {
      csv
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
    });
    self
  }

  pub fn youtube(mut self, value: Option<String>) -> Self {
    self.social.youtube = present(value);
    self
  }

  pub fn twitter(mut self, value: Option<String>) -> Self {
    self.social.twitter = present(value);
    self
  }

  pub fn facebook(mut self, value: Option<String>) -> Self {
    self.social.facebook = present(value);
    self
  }

  pub fn linkedin(mut self, value: Option<String>) -> Self {
    self.social.linkedin = present(value);
    self
  }

  pub fn instagram(mut self, value: Option<String>) -> Self {
    self.social.instagram = present(value);
    self
  }

  /// Write the accumulated fields into `profile`.
  pub fn apply(self, profile: &mut Profile) {
    if let Some(v) = self.company {
      profile.company = Some(v);
    }
    if let Some(v) = self.website {
      profile.website = Some(v);
    }
    if let Some(v) = self.location {
      profile.location = Some(v);
    }
    if let Some(v) = self.bio {
      profile.bio = Some(v);
    }
    if let Some(v) = self.status {
      profile.status = v;
    }
    if let Some(v) = self.githubusername {
      profile.githubusername = Some(v);
    }
    if let Some(v) = self.skills {
      profile.skills = v;
    }
    profile.social = self.social;
  }
}
