//! Handlers for `/profile` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profile` | Public; all profiles, owner populated |
//! | `POST`   | `/profile` | Create or update the caller's profile |
//! | `DELETE` | `/profile` | Delete the caller's profile and account |
//! | `GET`    | `/profile/me` | The caller's profile |
//! | `GET`    | `/profile/user/:user_id` | Public |
//! | `PUT`    | `/profile/experience` | Prepend an experience entry |
//! | `DELETE` | `/profile/experience/:exp_id` | |
//! | `PUT`    | `/profile/education` | Prepend an education entry |
//! | `DELETE` | `/profile/education/:edu_id` | |
//! | `GET`    | `/profile/github/:username` | Public; latest GitHub repositories |

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::{DateTime, Utc};
use devlink_core::{
  identity::AuthorSummary,
  patch::ProfilePatch,
  profile::{Education, Experience, NewEducation, NewExperience, Profile, Social},
  store::DocumentStore,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  AppState,
  auth::AuthUser,
  error::Error,
  handlers::{Ack, caller_identity, parse_id, persist},
  validate::{Checks, Flag, JsonBody, Text},
};

const NO_PROFILE: &str = "There is no profile for this user";

// ─── Populated view ───────────────────────────────────────────────────────────

/// A profile with its owner expanded to `{_id, name, avatar}`.
#[derive(Debug, Serialize)]
pub struct ProfileView {
  #[serde(rename = "_id")]
  pub id:             Uuid,
  /// `null` if the owning identity no longer exists.
  pub user:           Option<AuthorSummary>,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub status:         String,
  pub skills:         Vec<String>,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  pub social:         Social,
  pub experience:     Vec<Experience>,
  pub education:      Vec<Education>,
  pub date:           DateTime<Utc>,
}

impl ProfileView {
  fn new(profile: Profile, user: Option<AuthorSummary>) -> Self {
    Self {
      id: profile.id,
      user,
      company: profile.company,
      website: profile.website,
      location: profile.location,
      status: profile.status,
      skills: profile.skills,
      bio: profile.bio,
      githubusername: profile.githubusername,
      social: profile.social,
      experience: profile.experience,
      education: profile.education,
      date: profile.date,
    }
  }
}

async fn populate<S>(store: &S, profile: Profile) -> Result<ProfileView, Error>
where
  S: DocumentStore,
{
  let owner = store
    .find_identity_by_id(profile.user)
    .await
    .map_err(Error::store)?;
  Ok(ProfileView::new(profile, owner.as_ref().map(AuthorSummary::from)))
}

/// The caller's stored profile, or 400 if they have none yet.
async fn own_profile<S>(store: &S, caller: Uuid) -> Result<Profile, Error>
where
  S: DocumentStore,
{
  store
    .find_profile_by_identity(caller)
    .await
    .map_err(Error::store)?
    .ok_or(Error::BadRequest(NO_PROFILE))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /profile/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
) -> Result<Json<ProfileView>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, "own profile requested");
  let profile = own_profile(state.store.as_ref(), caller).await?;
  Ok(Json(populate(state.store.as_ref(), profile).await?))
}

/// `GET /profile`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ProfileView>>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!("all profiles requested");
  let profiles = state.store.list_profiles().await.map_err(Error::store)?;

  let mut views = Vec::with_capacity(profiles.len());
  for profile in profiles {
    views.push(populate(state.store.as_ref(), profile).await?);
  }
  Ok(Json(views))
}

/// `GET /profile/user/:user_id`
pub async fn by_user<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(user = %user_id, "profile requested by user id");
  let user_id = parse_id(&user_id, Error::BadRequest("Profile not found"))?;
  let profile = state
    .store
    .find_profile_by_identity(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::BadRequest(NO_PROFILE))?;
  Ok(Json(populate(state.store.as_ref(), profile).await?))
}

// ─── Create / update ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileBody {
  pub company:        Text,
  pub website:        Text,
  pub location:       Text,
  pub bio:            Text,
  pub status:         Text,
  pub githubusername: Text,
  /// Comma-separated, e.g. `"rust, go"`.
  pub skills:         Text,
  pub youtube:        Text,
  pub twitter:        Text,
  pub facebook:       Text,
  pub linkedin:       Text,
  pub instagram:      Text,
}

/// `POST /profile`: create the caller's profile, or update it in place.
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  JsonBody(body): JsonBody<ProfileBody>,
) -> Result<Json<Profile>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, "profile upsert requested");
  let mut checks = Checks::new();
  let status =
    checks.required("status", body.status.into(), "Status is required");
  let skills =
    checks.required("skills", body.skills.into(), "Skills is required");
  checks.finish()?;

  let patch = ProfilePatch::new()
    .company(body.company.into())
    .website(body.website.into())
    .location(body.location.into())
    .bio(body.bio.into())
    .status(Some(status))
    .githubusername(body.githubusername.into())
    .skills_csv(Some(skills))
    .youtube(body.youtube.into())
    .twitter(body.twitter.into())
    .facebook(body.facebook.into())
    .linkedin(body.linkedin.into())
    .instagram(body.instagram.into());

  let store = state.store.as_ref();
  let existing = store
    .find_profile_by_identity(caller)
    .await
    .map_err(Error::store)?;

  let profile = match existing {
    Some(mut profile) => {
      patch.apply(&mut profile);
      let profile = persist(store, profile).await?;
      info!(%caller, "profile updated");
      profile
    }
    None => {
      caller_identity(store, caller).await?;
      let mut profile = Profile::new(caller);
      patch.apply(&mut profile);
      let profile = store
        .insert_profile(profile)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| {
          warn!(%caller, "profile created concurrently, insert refused");
          Error::Conflict
        })?;
      info!(%caller, "profile created");
      profile
    }
  };
  Ok(Json(profile))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /profile`: removes the profile and the account. Posts remain.
pub async fn delete_account<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
) -> Result<Json<Ack>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, "account deletion requested");
  state
    .store
    .delete_identity(caller)
    .await
    .map_err(Error::store)?;
  info!(%caller, "profile and user deleted");
  Ok(Json(Ack { msg: "User deleted" }))
}

// ─── Experience ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceBody {
  pub title:       Text,
  pub company:     Text,
  pub location:    Text,
  pub from:        Text,
  pub to:          Text,
  pub current:     Flag,
  pub description: Text,
}

impl ExperienceBody {
  fn validate(self) -> Result<NewExperience, Error> {
    let mut checks = Checks::new();
    let title = checks.required("title", self.title.into(), "Title is required");
    let company =
      checks.required("company", self.company.into(), "Company is required");
    let from = checks.date("from", self.from.into(), "From date is required");
    let to = checks.optional_date("to", self.to.into(), "To date is invalid");
    checks.finish()?;

    Ok(NewExperience {
      title,
      company,
      location: self.location.into(),
      from,
      to,
      current: self.current.unwrap_or(false),
      description: self.description.into(),
    })
  }
}

/// `PUT /profile/experience`
pub async fn add_experience<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  JsonBody(body): JsonBody<ExperienceBody>,
) -> Result<Json<Profile>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, "experience addition requested");
  let entry = body.validate()?;
  let mut profile = own_profile(state.store.as_ref(), caller).await?;

  let id = profile.add_experience(entry).id;
  let profile = persist(state.store.as_ref(), profile).await?;
  info!(%caller, experience = %id, "experience saved");
  Ok(Json(profile))
}

/// `DELETE /profile/experience/:exp_id`
pub async fn remove_experience<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path(exp_id): Path<String>,
) -> Result<Json<Profile>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, experience = %exp_id, "experience deletion requested");
  let exp_id = parse_id(&exp_id, Error::NotFound("Experience not found"))?;
  let mut profile = own_profile(state.store.as_ref(), caller).await?;

  profile.remove_experience(exp_id)?;
  let profile = persist(state.store.as_ref(), profile).await?;
  info!(%caller, experience = %exp_id, "experience deleted");
  Ok(Json(profile))
}

// ─── Education ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EducationBody {
  pub school:       Text,
  pub degree:       Text,
  pub fieldofstudy: Text,
  pub from:         Text,
  pub to:           Text,
  pub current:      Flag,
  pub description:  Text,
}

impl EducationBody {
  fn validate(self) -> Result<NewEducation, Error> {
    let mut checks = Checks::new();
    let school =
      checks.required("school", self.school.into(), "School is required");
    let degree =
      checks.required("degree", self.degree.into(), "Degree is required");
    let fieldofstudy = checks.required(
      "fieldofstudy",
      self.fieldofstudy.into(),
      "Field of study is required",
    );
    let from = checks.date("from", self.from.into(), "From date is required");
    let to = checks.optional_date("to", self.to.into(), "To date is invalid");
    checks.finish()?;

    Ok(NewEducation {
      school,
      degree,
      fieldofstudy,
      from,
      to,
      current: self.current.unwrap_or(false),
      description: self.description.into(),
    })
  }
}

/// `PUT /profile/education`
pub async fn add_education<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  JsonBody(body): JsonBody<EducationBody>,
) -> Result<Json<Profile>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, "education addition requested");
  let entry = body.validate()?;
  let mut profile = own_profile(state.store.as_ref(), caller).await?;

  let id = profile.add_education(entry).id;
  let profile = persist(state.store.as_ref(), profile).await?;
  info!(%caller, education = %id, "education saved");
  Ok(Json(profile))
}

/// `DELETE /profile/education/:edu_id`
pub async fn remove_education<S>(
  State(state): State<AppState<S>>,
  AuthUser(caller): AuthUser,
  Path(edu_id): Path<String>,
) -> Result<Json<Profile>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%caller, education = %edu_id, "education deletion requested");
  let edu_id = parse_id(&edu_id, Error::NotFound("Education not found"))?;
  let mut profile = own_profile(state.store.as_ref(), caller).await?;

  profile.remove_education(edu_id)?;
  let profile = persist(state.store.as_ref(), profile).await?;
  info!(%caller, education = %edu_id, "education deleted");
  Ok(Json(profile))
}

// ─── GitHub ───────────────────────────────────────────────────────────────────

/// `GET /profile/github/:username`
pub async fn github_repos<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
) -> Result<Json<Value>, Error>
where
  S: DocumentStore + Clone + 'static,
{
  info!(%username, "github repositories requested");
  let repos = state.github.latest_repos(&username).await?;
  Ok(Json(repos))
}
