//! Handlers for profile endpoints.
//!
//! | Method   | Path | Auth | Notes |
//! |----------|------|------|-------|
//! | `GET`    | `/me` | yes | Caller's profile, expanded |
//! | `POST`   | `/` | yes | Body: [`ProfileBody`]; create or partial update |
//! | `GET`    | `/` | no | Every profile, expanded |
//! | `GET`    | `/user/:user_id` | no | 400 on malformed id, 404 if absent |
//! | `DELETE` | `/` | yes | Removes the profile and then the identity |

use axum::{
  Json,
  extract::{Path, State},
};
use devconnect_core::{
  profile::{ExpandedProfile, Profile, ProfileFields, Social, parse_skills},
  store::ProfileStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
  AppState,
  auth::AuthUser,
  error::ApiError,
  validate::{ValidatedJson, non_empty, not_blank},
};

/// Parse a path segment as an id, rejecting anything that is not a UUID.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId(format!("{raw:?} is not a valid id")))
}

// ─── Get own ─────────────────────────────────────────────────────────────────

/// `GET /me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
) -> Result<Json<ExpandedProfile>, ApiError>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = state
    .store
    .get_profile(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("no profile for this user".into()))?;
  Ok(Json(profile))
}

// ─── Create or update ────────────────────────────────────────────────────────

/// JSON body accepted by `POST /`. `skills` is a comma-separated list.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileBody {
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub bio:            Option<String>,
  #[validate(
    required(message = "Status is required"),
    custom(function = "not_blank", message = "Status is required")
  )]
  pub status:         Option<String>,
  pub githubusername: Option<String>,
  #[validate(
    required(message = "Skills is required"),
    custom(function = "has_skills", message = "Skills is required")
  )]
  pub skills:         Option<String>,
  pub youtube:        Option<String>,
  pub twitter:        Option<String>,
  pub facebook:       Option<String>,
  pub linkedin:       Option<String>,
  pub instagram:      Option<String>,
}

/// At least one entry must survive [`parse_skills`].
fn has_skills(value: &str) -> Result<(), ValidationError> {
  if parse_skills(value).is_empty() {
    return Err(ValidationError::new("no_skills"));
  }
  Ok(())
}

impl From<ProfileBody> for ProfileFields {
  fn from(b: ProfileBody) -> Self {
    ProfileFields {
      company:        non_empty(b.company),
      website:        non_empty(b.website),
      location:       non_empty(b.location),
      bio:            non_empty(b.bio),
      status:         non_empty(b.status),
      githubusername: non_empty(b.githubusername),
      skills:         non_empty(b.skills).map(|s| parse_skills(&s)),
      social:         Social {
        youtube:   non_empty(b.youtube),
        twitter:   non_empty(b.twitter),
        facebook:  non_empty(b.facebook),
        linkedin:  non_empty(b.linkedin),
        instagram: non_empty(b.instagram),
      },
    }
  }
}

/// `POST /` — returns the stored profile (not expanded).
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  ValidatedJson(body): ValidatedJson<ProfileBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = state
    .store
    .upsert_profile(user_id, body.into())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("no identity for this user".into()))?;
  tracing::info!(%user_id, profile_id = %profile.profile_id, "profile saved");
  Ok(Json(profile))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ExpandedProfile>>, ApiError>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profiles = state.store.list_profiles().await.map_err(ApiError::store)?;
  Ok(Json(profiles))
}

// ─── Get by user ─────────────────────────────────────────────────────────────

/// `GET /user/:user_id`
pub async fn by_user<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<ExpandedProfile>, ApiError>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user_id = parse_id(&raw_id)?;
  let profile = state
    .store
    .get_profile(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no profile for user {user_id}")))?;
  Ok(Json(profile))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Removed {
  pub message: &'static str,
}

/// `DELETE /` — removes the caller's profile, then the caller's identity.
///
/// The two removals are separate store calls; a failure in the second
/// leaves the first in place.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
) -> Result<Json<Removed>, ApiError>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let had_profile = state.store.delete_profile(user_id).await.map_err(ApiError::store)?;
  let had_identity = state.store.delete_identity(user_id).await.map_err(ApiError::store)?;
  tracing::info!(%user_id, had_profile, had_identity, "user removed");
  Ok(Json(Removed { message: "user removed" }))
}
