//! Handlers for `/experience` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `PUT`    | `/experience` | Body: [`ExperienceBody`]; newest entry goes first |
//! | `DELETE` | `/experience/:exp_id` | 404 if the caller has no such entry |

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::NaiveDate;
use devconnect_core::{
  experience::{NewExperience, parse_date},
  profile::Profile,
  store::{ExperienceRemoval, ProfileStore},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
  AppState,
  auth::AuthUser,
  error::{ApiError, FieldError},
  profiles::parse_id,
  validate::{ValidatedJson, non_empty, not_blank},
};

// ─── Add ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /experience`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ExperienceBody {
  #[validate(
    required(message = "Title is required"),
    custom(function = "not_blank", message = "Title is required")
  )]
  pub title:       Option<String>,
  #[validate(
    required(message = "Company is required"),
    custom(function = "not_blank", message = "Company is required")
  )]
  pub company:     Option<String>,
  #[validate(
    required(message = "From date is required"),
    custom(function = "not_blank", message = "From date is required")
  )]
  pub from:        Option<String>,
  pub location:    Option<String>,
  pub to:          Option<String>,
  #[serde(default)]
  pub current:     bool,
  pub description: Option<String>,
}

impl TryFrom<ExperienceBody> for NewExperience {
  type Error = ApiError;

  fn try_from(b: ExperienceBody) -> Result<Self, ApiError> {
    let mut errors = Vec::new();
    let mut date = |field: &str, raw: Option<String>| -> Option<NaiveDate> {
      let raw = non_empty(raw)?;
      parse_date(&raw)
        .map_err(|e| {
          errors.push(FieldError { field: field.to_owned(), message: e.to_string() });
        })
        .ok()
    };
    let from = date("from", b.from);
    let to = date("to", b.to);

    // `from` is only `None` here if it failed to parse.
    let (Some(from), true) = (from, errors.is_empty()) else {
      return Err(ApiError::Validation(errors));
    };

    Ok(NewExperience {
      title: b.title.unwrap_or_default(),
      company: b.company.unwrap_or_default(),
      location: non_empty(b.location),
      from,
      to,
      current: b.current,
      description: non_empty(b.description),
    })
  }
}

/// `PUT /experience`
pub async fn add<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  ValidatedJson(body): ValidatedJson<ExperienceBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewExperience::try_from(body)?;
  let profile = state
    .store
    .add_experience(user_id, input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("no profile for this user".into()))?;
  tracing::debug!(%user_id, entries = profile.experience.len(), "experience added");
  Ok(Json(profile))
}

// ─── Remove ──────────────────────────────────────────────────────────────────

/// `DELETE /experience/:exp_id`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  Path(raw_id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let experience_id = parse_id(&raw_id)?;
  match state
    .store
    .remove_experience(user_id, experience_id)
    .await
    .map_err(ApiError::store)?
  {
    ExperienceRemoval::Removed(profile) => Ok(Json(profile)),
    ExperienceRemoval::ProfileMissing => {
      Err(ApiError::NotFound("no profile for this user".into()))
    }
    ExperienceRemoval::EntryMissing => {
      Err(ApiError::NotFound(format!("experience {experience_id} not found")))
    }
  }
}
