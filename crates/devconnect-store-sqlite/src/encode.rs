//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings and experience dates as
//! `YYYY-MM-DD`. Skills are stored as a compact JSON array. UUIDs are stored
//! as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use devconnect_core::{
  experience::{Experience, format_date, parse_date},
  identity::{Identity, IdentitySummary},
  profile::{ExpandedProfile, Profile, Social},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { format_date(d) }

pub fn decode_date(s: &str) -> Result<NaiveDate> { Ok(parse_date(s)?) }

// ─── Skills ──────────────────────────────────────────────────────────────────

pub fn encode_skills(skills: &[String]) -> Result<String> {
  Ok(serde_json::to_string(skills)?)
}

pub fn decode_skills(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from a `users` row.
pub struct RawIdentity {
  pub user_id:    String,
  pub name:       String,
  pub email:      String,
  pub avatar:     Option<String>,
  pub created_at: String,
}

impl RawIdentity {
  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      email:      self.email,
      avatar:     self.avatar,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from an `experiences` row.
pub struct RawExperience {
  pub experience_id: String,
  pub profile_id:    String,
  pub title:         String,
  pub company:       String,
  pub location:      Option<String>,
  pub from_date:     String,
  pub to_date:       Option<String>,
  pub current:       bool,
  pub description:   Option<String>,
}

impl RawExperience {
  pub fn into_experience(self) -> Result<Experience> {
    Ok(Experience {
      experience_id: decode_uuid(&self.experience_id)?,
      title:         self.title,
      company:       self.company,
      location:      self.location,
      from:          decode_date(&self.from_date)?,
      to:            self.to_date.as_deref().map(decode_date).transpose()?,
      current:       self.current,
      description:   self.description,
    })
  }
}

/// Raw strings read from a `profiles` row joined with its owner in `users`.
pub struct RawProfile {
  pub profile_id:     String,
  pub user_id:        String,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub bio:            Option<String>,
  pub status:         String,
  pub githubusername: Option<String>,
  pub skills:         String,
  pub youtube:        Option<String>,
  pub twitter:        Option<String>,
  pub facebook:       Option<String>,
  pub linkedin:       Option<String>,
  pub instagram:      Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
  // users columns
  pub user_name:      String,
  pub user_avatar:    Option<String>,
}

impl RawProfile {
  /// Decode into a profile carrying only the owner's id.
  pub fn into_profile(self, experience: Vec<RawExperience>) -> Result<Profile> {
    let expanded = self.into_expanded(experience)?;
    let user_id  = expanded.user_id();
    Ok(expanded.with_user(user_id))
  }

  /// Decode into a profile expanded with the owner's name and avatar.
  pub fn into_expanded(self, experience: Vec<RawExperience>) -> Result<ExpandedProfile> {
    let experience = experience
      .into_iter()
      .map(RawExperience::into_experience)
      .collect::<Result<Vec<_>>>()?;

    Ok(Profile {
      profile_id: decode_uuid(&self.profile_id)?,
      user: IdentitySummary {
        user_id: decode_uuid(&self.user_id)?,
        name:    self.user_name,
        avatar:  self.user_avatar,
      },
      company: self.company,
      website: self.website,
      location: self.location,
      bio: self.bio,
      status: self.status,
      githubusername: self.githubusername,
      skills: decode_skills(&self.skills)?,
      social: Social {
        youtube:   self.youtube,
        twitter:   self.twitter,
        facebook:  self.facebook,
        linkedin:  self.linkedin,
        instagram: self.instagram,
      },
      experience,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
