//! Profile — the public developer profile owned by exactly one identity.
//!
//! A profile is stored with a bare identity reference. Read paths that show
//! the owner's name and avatar return an [`ExpandedProfile`] instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{experience::Experience, identity::IdentitySummary};

/// Links to the owner's social accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
  pub youtube:   Option<String>,
  pub twitter:   Option<String>,
  pub facebook:  Option<String>,
  pub linkedin:  Option<String>,
  pub instagram: Option<String>,
}

/// A stored profile. `U` is the identity reference: a bare id by default,
/// or an [`IdentitySummary`] once expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile<U = Uuid> {
  pub profile_id:     Uuid,
  pub user:           U,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub bio:            Option<String>,
  pub status:         String,
  pub githubusername: Option<String>,
  pub skills:         Vec<String>,
  pub social:         Social,
  /// Most recent first.
  pub experience:     Vec<Experience>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

/// A profile joined with its owner's display fields.
pub type ExpandedProfile = Profile<IdentitySummary>;

impl<U> Profile<U> {
  /// Replace the identity reference, keeping every other field.
  pub fn with_user<V>(self, user: V) -> Profile<V> {
    Profile {
      profile_id: self.profile_id,
      user,
      company: self.company,
      website: self.website,
      location: self.location,
      bio: self.bio,
      status: self.status,
      githubusername: self.githubusername,
      skills: self.skills,
      social: self.social,
      experience: self.experience,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

impl ExpandedProfile {
  pub fn user_id(&self) -> Uuid { self.user.user_id }
}

/// A sparse update document for create-or-update.
///
/// `None` means "leave unchanged" on update and "omit" on create.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub bio:            Option<String>,
  pub status:         Option<String>,
  pub githubusername: Option<String>,
  pub skills:         Option<Vec<String>>,
  pub social:         Social,
}

/// Split a comma-separated skills string into trimmed entries, preserving
/// order. Entries that are empty after trimming are dropped.
pub fn parse_skills(input: &str) -> Vec<String> {
  input
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}
