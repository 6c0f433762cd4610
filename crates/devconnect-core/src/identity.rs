//! Identity — the registered user account a profile belongs to.
//!
//! Accounts are managed by the authentication module; this crate only reads
//! them for expansion and removes them when their profile is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  pub avatar:     Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input for creating an [`Identity`].
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:   String,
  pub email:  String,
  pub avatar: Option<String>,
}

/// The identity fields joined into an expanded profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySummary {
  pub user_id: Uuid,
  pub name:    String,
  pub avatar:  Option<String>,
}
