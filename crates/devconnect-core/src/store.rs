//! The `ProfileStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `devconnect-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  experience::NewExperience,
  identity::{Identity, NewIdentity},
  profile::{ExpandedProfile, Profile, ProfileFields},
};

/// Outcome of [`ProfileStore::remove_experience`].
#[derive(Debug, Clone)]
pub enum ExperienceRemoval {
  Removed(Profile),
  /// The identity has no profile.
  ProfileMissing,
  /// The profile has no entry with the requested id.
  EntryMissing,
}

/// Abstraction over a profile store backend.
///
/// Every mutating method is atomic with respect to other calls on the same
/// store: implementations must not expose a half-applied update, and
/// concurrent additions to one profile's experience list must all survive.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identities ────────────────────────────────────────────────────────

  /// Create and persist a new identity.
  fn add_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Retrieve an identity by id. Returns `None` if not found.
  fn get_identity(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Remove an identity. Returns `false` if it did not exist.
  fn delete_identity(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Retrieve the expanded profile owned by `user_id`.
  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<ExpandedProfile>, Self::Error>> + Send + '_;

  /// List every profile, expanded, in insertion order.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<ExpandedProfile>, Self::Error>> + Send + '_;

  /// Apply `fields` to the profile owned by `user_id`, creating it if absent.
  ///
  /// Only the `Some` fields are written. Returns `None` if the identity
  /// does not exist. Creating a profile without a status is an error.
  fn upsert_profile(
    &self,
    user_id: Uuid,
    fields: ProfileFields,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Remove the profile owned by `user_id` along with its experience.
  /// Returns `false` if there was none.
  fn delete_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Experience ────────────────────────────────────────────────────────

  /// Insert an entry at the front of the profile's experience list.
  /// Returns `None` if the identity has no profile.
  fn add_experience(
    &self,
    user_id: Uuid,
    input: NewExperience,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Remove the entry with `experience_id` from the profile's list.
  fn remove_experience(
    &self,
    user_id: Uuid,
    experience_id: Uuid,
  ) -> impl Future<Output = Result<ExperienceRemoval, Self::Error>> + Send + '_;
}
