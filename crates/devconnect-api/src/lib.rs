//! JSON REST API for developer profiles.
//!
//! Exposes an axum [`Router`] backed by any
//! [`devconnect_core::store::ProfileStore`]. Private routes require a bearer
//! JWT issued by [`auth::TokenKeys`]; TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/profile", devconnect_api::profile_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod experience;
pub mod profiles;
pub mod validate;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, put},
};
use devconnect_core::store::ProfileStore;

pub use error::ApiError;

use auth::TokenKeys;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ProfileStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenKeys>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised profile router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn profile_router<S>(state: AppState<S>) -> Router<()>
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Profiles
    .route(
      "/",
      get(profiles::list::<S>)
        .post(profiles::upsert::<S>)
        .delete(profiles::delete::<S>),
    )
    .route("/me", get(profiles::me::<S>))
    .route("/user/{user_id}", get(profiles::by_user::<S>))
    // Experience
    .route("/experience", put(experience::add::<S>))
    .route("/experience/{exp_id}", delete(experience::remove::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
