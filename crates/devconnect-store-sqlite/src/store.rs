//! [`SqliteStore`] — the SQLite implementation of [`ProfileStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use devconnect_core::{
  experience::NewExperience,
  identity::{Identity, NewIdentity},
  profile::{ExpandedProfile, Profile, ProfileFields},
  store::{ExperienceRemoval, ProfileStore},
};

use crate::{
  encode::{
    RawExperience, RawIdentity, RawProfile, encode_date, encode_dt, encode_skills,
    encode_uuid,
  },
  schema::SCHEMA,
  Result,
};

// ─── Queries ─────────────────────────────────────────────────────────────────

const PROFILE_SELECT: &str = "
  SELECT
    p.profile_id, p.user_id, p.company, p.website, p.location, p.bio,
    p.status, p.githubusername, p.skills,
    p.youtube, p.twitter, p.facebook, p.linkedin, p.instagram,
    p.created_at, p.updated_at,
    u.name, u.avatar
  FROM profiles p
  JOIN users u ON u.user_id = p.user_id";

const EXPERIENCE_SELECT: &str = "
  SELECT
    experience_id, profile_id, title, company, location,
    from_date, to_date, current, description
  FROM experiences";

fn raw_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    profile_id:     row.get(0)?,
    user_id:        row.get(1)?,
    company:        row.get(2)?,
    website:        row.get(3)?,
    location:       row.get(4)?,
    bio:            row.get(5)?,
    status:         row.get(6)?,
    githubusername: row.get(7)?,
    skills:         row.get(8)?,
    youtube:        row.get(9)?,
    twitter:        row.get(10)?,
    facebook:       row.get(11)?,
    linkedin:       row.get(12)?,
    instagram:      row.get(13)?,
    created_at:     row.get(14)?,
    updated_at:     row.get(15)?,
    user_name:      row.get(16)?,
    user_avatar:    row.get(17)?,
  })
}

fn raw_experience(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawExperience> {
  Ok(RawExperience {
    experience_id: row.get(0)?,
    profile_id:    row.get(1)?,
    title:         row.get(2)?,
    company:       row.get(3)?,
    location:      row.get(4)?,
    from_date:     row.get(5)?,
    to_date:       row.get(6)?,
    current:       row.get(7)?,
    description:   row.get(8)?,
  })
}

/// Load one profile row and its experience, newest entry first.
fn load_profile(
  conn:    &rusqlite::Connection,
  user_id: &str,
) -> rusqlite::Result<Option<(RawProfile, Vec<RawExperience>)>> {
  let profile = conn
    .query_row(
      &format!("{PROFILE_SELECT} WHERE p.user_id = ?1"),
      rusqlite::params![user_id],
      raw_profile,
    )
    .optional()?;

  let Some(profile) = profile else { return Ok(None) };

  let mut stmt = conn.prepare(&format!(
    "{EXPERIENCE_SELECT} WHERE profile_id = ?1 ORDER BY seq DESC"
  ))?;
  let experience = stmt
    .query_map(rusqlite::params![profile.profile_id], raw_experience)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some((profile, experience)))
}

fn profile_id_for(
  conn:    &rusqlite::Connection,
  user_id: &str,
) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT profile_id FROM profiles WHERE user_id = ?1",
      rusqlite::params![user_id],
      |r| r.get(0),
    )
    .optional()
}

/// What the upsert transaction found, before decoding.
enum RawUpsert {
  NoIdentity,
  MissingStatus,
  Stored(RawProfile, Vec<RawExperience>),
}

/// What the experience-removal transaction found, before decoding.
enum RawRemoval {
  NoProfile,
  NoEntry,
  Removed(Option<(RawProfile, Vec<RawExperience>)>),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A profile store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = crate::Error;

  // ── Identities ────────────────────────────────────────────────────────────

  async fn add_identity(&self, input: NewIdentity) -> Result<Identity> {
    let identity = Identity {
      user_id:    Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      avatar:     input.avatar,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(identity.user_id);
    let at_str = encode_dt(identity.created_at);
    let name   = identity.name.clone();
    let email  = identity.email.clone();
    let avatar = identity.avatar.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, email, avatar, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, avatar, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(identity)
  }

  async fn get_identity(&self, user_id: Uuid) -> Result<Option<Identity>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, name, email, avatar, created_at FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawIdentity {
                user_id:    row.get(0)?,
                name:       row.get(1)?,
                email:      row.get(2)?,
                avatar:     row.get(3)?,
                created_at: row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn delete_identity(&self, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM users WHERE user_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(removed > 0)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<ExpandedProfile>> {
    let id_str = encode_uuid(user_id);

    let raw = self
      .conn
      .call(move |conn| Ok(load_profile(conn, &id_str)?))
      .await?;

    raw
      .map(|(profile, experience)| profile.into_expanded(experience))
      .transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<ExpandedProfile>> {
    let (profiles, experience): (Vec<RawProfile>, Vec<RawExperience>) = self
      .conn
      .call(|conn| {
        let profiles = conn
          .prepare(&format!("{PROFILE_SELECT} ORDER BY p.rowid"))?
          .query_map([], raw_profile)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let experience = conn
          .prepare(&format!("{EXPERIENCE_SELECT} ORDER BY profile_id, seq DESC"))?
          .query_map([], raw_experience)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((profiles, experience))
      })
      .await?;

    let mut by_profile: HashMap<String, Vec<RawExperience>> = HashMap::new();
    for exp in experience {
      by_profile.entry(exp.profile_id.clone()).or_default().push(exp);
    }

    profiles
      .into_iter()
      .map(|p| {
        let exp = by_profile.remove(&p.profile_id).unwrap_or_default();
        p.into_expanded(exp)
      })
      .collect()
  }

  async fn upsert_profile(
    &self,
    user_id: Uuid,
    fields:  ProfileFields,
  ) -> Result<Option<Profile>> {
    let id_str     = encode_uuid(user_id);
    let new_id_str = encode_uuid(Uuid::new_v4());
    let now_str    = encode_dt(Utc::now());
    let skills_str = fields.skills.as_deref().map(encode_skills).transpose()?;
    let ProfileFields {
      company,
      website,
      location,
      bio,
      status,
      githubusername,
      social,
      ..
    } = fields;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let identity_exists = tx
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !identity_exists {
          return Ok(RawUpsert::NoIdentity);
        }

        if profile_id_for(&tx, &id_str)?.is_some() {
          tx.execute(
            "UPDATE profiles SET
               company        = COALESCE(?2,  company),
               website        = COALESCE(?3,  website),
               location       = COALESCE(?4,  location),
               bio            = COALESCE(?5,  bio),
               status         = COALESCE(?6,  status),
               githubusername = COALESCE(?7,  githubusername),
               skills         = COALESCE(?8,  skills),
               youtube        = COALESCE(?9,  youtube),
               twitter        = COALESCE(?10, twitter),
               facebook       = COALESCE(?11, facebook),
               linkedin       = COALESCE(?12, linkedin),
               instagram      = COALESCE(?13, instagram),
               updated_at     = ?14
             WHERE user_id = ?1",
            rusqlite::params![
              id_str,
              company,
              website,
              location,
              bio,
              status,
              githubusername,
              skills_str,
              social.youtube,
              social.twitter,
              social.facebook,
              social.linkedin,
              social.instagram,
              now_str,
            ],
          )?;
        } else {
          if status.is_none() {
            return Ok(RawUpsert::MissingStatus);
          }
          tx.execute(
            "INSERT INTO profiles (
               profile_id, user_id, company, website, location, bio,
               status, githubusername, skills,
               youtube, twitter, facebook, linkedin, instagram,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, COALESCE(?9, '[]'),
                       ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
            rusqlite::params![
              new_id_str,
              id_str,
              company,
              website,
              location,
              bio,
              status,
              githubusername,
              skills_str,
              social.youtube,
              social.twitter,
              social.facebook,
              social.linkedin,
              social.instagram,
              now_str,
            ],
          )?;
        }

        let stored = load_profile(&tx, &id_str)?;
        tx.commit()?;

        Ok(match stored {
          Some((profile, experience)) => RawUpsert::Stored(profile, experience),
          None => RawUpsert::NoIdentity,
        })
      })
      .await?;

    match outcome {
      RawUpsert::NoIdentity => Ok(None),
      RawUpsert::MissingStatus => Err(devconnect_core::Error::MissingStatus.into()),
      RawUpsert::Stored(profile, experience) => {
        tracing::debug!(%user_id, "profile stored");
        profile.into_profile(experience).map(Some)
      }
    }
  }

  async fn delete_profile(&self, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM profiles WHERE user_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(removed > 0)
  }

  // ── Experience ────────────────────────────────────────────────────────────

  async fn add_experience(
    &self,
    user_id: Uuid,
    input:   NewExperience,
  ) -> Result<Option<Profile>> {
    let id_str   = encode_uuid(user_id);
    let exp_str  = encode_uuid(Uuid::new_v4());
    let from_str = encode_date(input.from);
    let to_str   = input.to.map(encode_date);
    let now_str  = encode_dt(Utc::now());

    let stored = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(profile_id) = profile_id_for(&tx, &id_str)? else {
          return Ok(None);
        };

        // Position is assigned in the same statement as the insert.
        tx.execute(
          "INSERT INTO experiences (
             experience_id, profile_id, seq, title, company, location,
             from_date, to_date, current, description
           )
           SELECT ?1, ?2, COALESCE(MAX(seq), 0) + 1, ?3, ?4, ?5, ?6, ?7, ?8, ?9
           FROM experiences WHERE profile_id = ?2",
          rusqlite::params![
            exp_str,
            profile_id,
            input.title,
            input.company,
            input.location,
            from_str,
            to_str,
            input.current,
            input.description,
          ],
        )?;
        tx.execute(
          "UPDATE profiles SET updated_at = ?2 WHERE profile_id = ?1",
          rusqlite::params![profile_id, now_str],
        )?;

        let stored = load_profile(&tx, &id_str)?;
        tx.commit()?;
        Ok(stored)
      })
      .await?;

    stored
      .map(|(profile, experience)| profile.into_profile(experience))
      .transpose()
  }

  async fn remove_experience(
    &self,
    user_id:       Uuid,
    experience_id: Uuid,
  ) -> Result<ExperienceRemoval> {
    let id_str  = encode_uuid(user_id);
    let exp_str = encode_uuid(experience_id);
    let now_str = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(profile_id) = profile_id_for(&tx, &id_str)? else {
          return Ok(RawRemoval::NoProfile);
        };

        let removed = tx.execute(
          "DELETE FROM experiences WHERE experience_id = ?1 AND profile_id = ?2",
          rusqlite::params![exp_str, profile_id],
        )?;
        if removed == 0 {
          return Ok(RawRemoval::NoEntry);
        }

        tx.execute(
          "UPDATE profiles SET updated_at = ?2 WHERE profile_id = ?1",
          rusqlite::params![profile_id, now_str],
        )?;

        let stored = load_profile(&tx, &id_str)?;
        tx.commit()?;
        Ok(RawRemoval::Removed(stored))
      })
      .await?;

    match outcome {
      RawRemoval::NoProfile | RawRemoval::Removed(None) => Ok(ExperienceRemoval::ProfileMissing),
      RawRemoval::NoEntry => Ok(ExperienceRemoval::EntryMissing),
      RawRemoval::Removed(Some((profile, experience))) => {
        Ok(ExperienceRemoval::Removed(profile.into_profile(experience)?))
      }
    }
  }
}
