//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use devconnect_core::{
  experience::NewExperience,
  identity::NewIdentity,
  profile::{ProfileFields, Social, parse_skills},
  store::{ExperienceRemoval, ProfileStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn identity(s: &SqliteStore, name: &str) -> Uuid {
  s.add_identity(NewIdentity {
    name:   name.into(),
    email:  format!("{}@example.com", name.to_lowercase()),
    avatar: Some(format!("https://avatars.example.com/{name}")),
  })
  .await
  .unwrap()
  .user_id
}

fn fields(status: &str, skills: &str) -> ProfileFields {
  ProfileFields {
    status: Some(status.into()),
    skills: Some(parse_skills(skills)),
    ..Default::default()
  }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_identity() {
  let s = store().await;
  let id = identity(&s, "Ada").await;

  let fetched = s.get_identity(id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, id);
  assert_eq!(fetched.name, "Ada");
  assert_eq!(fetched.email, "ada@example.com");
}

#[tokio::test]
async fn get_identity_missing_returns_none() {
  let s = store().await;
  assert!(s.get_identity(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_identity_reports_whether_removed() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  assert!(s.delete_identity(id).await.unwrap());
  assert!(!s.delete_identity(id).await.unwrap());
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_profile() {
  let s = store().await;
  let id = identity(&s, "Ada").await;

  let profile = s
    .upsert_profile(id, fields("Developer", "a, b ,c"))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(profile.user, id);
  assert_eq!(profile.status, "Developer");
  assert_eq!(profile.skills, vec!["a", "b", "c"]);
  assert!(profile.experience.is_empty());
  assert_eq!(profile.social, Social::default());
}

#[tokio::test]
async fn second_upsert_only_changes_supplied_fields() {
  let s = store().await;
  let id = identity(&s, "Ada").await;

  let first = s
    .upsert_profile(id, ProfileFields {
      company: Some("Analytical Engines".into()),
      bio: Some("First programmer".into()),
      social: Social { twitter: Some("@ada".into()), ..Default::default() },
      ..fields("Developer", "maths")
    })
    .await
    .unwrap()
    .unwrap();

  let second = s
    .upsert_profile(id, ProfileFields {
      company: Some("Babbage & Co".into()),
      social: Social { youtube: Some("ada-tv".into()), ..Default::default() },
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(second.profile_id, first.profile_id);
  assert_eq!(second.company.as_deref(), Some("Babbage & Co"));
  assert_eq!(second.bio.as_deref(), Some("First programmer"));
  assert_eq!(second.status, "Developer");
  assert_eq!(second.skills, vec!["maths"]);
  assert_eq!(second.social.twitter.as_deref(), Some("@ada"));
  assert_eq!(second.social.youtube.as_deref(), Some("ada-tv"));
  assert!(second.updated_at >= first.updated_at);

  assert_eq!(s.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn upsert_without_identity_returns_none() {
  let s = store().await;
  let result = s
    .upsert_profile(Uuid::new_v4(), fields("Developer", "rust"))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn create_without_status_is_rejected() {
  let s = store().await;
  let id = identity(&s, "Ada").await;

  let err = s
    .upsert_profile(id, ProfileFields::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(devconnect_core::Error::MissingStatus)));
  assert!(s.get_profile(id).await.unwrap().is_none());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_profile_is_expanded() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();

  let profile = s.get_profile(id).await.unwrap().unwrap();
  assert_eq!(profile.user.user_id, id);
  assert_eq!(profile.user.name, "Ada");
  assert_eq!(profile.user.avatar.as_deref(), Some("https://avatars.example.com/Ada"));
}

#[tokio::test]
async fn get_profile_missing_returns_none() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  assert!(s.get_profile(id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_profiles_returns_every_profile_expanded() {
  let s = store().await;
  let names = ["Ada", "Grace", "Edsger"];
  for name in names {
    let id = identity(&s, name).await;
    s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();
  }
  // An identity without a profile is not listed.
  identity(&s, "Barbara").await;

  let all = s.list_profiles().await.unwrap();
  assert_eq!(all.len(), 3);
  let listed: Vec<_> = all.iter().map(|p| p.user.name.as_str()).collect();
  assert_eq!(listed, names);
}

#[tokio::test]
async fn list_profiles_attaches_experience_to_owner() {
  let s = store().await;
  let ada = identity(&s, "Ada").await;
  let grace = identity(&s, "Grace").await;
  s.upsert_profile(ada, fields("Developer", "rust")).await.unwrap();
  s.upsert_profile(grace, fields("Admiral", "cobol")).await.unwrap();
  s.add_experience(grace, NewExperience::new("Officer", "US Navy", date(1943, 12, 1)))
    .await
    .unwrap();

  let all = s.list_profiles().await.unwrap();
  let by_name = |n: &str| all.iter().find(|p| p.user.name == n).unwrap();
  assert!(by_name("Ada").experience.is_empty());
  assert_eq!(by_name("Grace").experience.len(), 1);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_profile_then_identity() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();
  s.add_experience(id, NewExperience::new("Engineer", "Acme", date(2020, 1, 1)))
    .await
    .unwrap();

  assert!(s.delete_profile(id).await.unwrap());
  assert!(s.delete_identity(id).await.unwrap());

  assert!(s.get_profile(id).await.unwrap().is_none());
  assert!(s.get_identity(id).await.unwrap().is_none());
  assert!(!s.delete_profile(id).await.unwrap());
}

#[tokio::test]
async fn deleting_identity_cascades_to_profile() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();

  s.delete_identity(id).await.unwrap();
  assert!(s.list_profiles().await.unwrap().is_empty());
}

// ─── Experience ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn experience_is_listed_newest_first() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();

  s.add_experience(id, NewExperience::new("Junior", "Acme", date(2015, 1, 1)))
    .await
    .unwrap();
  let profile = s
    .add_experience(id, NewExperience {
      location:    Some("London".into()),
      current:     true,
      description: Some("Leads the team".into()),
      ..NewExperience::new("Senior", "Acme", date(2019, 6, 1))
    })
    .await
    .unwrap()
    .unwrap();

  let titles: Vec<_> = profile.experience.iter().map(|e| e.title.as_str()).collect();
  assert_eq!(titles, ["Senior", "Junior"]);
  assert!(profile.experience[0].current);
  assert_eq!(profile.experience[0].from, date(2019, 6, 1));
  assert_eq!(profile.experience[0].location.as_deref(), Some("London"));
}

#[tokio::test]
async fn add_experience_without_profile_returns_none() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  let result = s
    .add_experience(id, NewExperience::new("Engineer", "Acme", date(2020, 1, 1)))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn add_then_remove_restores_length() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();
  s.add_experience(id, NewExperience::new("Junior", "Acme", date(2015, 1, 1)))
    .await
    .unwrap();
  let before = s.get_profile(id).await.unwrap().unwrap().experience.len();

  let added = s
    .add_experience(id, NewExperience::new("Senior", "Acme", date(2019, 1, 1)))
    .await
    .unwrap()
    .unwrap();
  let new_id = added.experience[0].experience_id;

  let ExperienceRemoval::Removed(profile) = s.remove_experience(id, new_id).await.unwrap()
  else {
    panic!("expected removal");
  };
  assert_eq!(profile.experience.len(), before);
  assert!(profile.experience.iter().all(|e| e.experience_id != new_id));
}

#[tokio::test]
async fn remove_unknown_experience_reports_entry_missing() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();
  s.add_experience(id, NewExperience::new("Junior", "Acme", date(2015, 1, 1)))
    .await
    .unwrap();

  let outcome = s.remove_experience(id, Uuid::new_v4()).await.unwrap();
  assert!(matches!(outcome, ExperienceRemoval::EntryMissing));
  assert_eq!(s.get_profile(id).await.unwrap().unwrap().experience.len(), 1);
}

#[tokio::test]
async fn remove_experience_of_another_profile_is_entry_missing() {
  let s = store().await;
  let ada = identity(&s, "Ada").await;
  let grace = identity(&s, "Grace").await;
  s.upsert_profile(ada, fields("Developer", "rust")).await.unwrap();
  s.upsert_profile(grace, fields("Admiral", "cobol")).await.unwrap();
  let graces = s
    .add_experience(grace, NewExperience::new("Officer", "US Navy", date(1943, 12, 1)))
    .await
    .unwrap()
    .unwrap();

  let outcome = s
    .remove_experience(ada, graces.experience[0].experience_id)
    .await
    .unwrap();
  assert!(matches!(outcome, ExperienceRemoval::EntryMissing));
}

#[tokio::test]
async fn remove_experience_without_profile_reports_profile_missing() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  let outcome = s.remove_experience(id, Uuid::new_v4()).await.unwrap();
  assert!(matches!(outcome, ExperienceRemoval::ProfileMissing));
}

#[tokio::test]
async fn concurrent_additions_are_all_kept() {
  let s = store().await;
  let id = identity(&s, "Ada").await;
  s.upsert_profile(id, fields("Developer", "rust")).await.unwrap();

  let (a, b, c) = tokio::join!(
    s.add_experience(id, NewExperience::new("A", "Acme", date(2020, 1, 1))),
    s.add_experience(id, NewExperience::new("B", "Acme", date(2021, 1, 1))),
    s.add_experience(id, NewExperience::new("C", "Acme", date(2022, 1, 1))),
  );
  a.unwrap();
  b.unwrap();
  c.unwrap();

  let profile = s.get_profile(id).await.unwrap().unwrap();
  let mut titles: Vec<_> = profile.experience.iter().map(|e| e.title.clone()).collect();
  titles.sort();
  assert_eq!(titles, ["A", "B", "C"]);
}
