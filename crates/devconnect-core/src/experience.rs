//! Experience entries — the work history embedded in a profile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Wire and storage format for experience dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single work-history item. Profiles list these most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  /// Assigned by the store on insertion.
  pub experience_id: Uuid,
  pub title:         String,
  pub company:       String,
  pub location:      Option<String>,
  pub from:          NaiveDate,
  pub to:            Option<NaiveDate>,
  pub current:       bool,
  pub description:   Option<String>,
}

/// Input for [`ProfileStore::add_experience`](crate::store::ProfileStore::add_experience).
#[derive(Debug, Clone)]
pub struct NewExperience {
  pub title:       String,
  pub company:     String,
  pub location:    Option<String>,
  pub from:        NaiveDate,
  pub to:          Option<NaiveDate>,
  pub current:     bool,
  pub description: Option<String>,
}

impl NewExperience {
  /// Minimal entry with only the required fields set.
  pub fn new(title: impl Into<String>, company: impl Into<String>, from: NaiveDate) -> Self {
    Self {
      title: title.into(),
      company: company.into(),
      location: None,
      from,
      to: None,
      current: false,
      description: None,
    }
  }
}

/// Parse a `YYYY-MM-DD` date. Surrounding whitespace is ignored.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| {
    Error::InvalidDate { value: value.to_owned(), source }
  })
}

pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_iso_dates() {
    let d = parse_date(" 2019-06-01 ").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2019, 6, 1).unwrap());
    assert_eq!(format_date(d), "2019-06-01");
  }

  #[test]
  fn rejects_other_shapes() {
    assert!(matches!(parse_date("June 2019"), Err(Error::InvalidDate { .. })));
    assert!(parse_date("2019-13-01").is_err());
    assert!(parse_date("").is_err());
  }
}
