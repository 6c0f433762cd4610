//! Error types for `devconnect-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date {value:?}: expected YYYY-MM-DD")]
  InvalidDate {
    value:  String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("a profile cannot be created without a status")]
  MissingStatus,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
