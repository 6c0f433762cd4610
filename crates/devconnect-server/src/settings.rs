//! Runtime server configuration.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Environment variables with this prefix override the config file,
/// e.g. `DEVCONNECT_JWT_SECRET`.
pub const ENV_PREFIX: &str = "DEVCONNECT";

/// Server configuration, deserialised from `config.toml` and the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  pub jwt_secret:      String,
  #[serde(default = "default_token_ttl_hours")]
  pub token_ttl_hours: i64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("devconnect.sqlite3") }

fn default_token_ttl_hours() -> i64 { 100 }

impl ServerConfig {
  /// Layer the (optional) TOML file at `path` under `DEVCONNECT_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Token lifetime; rejects values chrono cannot represent and anything
  /// that is not positive.
  pub fn token_ttl(&self) -> anyhow::Result<chrono::Duration> {
    chrono::Duration::try_hours(self.token_ttl_hours)
      .filter(|ttl| *ttl > chrono::Duration::zero())
      .with_context(|| format!("token_ttl_hours out of range: {}", self.token_ttl_hours))
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;
  use config::{Config, File, FileFormat};

  fn parse(toml: &str) -> Result<ServerConfig, config::ConfigError> {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()?
      .try_deserialize()
  }

  #[test]
  fn defaults_fill_missing_keys() {
    let cfg = parse(r#"jwt_secret = "s3cret""#).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:5000");
    assert_eq!(cfg.token_ttl_hours, 100);
    assert_eq!(cfg.store_path, PathBuf::from("devconnect.sqlite3"));
  }

  #[test]
  fn explicit_values_win() {
    let cfg = parse(
      r#"
        host = "0.0.0.0"
        port = 8080
        store_path = "/var/lib/devconnect.db"
        jwt_secret = "s3cret"
        token_ttl_hours = 2
      "#,
    )
    .unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.token_ttl_hours, 2);
  }

  #[test]
  fn token_ttl_converts_hours() {
    let cfg = parse(r#"jwt_secret = "s3cret""#).unwrap();
    assert_eq!(cfg.token_ttl().unwrap(), chrono::Duration::hours(100));
  }

  #[test]
  fn token_ttl_out_of_range_is_an_error() {
    let huge = parse(&format!("jwt_secret = \"s\"\ntoken_ttl_hours = {}", i64::MAX)).unwrap();
    let err = huge.token_ttl().unwrap_err();
    assert!(err.to_string().contains("token_ttl_hours out of range"));

    let zero = parse("jwt_secret = \"s\"\ntoken_ttl_hours = 0").unwrap();
    assert!(zero.token_ttl().is_err());
  }

  #[test]
  fn secret_is_required() {
    assert!(parse(r#"port = 8080"#).is_err());
  }

  #[test]
  fn tilde_is_left_alone_without_prefix() {
    assert_eq!(expand_tilde(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
  }
}
