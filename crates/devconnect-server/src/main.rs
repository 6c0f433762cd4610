//! devconnect server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the profile API at `/api/profile`.
//!
//! # Tokens for local testing
//!
//! Registration lives in the accounts service. To try the API locally,
//! create a user and print a token for it:
//!
//! ```
//! cargo run -p devconnect-server -- --add-user "Ada" --email ada@example.com
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use devconnect_api::{AppState, auth::TokenKeys};
use devconnect_core::{identity::NewIdentity, store::ProfileStore};
use devconnect_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "devconnect profile server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print a bearer token for an existing user id and exit.
  #[arg(long, value_name = "USER_ID")]
  issue_token: Option<Uuid>,

  /// Store a new user with this display name, print its id and a token, and exit.
  #[arg(long, value_name = "NAME", requires = "email")]
  add_user: Option<String>,

  /// Email for `--add-user`.
  #[arg(long)]
  email: Option<String>,

  /// Avatar URL for `--add-user`.
  #[arg(long)]
  avatar: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let tokens = Arc::new(TokenKeys::new(server_cfg.jwt_secret.as_bytes(), server_cfg.token_ttl()?));

  // Helper mode: sign a token and exit.
  if let Some(user_id) = cli.issue_token {
    println!("{}", tokens.issue(user_id).context("failed to sign token")?);
    return Ok(());
  }

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: create a user and exit.
  if let Some(name) = cli.add_user {
    let identity = store
      .add_identity(NewIdentity {
        name,
        email: cli.email.unwrap_or_default(),
        avatar: cli.avatar,
      })
      .await
      .context("failed to store user")?;
    println!("user_id: {}", identity.user_id);
    println!("token:   {}", tokens.issue(identity.user_id).context("failed to sign token")?);
    return Ok(());
  }

  let state = AppState { store: Arc::new(store), tokens };

  let app = Router::new()
    .nest("/api/profile", devconnect_api::profile_router(state))
    .layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
