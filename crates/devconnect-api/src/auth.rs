//! Bearer-token authentication: JWT issuing/verification and the
//! [`AuthUser`] extractor for private routes.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use devconnect_core::store::ProfileStore;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Header accepted in place of `Authorization: Bearer …` by older clients.
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// JWT claims: the subject is the identity id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub iat: i64,
  pub exp: i64,
}

/// HS256 signing and verification keys shared by all requests.
pub struct TokenKeys {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl TokenKeys {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation: Validation::default(),
      ttl,
    }
  }

  /// Sign a token for `user_id` that expires after the configured TTL.
  /// An expiry past the representable range saturates.
  pub fn issue(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
    let claims = Claims {
      sub: user_id,
      iat: now.timestamp(),
      exp: exp.timestamp(),
    };
    jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
  }

  /// Verify signature and expiry, returning the identity id.
  pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims.sub)
      .map_err(|e| {
        tracing::debug!(error = %e, "rejected token");
        ApiError::Unauthorized("token is not valid")
      })
  }
}

/// Pull the raw token out of the request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  if let Some(value) = headers.get(header::AUTHORIZATION) {
    return value
      .to_str()
      .ok()
      .and_then(|v| v.strip_prefix("Bearer "))
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .ok_or(ApiError::Unauthorized("malformed authorization header"));
  }

  headers
    .get(LEGACY_TOKEN_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or(ApiError::Unauthorized("no token, authorization denied"))
}

/// The authenticated caller's identity id. Present in a handler means the
/// request carried a valid token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: ProfileStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    Ok(AuthUser(state.tokens.verify(token)?))
  }
}
