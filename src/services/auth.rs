use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;
use uuid::Uuid;

use crate::models::auth::{Claims, RefreshRecord, TokenResponse};
use crate::store::refresh::RefreshTokenRepository;
use crate::store::users::UserRepository;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Covers both unknown usernames and wrong passwords; callers must not be
    /// able to tell which factor failed.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing refresh token")]
    MissingToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("refresh token expired")]
    RefreshExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to generate token")]
    TokenGeneration,
}

/// Orchestrates the session lifecycle: login, refresh rotation, logout.
/// Access tokens are self-contained HS256 JWTs; refresh tokens are opaque
/// random strings whose state lives entirely in the refresh token store.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    signing_key: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        signing_key: String,
        access_ttl_seconds: i64,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            signing_key,
            access_ttl: Duration::seconds(access_ttl_seconds),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    /// Validate credentials and open a new session.
    pub fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .users
            .get_by_username(username)
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, expires_at) = self.issue_access_token(user.id, &user.roles)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh_token()?;

        self.refresh_tokens.save(
            &refresh_token,
            RefreshRecord {
                user_id: user.id,
                expires_at: refresh_expires_at,
                roles: user.roles.clone(),
            },
        );

        debug!("session opened for user {}", user.id);

        Ok(TokenResponse {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    /// Exchange a valid refresh token for a new pair, rotating the old token
    /// out. The presented token is consumed before the new one is minted, so
    /// a failure mid-rotation loses the session rather than permitting reuse.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let record = self
            .refresh_tokens
            .get(refresh_token)
            .ok_or(AuthError::InvalidRefreshToken)?;

        if Utc::now() > record.expires_at {
            self.refresh_tokens.delete(refresh_token);
            return Err(AuthError::RefreshExpired);
        }

        // Rotation: the old token is single-use and is gone from here on.
        self.refresh_tokens.delete(refresh_token);

        // Roles come from the record's snapshot, never a live user lookup.
        let (access_token, expires_at) = self.issue_access_token(record.user_id, &record.roles)?;
        let (new_refresh, refresh_expires_at) = self.issue_refresh_token()?;

        self.refresh_tokens.save(
            &new_refresh,
            RefreshRecord {
                user_id: record.user_id,
                expires_at: refresh_expires_at,
                roles: record.roles,
            },
        );

        Ok(TokenResponse {
            access_token,
            refresh_token: new_refresh,
            expires_at,
        })
    }

    /// Close the session. Idempotent; unknown or already-rotated tokens are
    /// not an error from the caller's perspective.
    pub fn logout(&self, refresh_token: &str) {
        self.refresh_tokens.delete(refresh_token);
    }

    fn issue_access_token(
        &self,
        user_id: Uuid,
        roles: &[String],
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            roles: roles.to_vec(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
            jti: random_token_id()?,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.signing_key.as_bytes()),
        )
        .map_err(|_| AuthError::TokenGeneration)?;

        Ok((token, expires_at))
    }

    fn issue_refresh_token(&self) -> Result<(String, DateTime<Utc>), AuthError> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| AuthError::TokenGeneration)?;

        let token = URL_SAFE_NO_PAD.encode(bytes);
        let expires_at = Utc::now() + self.refresh_ttl;
        Ok((token, expires_at))
    }
}

/// 16 bytes of entropy, URL-safe encoded.
fn random_token_id() -> Result<String, AuthError> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| AuthError::TokenGeneration)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
