use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in the JWT access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user UUID
    pub roles: Vec<String>,
    pub iat: usize,
    pub exp: usize,
    /// Unique token id, for audit trails.
    pub jti: String,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Server-side state for an outstanding refresh token, keyed by the opaque
/// token string. Roles are snapshotted at issuance: a role change on the user
/// does not retroactively affect sessions minted from this record.
#[derive(Debug, Clone)]
pub struct RefreshRecord {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub roles: Vec<String>,
}

/// Extracted from the validated JWT — available via Axum extractors
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}
