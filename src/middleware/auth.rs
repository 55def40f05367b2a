use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::models::auth::{AuthenticatedUser, Claims};
use crate::services::auth::AuthError;

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid Authorization header format"))?;

        let secret = parts
            .extensions
            .get::<JwtSecret>()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "JWT secret not configured"))?;

        let claims = decode_access_token(token, &secret.0)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        let user_id = claims
            .sub
            .parse()
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(AuthenticatedUser {
            user_id,
            roles: claims.roles,
        })
    }
}

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Verify signature and expiry. HS256 only — tokens signed with any other
/// algorithm are rejected. Every failure collapses into the same error.
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation).map_err(|_| AuthError::InvalidToken)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-12345";

    fn claims(ttl: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4().to_string(),
            roles: vec!["user".into(), "admin".into()],
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
            jti: "jti-1".into(),
        }
    }

    fn sign(claims: &Claims, algorithm: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips() {
        let original = claims(Duration::minutes(15));
        let token = sign(&original, Algorithm::HS256, SECRET);

        let decoded = decode_access_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, original.sub);
        assert_eq!(decoded.roles, original.roles);
        assert!(decoded.has_role("admin"));
        assert!(!decoded.has_role("auditor"));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = sign(&claims(Duration::minutes(15)), Algorithm::HS256, "other-secret");
        assert_eq!(
            decode_access_token(&token, SECRET).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn wrong_algorithm_is_rejected() {
        // Same secret, but outside the HS256 allow-list.
        let token = sign(&claims(Duration::minutes(15)), Algorithm::HS384, SECRET);
        assert_eq!(
            decode_access_token(&token, SECRET).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default leeway.
        let token = sign(&claims(Duration::hours(-2)), Algorithm::HS256, SECRET);
        assert_eq!(
            decode_access_token(&token, SECRET).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(
            decode_access_token("not.a.jwt", SECRET).unwrap_err(),
            AuthError::InvalidToken
        );
        assert_eq!(
            decode_access_token("", SECRET).unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
