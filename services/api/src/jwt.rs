//! JWT service for session token issuance and verification
//!
//! Tokens are signed with HS256 using a server-held secret and carry the
//! subject id, username, role, issued-at and expiry claims. Verification
//! distinguishes an expired token from any other failure so clients can
//! prompt for a fresh login instead of treating the token as forged.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    models::{AuthUser, Role, User},
};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token lifetime in minutes
    pub expiry_minutes: i64,
}

impl From<&AppConfig> for JwtConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiry_minutes: config.jwt_expiry_minutes,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token")]
    Invalid,
}

#[derive(Error, Debug)]
pub enum IssueError {
    #[error("token lifetime of {0} minutes is out of range")]
    LifetimeOutOfRange(i64),

    #[error(transparent)]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue an access token for a user
    pub fn issue(&self, user: &User) -> Result<String, IssueError> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, IssueError> {
        let expires_at = TimeDelta::try_minutes(self.config.expiry_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(IssueError::LifetimeOutOfRange(self.config.expiry_minutes))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify a token and derive the identity it carries
    pub fn verify(&self, token: &str) -> Result<AuthUser, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!("Rejected token: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        let claims = token_data.claims;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Invalid)?;

        if claims.username.is_empty() {
            return Err(TokenError::Invalid);
        }

        Ok(AuthUser {
            id,
            username: claims.username,
            role: claims.role,
        })
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.expiry_minutes.saturating_mul(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            expiry_minutes: 1,
        })
    }

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "chidi@example.com".to_string(),
            username: "chidi_a".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sign_raw(secret: &str, claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn fresh_token_verifies_to_its_identity() {
        let jwt = service("secret");
        let user = user(Role::Moderator);

        let token = jwt.issue(&user).unwrap();
        let identity = jwt.verify(&token).unwrap();

        assert_eq!(identity.id, user.id);
        assert_eq!(identity.username, "chidi_a");
        assert_eq!(identity.role, Role::Moderator);
        assert_eq!(jwt.expires_in(), 60);
    }

    #[test]
    fn elapsed_token_is_expired() {
        let jwt = service("secret");
        let issued = Utc::now() - TimeDelta::minutes(2);

        let token = jwt.issue_at(&user(Role::User), issued).unwrap();

        assert_eq!(jwt.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn lifetime_beyond_calendar_range_is_an_error() {
        let jwt = JwtService::new(JwtConfig {
            secret: "secret".to_string(),
            expiry_minutes: i64::MAX / 60,
        });

        assert!(matches!(
            jwt.issue(&user(Role::User)),
            Err(IssueError::LifetimeOutOfRange(_))
        ));
        assert_eq!(jwt.expires_in(), (i64::MAX / 60) * 60);
    }

    #[test]
    fn expires_in_saturates() {
        let jwt = JwtService::new(JwtConfig {
            secret: "secret".to_string(),
            expiry_minutes: i64::MAX,
        });

        assert_eq!(jwt.expires_in(), i64::MAX);
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let token = service("other-secret").issue(&user(Role::User)).unwrap();

        assert_eq!(service("secret").verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let jwt = service("secret");
        let token = jwt.issue(&user(Role::User)).unwrap();
        let forged = sign_raw(
            "secret",
            &serde_json::json!({
                "sub": Uuid::new_v4().to_string(),
                "username": "mallory",
                "role": "admin",
                "iat": Utc::now().timestamp(),
                "exp": (Utc::now() + TimeDelta::minutes(1)).timestamp(),
            }),
        );

        // splice the forged payload onto the genuine signature
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        assert_eq!(jwt.verify(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn malformed_subject_is_invalid() {
        let token = sign_raw(
            "secret",
            &serde_json::json!({
                "sub": "not-a-uuid",
                "username": "chidi_a",
                "role": "user",
                "iat": Utc::now().timestamp(),
                "exp": (Utc::now() + TimeDelta::minutes(1)).timestamp(),
            }),
        );

        assert_eq!(service("secret").verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn missing_role_claim_is_invalid() {
        let token = sign_raw(
            "secret",
            &serde_json::json!({
                "sub": Uuid::new_v4().to_string(),
                "username": "chidi_a",
                "iat": Utc::now().timestamp(),
                "exp": (Utc::now() + TimeDelta::minutes(1)).timestamp(),
            }),
        );

        assert_eq!(service("secret").verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn unknown_role_is_invalid() {
        let token = sign_raw(
            "secret",
            &serde_json::json!({
                "sub": Uuid::new_v4().to_string(),
                "username": "chidi_a",
                "role": "superuser",
                "iat": Utc::now().timestamp(),
                "exp": (Utc::now() + TimeDelta::minutes(1)).timestamp(),
            }),
        );

        assert_eq!(service("secret").verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(service("secret").verify("not.a.token"), Err(TokenError::Invalid));
    }
}
